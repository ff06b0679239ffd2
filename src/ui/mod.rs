//! UI module for rendering the TUI

mod availability;
mod dashboard;
mod forms;
mod layout;
mod lessons;
mod login;
mod wallet;
mod wizard;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Draw the main content with the bottom line reserved
    let content_area = layout::create_layout(area);

    match &app.state.current_view {
        View::Login => login::draw(frame, content_area, app),
        View::Signup => wizard::draw(frame, content_area, &app.signup, "Create your account"),
        View::Dashboard => dashboard::draw(frame, content_area, app),
        View::Lessons => lessons::draw_list(frame, content_area, app),
        View::LessonDetail => lessons::draw_detail(frame, content_area, app),
        View::LessonCreate => lessons::draw_create(frame, content_area, app),
        View::Reschedule => lessons::draw_reschedule(frame, content_area, app),
        View::TutorApplication => wizard::draw(
            frame,
            content_area,
            &app.tutor_application,
            "Become a tutor",
        ),
        View::Availability => availability::draw(frame, content_area, app),
        View::Wallet => wallet::draw(frame, content_area, app),
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);
}
