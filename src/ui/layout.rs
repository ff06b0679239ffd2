//! Layout components (content area, status bar, toast line)

use crate::app::App;
use crate::state::View;
use crate::toast::ToastKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into content and a one-line status bar
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Draw the status bar: connection dot, active toast or key hints
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    let conn_status = if app.state.backend_connected {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(conn_status);

    // An active toast takes the hint slot; Esc dismisses it early
    if let Some(toast) = app.toasts.current() {
        let color = match toast.kind {
            ToastKind::Info => Color::Cyan,
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        };
        spans.push(Span::styled(&toast.message, Style::default().fg(color)));
        spans.push(Span::styled(
            "  (Esc to dismiss)",
            Style::default().fg(Color::DarkGray),
        ));
    } else if let Some(confirm) = &app.state.confirm_action {
        spans.push(Span::styled(
            format!("Cancel lesson {confirm}? y:confirm  any other key:abort"),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        let hints = get_view_hints(&app.state.current_view);
        spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    }

    if let Some(session) = &app.state.session {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!(
                "{} ({})",
                session.profile.display_name,
                session.profile.role.label()
            ),
            Style::default().fg(Color::Blue),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> String {
    match view {
        View::Login => "Tab:next  Enter:sign in  ^N:create account".to_string(),
        View::Signup | View::TutorApplication => {
            "Tab:next field  ←/→:choose  Enter:continue  Esc:back  ^R:discard draft".to_string()
        }
        View::Dashboard => "l:lessons  b:book  a:availability  t:teach  w:wallet  f:browse  q:quit"
            .to_string(),
        View::Lessons => "j/k:nav  Enter:view  s:sort  d:direction  p:past  b:book  r:refresh"
            .to_string(),
        View::LessonDetail => "s:start  e:end  r:reschedule  c:cancel  m:copy link  Esc:back"
            .to_string(),
        View::LessonCreate | View::Reschedule => "Tab:next  Enter:submit  Esc:cancel".to_string(),
        View::Availability => {
            "arrows:move  Space:toggle  n/p:week  Enter:publish  Esc:back".to_string()
        }
        View::Wallet => "Tab:next  Enter:withdraw  r:refresh  Esc:back".to_string(),
    }
}
