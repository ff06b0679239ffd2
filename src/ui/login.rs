//! Sign-in screen

use super::forms::draw_field;
use crate::app::App;
use crate::state::{Form, FormState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Lingua ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Centered, fixed-width column
    let width = inner.width.min(60);
    let x = inner.x + (inner.width.saturating_sub(width)) / 2;
    let column = Rect {
        x,
        y: inner.y + inner.height / 4,
        width,
        height: inner.height - inner.height / 4,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Greeting
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(2), // Footer
            Constraint::Min(0),
        ])
        .split(column);

    frame.render_widget(
        Paragraph::new("Sign in to find your next language lesson"),
        chunks[0],
    );

    if let FormState::Login(form) = &app.form {
        for (i, chunk) in [chunks[1], chunks[2]].into_iter().enumerate() {
            if let Some(field) = form.get_field(i) {
                draw_field(
                    frame,
                    chunk,
                    field,
                    form.active_field() == i,
                    app.form_errors.get(&field.name).map(String::as_str),
                );
            }
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from("No account yet? Press Ctrl+N to create one"))
            .style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}
