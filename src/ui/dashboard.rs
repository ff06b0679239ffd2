//! Dashboard: next lesson countdown and marketplace availability

use crate::app::App;
use crate::state::UserRole;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Next lesson
            Constraint::Length(7), // Language availability
            Constraint::Min(0),    // Actions
        ])
        .split(area);

    draw_next_lesson(frame, chunks[0], app);
    draw_availability_summary(frame, chunks[1], app);
    draw_actions(frame, chunks[2], app);
}

fn draw_next_lesson(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Next lesson ")
        .borders(Borders::ALL);

    let now = Utc::now();
    let lines = match app.state.next_lesson(now) {
        Some(lesson) => vec![
            Line::from(vec![
                Span::styled(
                    &lesson.language,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    " with {} — {}",
                    lesson.tutor_name,
                    lesson.starts_at.format("%a %d %b, %H:%M")
                )),
            ]),
            Line::from(Span::styled(
                format!(
                    "starts in {}",
                    app.state.next_lesson_countdown(now).unwrap_or_default()
                ),
                Style::default().fg(Color::Green),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "Nothing booked. Press b to book a lesson.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_availability_summary(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Tutors right now (f to browse) ")
        .borders(Borders::ALL);

    let lines: Vec<Line> = if app.state.language_availability.is_empty() {
        vec![Line::from(Span::styled(
            "Press f to check tutor availability per language",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.state
            .language_availability
            .iter()
            .map(|a| {
                let next = match &a.next_open_slot {
                    Some(at) => format!("next open slot {}", at.format("%a %H:%M")),
                    None => "no open slots".to_string(),
                };
                Line::from(format!(
                    "{}: {} tutors, {} open slots, {next}",
                    a.language, a.tutor_count, a.open_slots
                ))
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_actions(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from("l  My lessons"),
        Line::from("b  Book a lesson"),
    ];
    match app.state.role() {
        Some(UserRole::Tutor) => {
            lines.push(Line::from("a  Edit weekly availability"));
            lines.push(Line::from("w  Wallet and payouts"));
        }
        Some(UserRole::Student) => {
            lines.push(Line::from("t  Apply to become a tutor"));
        }
        None => {}
    }
    lines.push(Line::from("q  Quit"));

    let block = Block::default().title(" Actions ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
