//! Weekly availability grid for tutors

use crate::app::App;
use crate::state::AvailabilitySlot;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let grid = &app.state.availability;
    let days = grid.days();

    let title = format!(
        " Availability — week of {} ({} selected) ",
        grid.week_start().format("%d %b %Y"),
        grid.selected_count()
    );
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();

    // Header row: hour gutter + day names
    let mut header = vec![Span::raw("      ")];
    for day in &days {
        header.push(Span::styled(
            format!("{:^6}", day.format("%a %d").to_string()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(header));

    let (cursor_day, cursor_row) = grid.cursor();
    for (row, hour) in grid.hours().enumerate() {
        let mut spans = vec![Span::styled(
            format!("{hour:>2}:00 "),
            Style::default().fg(Color::DarkGray),
        )];
        for (col, day) in days.iter().enumerate() {
            let slot = AvailabilitySlot { date: *day, hour };
            let selected = grid.is_selected(&slot);
            let under_cursor = col == cursor_day && row == cursor_row;

            let symbol = if selected { "  ■   " } else { "  ·   " };
            let mut style = if selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if under_cursor {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(symbol, style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
