//! Field rendering utilities for forms

use crate::state::{FieldValue, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Lines a field occupies on screen, border included
pub fn field_height(field: &FormField) -> u16 {
    match &field.value {
        FieldValue::MultiChoice { options, .. } => options.len() as u16 + 2,
        _ if field.is_multiline => 5,
        _ => 3,
    }
}

/// Draw a form field, with its validation error underneath when present
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    is_active: bool,
    error: Option<&str>,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_style = if error.is_some() {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let cursor = if is_active { "▌" } else { "" };

    let content = match &field.value {
        FieldValue::MultiChoice {
            selected, options, ..
        } => {
            let lines: Vec<Line> = options
                .iter()
                .map(|option| {
                    let checked = selected.iter().any(|s| s == option);
                    let mark = if checked { "[x] " } else { "[ ] " };
                    let option_style = if field.option_disabled(option) {
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::DIM)
                    } else if checked {
                        Style::default().fg(Color::Green)
                    } else {
                        style
                    };
                    Line::from(Span::styled(format!("{mark}{option}"), option_style))
                })
                .collect();
            Paragraph::new(lines)
        }
        _ if field.is_multiline => {
            let display = field.display_value();
            let mut lines: Vec<Line> = display.lines().map(|l| Line::from(l.to_string())).collect();
            if is_active {
                if let Some(last) = lines.last_mut() {
                    last.spans
                        .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
                } else {
                    lines.push(Line::from(Span::styled(
                        cursor,
                        Style::default().fg(Color::Cyan),
                    )));
                }
            }
            Paragraph::new(lines)
        }
        _ => {
            let display_value = field.display_value();
            let display_str = if display_value.is_empty() && !is_active {
                "(empty)".to_string()
            } else {
                display_value
            };
            Paragraph::new(Line::from(vec![
                Span::styled(display_str, style),
                Span::styled(cursor, Style::default().fg(Color::Cyan)),
            ]))
        }
    };

    let title = match error {
        Some(message) => format!(" {} — {message} ", field.label),
        None => format!(" {} ", field.label),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}
