//! Shared renderer for multi-step wizards

use super::forms::{draw_field, field_height};
use crate::wizard::Wizard;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw a wizard: titled frame, step indicator, current-step fields
pub fn draw(frame: &mut Frame, area: Rect, wizard: &Wizard, title: &str) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = wizard.current_step_fields();
    let mut constraints = vec![Constraint::Length(2)]; // Step indicator
    for &i in &fields {
        constraints.push(Constraint::Length(field_height(&wizard.fields()[i])));
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    draw_step_indicator(frame, chunks[0], wizard);

    let active = wizard.active_field();
    for (slot, &i) in fields.iter().enumerate() {
        let field = &wizard.fields()[i];
        let is_active = active.is_some_and(|a| a.name == field.name);
        draw_field(
            frame,
            chunks[slot + 1],
            field,
            is_active,
            wizard.error_for(&field.name),
        );
    }
}

fn draw_step_indicator(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let current = wizard.step_index();
    let mut spans = vec![Span::raw(" ")];
    for (i, name) in wizard.step_names().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if i < current {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{}. {name}", i + 1), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
