//! Lesson list, detail, and the booking/reschedule forms

use super::forms::draw_field;
use crate::app::App;
use crate::state::{Form, FormState, Lesson, LessonStatus};
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

fn status_style(lesson: &Lesson) -> Style {
    let color = match lesson.status {
        LessonStatus::Scheduled => Color::Blue,
        LessonStatus::InProgress => Color::Green,
        LessonStatus::Completed => Color::Gray,
        LessonStatus::Cancelled => Color::Red,
        LessonStatus::RescheduleRequested => Color::Yellow,
    };
    Style::default().fg(color)
}

pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let now = Utc::now();
    let lessons = app.state.sorted_lessons(now);

    let title = format!(
        " Lessons ({}) — sort: {} {} {} ",
        lessons.len(),
        app.state.lesson_sort_field.label(),
        app.state.lesson_sort_direction.symbol(),
        if app.state.show_past_lessons {
            "(incl. past)"
        } else {
            ""
        }
    );

    let items: Vec<ListItem> = lessons
        .iter()
        .map(|lesson| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", lesson.language),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!(
                    "{}  {:>3}min  with {}  ",
                    lesson.starts_at.format("%a %d %b %H:%M"),
                    lesson.duration_minutes,
                    lesson.tutor_name
                )),
                Span::styled(lesson.status.label(), status_style(lesson)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = ListState::default();
    if !lessons.is_empty() {
        state.select(Some(app.state.selected_index.min(lessons.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Lesson ").borders(Borders::ALL);

    let Some(lesson) = app.state.selected_lesson() else {
        frame.render_widget(
            Paragraph::new("Lesson not found").block(block),
            area,
        );
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                &lesson.language,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(lesson.status.label(), status_style(lesson)),
        ]),
        Line::from(""),
        Line::from(format!("Tutor:    {}", lesson.tutor_name)),
        Line::from(format!("Student:  {}", lesson.student_name)),
        Line::from(format!(
            "When:     {} ({} min)",
            lesson.starts_at.format("%A %d %B, %H:%M"),
            lesson.duration_minutes
        )),
    ];

    if let Some(link) = &lesson.meeting_link {
        lines.push(Line::from(vec![
            Span::raw("Meeting:  "),
            Span::styled(link, Style::default().fg(Color::Blue)),
            Span::styled("  (m to copy)", Style::default().fg(Color::DarkGray)),
        ]));
    }
    if let Some(notes) = &lesson.notes {
        lines.push(Line::from(""));
        lines.push(Line::from(notes.as_str()));
    }
    if lesson.is_startable(Utc::now()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Ready to start — press s",
            Style::default().fg(Color::Green),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_form_fields<F: Form>(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    form: &F,
    title: &str,
) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints: Vec<Constraint> = (0..form.field_count())
        .map(|i| {
            let multiline = form.get_field(i).is_some_and(|f| f.is_multiline);
            Constraint::Length(if multiline { 5 } else { 3 })
        })
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for i in 0..form.field_count() {
        if let Some(field) = form.get_field(i) {
            draw_field(
                frame,
                chunks[i],
                field,
                form.active_field() == i,
                app.form_errors.get(&field.name).map(String::as_str),
            );
        }
    }
}

pub fn draw_create(frame: &mut Frame, area: Rect, app: &App) {
    if let FormState::LessonCreate(form) = &app.form {
        draw_form_fields(frame, area, app, form, "Book a lesson");
    }
}

pub fn draw_reschedule(frame: &mut Frame, area: Rect, app: &App) {
    if let FormState::Reschedule(form) = &app.form {
        draw_form_fields(frame, area, app, form, "Request reschedule");
    }
}
