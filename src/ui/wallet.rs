//! Tutor wallet: balance, transaction history, withdrawal form

use super::forms::draw_field;
use crate::app::App;
use crate::state::{format_cents, Form, FormState, TransactionKind};
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
            Constraint::Length(3), // Balance
            Constraint::Length(8), // Withdrawal form
            Constraint::Min(0),    // Transactions
        ])
        .split(area);

    draw_balance(frame, chunks[0], app);
    draw_withdraw_form(frame, chunks[1], app);
    draw_transactions(frame, chunks[2], app);
}

fn draw_balance(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Balance ").borders(Borders::ALL);
    let line = match &app.state.wallet {
        Some(wallet) => Line::from(Span::styled(
            format_cents(wallet.balance_cents, &wallet.currency),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "Press r to load your wallet",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_withdraw_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Withdraw ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let FormState::Withdraw(form) = &app.form else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
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

fn draw_transactions(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" History ").borders(Borders::ALL);

    let lines: Vec<Line> = match &app.state.wallet {
        Some(wallet) if !wallet.transactions.is_empty() => wallet
            .transactions
            .iter()
            .map(|tx| {
                let amount_style = match tx.kind {
                    TransactionKind::LessonPayout => Style::default().fg(Color::Green),
                    TransactionKind::Withdrawal => Style::default().fg(Color::Yellow),
                    TransactionKind::Refund => Style::default().fg(Color::Red),
                };
                let mut spans = vec![
                    Span::raw(format!("{}  ", tx.created_at.format("%d %b %H:%M"))),
                    Span::styled(
                        format!("{:>12}  ", format_cents(tx.amount_cents, &wallet.currency)),
                        amount_style,
                    ),
                    Span::raw(tx.kind.label()),
                ];
                if let Some(note) = &tx.note {
                    spans.push(Span::styled(
                        format!("  — {note}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                Line::from(spans)
            })
            .collect(),
        Some(_) => vec![Line::from(Span::styled(
            "No transactions yet",
            Style::default().fg(Color::DarkGray),
        ))],
        None => vec![],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
