use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, TransferFocus};
use crate::ui::styles;
use crate::utils::format_cents;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(20)])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_recent(frame, app, chunks[1]);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<10}[", label), styles::dim_style()),
        Span::styled(format!("{:<14}{}", value, cursor), style),
        Span::styled("]", styles::dim_style()),
    ])
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        field_line(
            "From:",
            &app.transfer_from,
            app.transfer_focus == TransferFocus::From,
        ),
        field_line(
            "To:",
            &app.transfer_to,
            app.transfer_focus == TransferFocus::To,
        ),
        field_line(
            "Amount:",
            &app.transfer_amount,
            app.transfer_focus == TransferFocus::Amount,
        ),
        Line::from(""),
    ];

    let button_focused = app.transfer_focus == TransferFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    let label = if button_focused {
        " ▶ Submit ◀ "
    } else {
        "   Submit   "
    };
    lines.push(Line::from(vec![
        Span::raw("        ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.transfer_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::alert_style(),
        )));
    }

    let block = Block::default()
        .title(" New transfer ")
        .borders(Borders::ALL)
        .border_style(styles::pane_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recent(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from("")];

    // Flatten all known histories, newest ids first
    let mut recent: Vec<_> = app.transactions.values().flatten().collect();
    recent.sort_by(|a, b| b.id.cmp(&a.id));
    recent.dedup_by_key(|tx| tx.id);

    if recent.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No transactions on record",
            styles::dim_style(),
        )));
    }

    for tx in recent.iter().take(area.height.saturating_sub(3) as usize) {
        let amount = tx
            .amount_cents()
            .map(format_cents)
            .unwrap_or_else(|| tx.amount.clone());
        lines.push(Line::from(vec![
            Span::styled(format!("  #{:<6}", tx.id), styles::dim_style()),
            Span::styled(
                format!("{:<6} → {:<6}", tx.from_account_id, tx.to_account_id),
                styles::text_style(),
            ),
            Span::styled(format!("{:>12}  ", amount), styles::value_style()),
            Span::styled(tx.status.to_string(), styles::dim_style()),
        ]));
    }

    let block = Block::default()
        .title(" Recent transfers ")
        .borders(Borders::ALL)
        .border_style(styles::pane_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
