use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_users(frame, app, chunks[0]);
    render_audit_log(frame, app, chunks[1]);
}

fn render_users(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Users ({}) ", app.users.len()))
        .borders(Borders::ALL)
        .border_style(styles::pane_style(app.focus == Focus::List));

    if app.users.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No user data (admin role required)",
                    styles::dim_style(),
                )),
            ])
            .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .users
        .iter()
        .map(|user| {
            let mfa = if user.mfa_enabled { "mfa" } else { "   " };
            let line = Line::from(vec![
                Span::styled(format!("{:>4}  ", user.id), styles::dim_style()),
                Span::styled(
                    format!("{:<16}", truncate_string(&user.username, 16)),
                    styles::text_style(),
                ),
                Span::styled(format!("{}  ", mfa), styles::ok_style()),
                Span::styled(user.roles_display(), styles::dim_style()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    state.select(Some(app.user_selection.min(app.users.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_audit_log(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Audit trail ({}) ", app.audit_log.len()))
        .borders(Borders::ALL)
        .border_style(styles::pane_style(app.focus == Focus::Detail));

    if app.audit_log.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No audit data (admin role required)",
                    styles::dim_style(),
                )),
            ])
            .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .audit_log
        .iter()
        .map(|entry| {
            let when = entry
                .timestamp
                .map(|t| t.format("%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            let line = Line::from(vec![
                Span::styled(format!("{:<12}", when), styles::dim_style()),
                Span::styled(format!("{:<10}", entry.actor_display()), styles::text_style()),
                Span::styled(
                    format!("{:<18}", truncate_string(&entry.action, 18)),
                    styles::value_style(),
                ),
                Span::styled(
                    truncate_string(&entry.resource, 24),
                    styles::dim_style(),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    state.select(Some(app.audit_selection.min(app.audit_log.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}
