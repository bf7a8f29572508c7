//! Main frame rendering and layout.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
use crate::nav::Screen;

use super::screens::{accounts, audit, home, login, transfers};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Screen tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Tellerdeck";
    let session_hint = match app.session.username() {
        Some(username) => format!("{} | [?] Help", username),
        None => "not signed in | [?] Help".to_string(),
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::header_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.len() + session_hint.len() + 4),
        )),
        Span::styled(session_hint, styles::dim_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::dim_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        ('1', Screen::Home),
        ('2', Screen::Accounts),
        ('3', Screen::Transfers),
        ('4', Screen::Audit),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, screen)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::dim_style()));
        }
        let label = format!("[{}] {}", key, screen.title());
        if app.screen == *screen {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::dim_style()));
        }
    }

    if app.screen == Screen::Login {
        spans.push(Span::styled(" | ", styles::dim_style()));
        spans.push(Span::styled("Sign in", styles::tab_style(true)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::dim_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.screen {
        Screen::Home => home::render(frame, app, area),
        Screen::Accounts => accounts::render(frame, app, area),
        Screen::Transfers => transfers::render(frame, app, area),
        Screen::Audit => audit::render(frame, app, area),
        Screen::Login => login::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let last_updated = app.cache_ages.last_updated();
    let shortcuts = if app.is_authenticated() {
        "[u]pdate | [l]ogout | [q]uit"
    } else {
        "[l]ogin | [q]uit"
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(" Updated {} ", last_updated)
    };

    let right_text = format!(" {} ", shortcuts);
    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::dim_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::dim_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 18, frame.area());
    frame.render_widget(Clear, area);

    let rows: Vec<(&str, &str)> = vec![
        ("1-4", "Jump to screen"),
        ("Tab / Shift-Tab", "Next / previous screen"),
        ("j / k", "Move selection"),
        ("Enter", "Open detail / submit form"),
        ("Esc", "Back"),
        ("o / b / i", "Sort accounts by owner/balance/id"),
        ("u", "Refresh data"),
        ("l", "Log in / log out"),
        ("q", "Quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, desc) in rows {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<16}", key), styles::key_style()),
            Span::styled(desc, styles::text_style()),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(styles::pane_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(36, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Quit Tellerdeck? [y/n]",
            styles::text_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::pane_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// A fixed-size rect centered in `r`, clamped to its bounds
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    let x = r.x + (r.width - width) / 2;
    let y = r.y + (r.height - height) / 2;
    Rect::new(x, y, width, height)
}
