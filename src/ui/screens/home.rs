use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Welcome to Tellerdeck",
            styles::header_style(),
        )),
        Line::from(""),
    ];

    match app.session.username() {
        Some(username) => {
            lines.push(Line::from(vec![
                Span::raw("  Signed in as "),
                Span::styled(username.to_string(), styles::value_style()),
            ]));
            if app.session.has_role("admin") {
                lines.push(Line::from(Span::styled(
                    "  Administrator session",
                    styles::dim_style(),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw("  Accounts on file: "),
                Span::styled(app.accounts.len().to_string(), styles::value_style()),
            ]));
        }
        None => {
            lines.push(Line::from(Span::raw(
                "  You are browsing anonymously. Account data, transfers,",
            )));
            lines.push(Line::from(Span::raw(
                "  and the audit trail require a signed-in session.",
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw("  Press "),
                Span::styled("l", styles::key_style()),
                Span::raw(" to sign in, or pick a screen and you will be"),
            ]));
            lines.push(Line::from(Span::raw(
                "  routed through sign-in on the way there.",
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("  Backend: "),
        Span::styled(app.config.api_base_url(), styles::dim_style()),
    ]));

    let block = Block::default()
        .title(" Home ")
        .borders(Borders::ALL)
        .border_style(styles::pane_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
