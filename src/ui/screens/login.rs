use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut height = 12;
    if app.otp_required {
        height += 1;
    }
    if app.login_error.is_some() {
        height += 2;
    }
    let area = centered_rect_fixed(46, height, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "      ╔╦╗╔═╗╦  ╦  ╔═╗╦═╗╔╦╗╔═╗╔═╗╦╔═",
            styles::header_style(),
        )),
        Line::from(Span::styled(
            "       ║ ║╣ ║  ║  ║╣ ╠╦╝ ║║║╣ ║  ╠╩╗",
            styles::header_style(),
        )),
        Line::from(Span::styled(
            "       ╩ ╚═╝╩═╝╩═╝╚═╝╩╚══╩╝╚═╝╚═╝╩ ╩",
            styles::header_style(),
        )),
        Line::from(""),
    ];

    lines.push(field_line(
        "Username:",
        &app.login_username,
        app.login_focus == LoginFocus::Username,
    ));

    let password_masked: String = "*".repeat(app.login_password.len().min(16));
    lines.push(field_line(
        "Password:",
        &password_masked,
        app.login_focus == LoginFocus::Password,
    ));

    if app.otp_required {
        lines.push(field_line(
            "Passcode:",
            &app.login_otp,
            app.login_focus == LoginFocus::Otp,
        ));
    }

    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    lines.push(Line::from(""));
    let label = if button_focused {
        " ▶ Sign in ◀ "
    } else {
        "   Sign in   "
    };
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::alert_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::pane_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("      "),
        Span::styled(format!("{} [", label), styles::dim_style()),
        Span::styled(format!("{:<16}{}", value, cursor), style),
        Span::styled("]", styles::dim_style()),
    ])
}
