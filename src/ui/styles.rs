// Allow dead code: Style helpers defined for consistent UI
#![allow(dead_code)]

use ratatui::style::{Color, Modifier, Style};

// Palette
pub const NAVY: Color = Color::Rgb(56, 108, 176);
pub const GREEN: Color = Color::Rgb(88, 152, 96);
pub const GOLD: Color = Color::Rgb(200, 168, 72);
pub const RED: Color = Color::Rgb(200, 72, 64);
pub const GRAY: Color = Color::Rgb(132, 132, 132);
pub const ROW_BG: Color = Color::Rgb(44, 44, 60);
pub const BAR_BG: Color = Color::Rgb(28, 28, 36);

pub fn header_style() -> Style {
    Style::default().fg(NAVY).add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn dim_style() -> Style {
    Style::default().fg(GRAY)
}

/// Balances, counts, and other figures the eye should land on
pub fn value_style() -> Style {
    Style::default().fg(GOLD)
}

pub fn ok_style() -> Style {
    Style::default().fg(GREEN)
}

pub fn alert_style() -> Style {
    Style::default().fg(RED)
}

pub fn selected_style() -> Style {
    Style::default().bg(ROW_BG).add_modifier(Modifier::BOLD)
}

pub fn key_style() -> Style {
    Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
}

pub fn tab_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(NAVY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn pane_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(NAVY)
    } else {
        Style::default().fg(GRAY)
    }
}

pub fn bar_style() -> Style {
    Style::default().bg(BAR_BG).fg(Color::White)
}

/// Red for debits, green for credits on transaction lists
pub fn amount_style(debit: bool) -> Style {
    if debit {
        alert_style()
    } else {
        ok_style()
    }
}
