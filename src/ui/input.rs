//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Every screen change requested here goes
//! through `App::navigate`, so the gate sees it before the next draw.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_account_id_char, can_add_amount_char, can_add_otp_char, can_add_password_char,
    can_add_username_char, App, AppState, Focus, LoginFocus, TransferFocus, PAGE_SCROLL_SIZE,
};
use crate::models::AccountSortColumn;
use crate::nav::Screen;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Screens with text entry get their own handlers; fall through for
    // anything they don't consume
    match app.screen {
        Screen::Login => return handle_login_input(app, key).await,
        Screen::Transfers => {
            if handle_transfer_input(app, key).await? {
                return Ok(false);
            }
        }
        _ => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('u') => {
            app.refresh_all_background();
        }
        KeyCode::Char('l') => {
            if app.is_authenticated() {
                app.logout().await;
            } else {
                app.navigate(Screen::Login);
            }
        }
        KeyCode::Tab => app.next_screen(),
        KeyCode::BackTab => app.prev_screen(),
        KeyCode::Char('1') => app.navigate(Screen::Home),
        KeyCode::Char('2') => app.navigate(Screen::Accounts),
        KeyCode::Char('3') => app.navigate(Screen::Transfers),
        KeyCode::Char('4') => app.navigate(Screen::Audit),
        _ => match app.screen {
            Screen::Accounts => handle_accounts_input(app, key),
            Screen::Audit => handle_audit_input(app, key),
            _ => {}
        },
    }

    Ok(false)
}

fn handle_accounts_input(app: &mut App, key: KeyEvent) {
    let len = app.accounts.len();
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            if len > 0 {
                app.account_selection = (app.account_selection + 1).min(len - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.account_selection = app.account_selection.saturating_sub(1);
        }
        KeyCode::PageDown => {
            if len > 0 {
                app.account_selection = (app.account_selection + PAGE_SCROLL_SIZE).min(len - 1);
            }
        }
        KeyCode::PageUp => {
            app.account_selection = app.account_selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::Enter => app.focus = Focus::Detail,
        KeyCode::Esc => app.focus = Focus::List,
        KeyCode::Char('o') => app.toggle_account_sort(AccountSortColumn::Owner),
        KeyCode::Char('b') => app.toggle_account_sort(AccountSortColumn::Balance),
        KeyCode::Char('i') => app.toggle_account_sort(AccountSortColumn::Id),
        _ => {}
    }
}

fn handle_audit_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.focus = Focus::List,
        KeyCode::Right => app.focus = Focus::Detail,
        KeyCode::Down | KeyCode::Char('j') => match app.focus {
            Focus::List => {
                let len = app.users.len();
                if len > 0 {
                    app.user_selection = (app.user_selection + 1).min(len - 1);
                }
            }
            Focus::Detail => {
                let len = app.audit_log.len();
                if len > 0 {
                    app.audit_selection = (app.audit_selection + 1).min(len - 1);
                }
            }
        },
        KeyCode::Up | KeyCode::Char('k') => match app.focus {
            Focus::List => app.user_selection = app.user_selection.saturating_sub(1),
            Focus::Detail => app.audit_selection = app.audit_selection.saturating_sub(1),
        },
        _ => {}
    }
}

/// Handle input on the transfer form. Returns true if the key was
/// consumed by the form (numeric fields leave letters free for the
/// global shortcuts).
async fn handle_transfer_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.navigate(Screen::Home);
            Ok(true)
        }
        KeyCode::Down => {
            app.transfer_focus = match app.transfer_focus {
                TransferFocus::From => TransferFocus::To,
                TransferFocus::To => TransferFocus::Amount,
                TransferFocus::Amount => TransferFocus::Button,
                TransferFocus::Button => TransferFocus::From,
            };
            Ok(true)
        }
        KeyCode::Up => {
            app.transfer_focus = match app.transfer_focus {
                TransferFocus::From => TransferFocus::Button,
                TransferFocus::To => TransferFocus::From,
                TransferFocus::Amount => TransferFocus::To,
                TransferFocus::Button => TransferFocus::Amount,
            };
            Ok(true)
        }
        KeyCode::Enter => {
            match app.transfer_focus {
                TransferFocus::From => app.transfer_focus = TransferFocus::To,
                TransferFocus::To => app.transfer_focus = TransferFocus::Amount,
                TransferFocus::Amount => app.transfer_focus = TransferFocus::Button,
                TransferFocus::Button => {
                    let _ = app.attempt_transfer().await;
                }
            }
            Ok(true)
        }
        KeyCode::Backspace => {
            match app.transfer_focus {
                TransferFocus::From => {
                    app.transfer_from.pop();
                }
                TransferFocus::To => {
                    app.transfer_to.pop();
                }
                TransferFocus::Amount => {
                    app.transfer_amount.pop();
                }
                TransferFocus::Button => {}
            }
            Ok(true)
        }
        KeyCode::Char(c) => {
            let consumed = match app.transfer_focus {
                TransferFocus::From => {
                    if can_add_account_id_char(app.transfer_from.len(), c) {
                        app.transfer_from.push(c);
                        true
                    } else {
                        false
                    }
                }
                TransferFocus::To => {
                    if can_add_account_id_char(app.transfer_to.len(), c) {
                        app.transfer_to.push(c);
                        true
                    } else {
                        false
                    }
                }
                TransferFocus::Amount => {
                    if can_add_amount_char(app.transfer_amount.len(), c) {
                        app.transfer_amount.push(c);
                        true
                    } else {
                        false
                    }
                }
                TransferFocus::Button => false,
            };
            Ok(consumed)
        }
        _ => Ok(false),
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let next_of = |focus: LoginFocus, otp: bool| match focus {
        LoginFocus::Username => LoginFocus::Password,
        LoginFocus::Password => {
            if otp {
                LoginFocus::Otp
            } else {
                LoginFocus::Button
            }
        }
        LoginFocus::Otp => LoginFocus::Button,
        LoginFocus::Button => LoginFocus::Username,
    };
    let prev_of = |focus: LoginFocus, otp: bool| match focus {
        LoginFocus::Username => LoginFocus::Button,
        LoginFocus::Password => LoginFocus::Username,
        LoginFocus::Otp => LoginFocus::Password,
        LoginFocus::Button => {
            if otp {
                LoginFocus::Otp
            } else {
                LoginFocus::Password
            }
        }
    };

    match key.code {
        KeyCode::Esc => {
            // Login is a routed screen, not a modal; back out to Home
            app.navigate(Screen::Home);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = next_of(app.login_focus, app.otp_required);
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = prev_of(app.login_focus, app.otp_required);
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Button => {
                let _ = app.attempt_login().await;
            }
            focus => {
                app.login_focus = next_of(focus, app.otp_required);
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Otp => {
                app.login_otp.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Otp => {
                if can_add_otp_char(app.login_otp.len(), c) {
                    app.login_otp.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}
