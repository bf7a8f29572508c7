//! Tellerdeck - a terminal client for bank branch operations.
//!
//! This application provides a fast, keyboard-driven interface for
//! viewing accounts, submitting transfers, and reviewing the audit
//! trail of a bank operations backend.

mod api;
mod app;
mod auth;
mod cache;
mod config;
mod models;
mod nav;
mod ui;
mod utils;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Route logs to stderr, filtered by RUST_LOG (warn by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; missing files are not an error
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--login") {
        return login_interactive().await;
    }

    info!("Tellerdeck starting");

    let mut app = App::new()?;

    // Show cached data immediately, refresh behind it
    app.load_from_cache();
    if app.is_authenticated() && app.is_cache_stale() {
        app.refresh_all_background();
    }

    // Optional deep link: `tellerdeck /accounts` opens on that route,
    // passing through the gate like any other navigation
    if let Some(path) = args.iter().skip(1).find(|a| a.starts_with('/')) {
        if !app.open_path(path) {
            warn!(path = %path, "Unknown route requested on startup");
        }
    }

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app).await;
    restore_terminal(&mut terminal)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Tellerdeck shutting down");
    Ok(())
}

/// Authenticate from the command line and persist the session, so the
/// TUI starts signed in. Useful over SSH where the form is awkward.
async fn login_interactive() -> Result<()> {
    use auth::CredentialStore;

    let mut app = App::new()?;

    println!("\n=== Tellerdeck Login ===\n");

    let username = {
        let default = app.config.last_username.clone();
        match default {
            Some(ref last_user) => {
                print!("Username [{}]: ", last_user);
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                let input = input.trim();

                if input.is_empty() {
                    last_user.clone()
                } else {
                    input.to_string()
                }
            }
            None => {
                print!("Username: ");
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                input.trim().to_string()
            }
        }
    };

    let password = match CredentialStore::for_user(&username).recall() {
        Some(stored) => {
            print!("Use stored password? [Y/n]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if input.trim().to_lowercase() == "n" {
                rpassword::prompt_password("Password: ")?
            } else {
                stored
            }
        }
        None => rpassword::prompt_password("Password: ")?,
    };

    println!("\nAuthenticating...");

    app.login_username = username;
    app.login_password = password;
    app.attempt_login().await?;

    println!("Login successful.\n");
    Ok(())
}

async fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    while !matches!(app.state, AppState::Quitting) {
        terminal.draw(|f| render(f, app))?;

        // Short poll timeout keeps background refresh results flowing
        // into state even while the keyboard is idle
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                let ctrl_c = key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL);
                if ctrl_c || handle_input(app, key).await? {
                    break;
                }
            }
        }

        app.check_background_tasks();
    }
    Ok(())
}
