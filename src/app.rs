//! Application state management for Tellerdeck.
//!
//! This module contains the core `App` struct that manages all application
//! state, including UI state, cached data, the session, and background
//! task coordination. Screen changes go through `App::navigate`, which
//! consults the navigation gate before anything renders.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{CredentialStore, Session};
use crate::cache::manager::CacheAges;
use crate::cache::CacheManager;
use crate::config::Config;
use crate::models::{Account, AccountSortColumn, AuditEntry, Transaction, User};
use crate::nav::{NavigationGate, Resolution, Screen};
use crate::utils::{cmp_ignore_case, parse_cents};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 is sufficient for a full refresh (a handful of API calls) with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
/// Backend usernames are capped at 64 chars.
const MAX_USERNAME_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for one-time passcode input (6-digit TOTP).
const MAX_OTP_LENGTH: usize = 6;

/// Maximum length for amount input on the transfer form ("9999999.99").
const MAX_AMOUNT_LENGTH: usize = 10;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Maximum concurrent API requests when fetching per-account histories.
const MAX_CONCURRENT_REQUESTS: usize = 5;

// ============================================================================
// UI State Types
// ============================================================================

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Otp,
    Button,
}

/// Transfer form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferFocus {
    From,
    To,
    Amount,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background refresh tasks, sent through an MPSC
/// channel back to the main loop.
enum RefreshResult {
    Accounts(Vec<Account>),
    /// Transaction history for a single account (account_id, transactions)
    Transactions(i64, Vec<Transaction>),
    Users(Vec<User>),
    AuditLog(Vec<AuditEntry>),
    /// Signal that all refresh tasks have completed
    RefreshComplete,
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,
    pub cache: CacheManager,
    pub gate: NavigationGate,

    // UI State
    pub state: AppState,
    pub screen: Screen,
    /// Protected screen the gate denied; replayed after a successful login
    pending_screen: Option<Screen>,
    pub focus: Focus,
    pub account_sort_column: AccountSortColumn,
    pub account_sort_ascending: bool,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_otp: String,
    pub otp_required: bool,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Transfer form state
    pub transfer_from: String,
    pub transfer_to: String,
    pub transfer_amount: String,
    pub transfer_focus: TransferFocus,
    pub transfer_error: Option<String>,

    // Selection indices
    pub account_selection: usize,
    pub user_selection: usize,
    pub audit_selection: usize,

    // Cached data
    pub accounts: Vec<Account>,
    /// Transaction histories keyed by account id
    pub transactions: HashMap<i64, Vec<Transaction>>,
    pub users: Vec<User>,
    pub audit_log: Vec<AuditEntry>,

    // Background task channel
    refresh_rx: Option<mpsc::Receiver<RefreshResult>>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    // Status message
    pub status_message: Option<String>,

    // Cache ages for status bar
    pub cache_ages: CacheAges,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = config.data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        debug!(?data_dir, "Data directory configured");

        // Restore the session from disk if a durable entry exists
        let mut session = Session::new(data_dir.clone());
        let restored = session.load();
        debug!(restored, "Session loaded");

        let mut api = ApiClient::new(&config.api_base_url())?;
        if let Some(token) = session.token() {
            api.set_token(token.to_string());
            debug!("Token set on API client");
        }

        let cache = CacheManager::new(data_dir)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Seed the login form from env vars or config
        let login_username = std::env::var("TELLERDECK_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var("TELLERDECK_PASSWORD").unwrap_or_default();

        let mut app = Self {
            config,
            session,
            api,
            cache,
            gate: NavigationGate::default(),

            state: AppState::Normal,
            screen: Screen::Home,
            pending_screen: None,
            focus: Focus::List,
            account_sort_column: AccountSortColumn::Owner,
            account_sort_ascending: true,

            login_username,
            login_password,
            login_otp: String::new(),
            otp_required: false,
            login_focus: LoginFocus::Username,
            login_error: None,

            transfer_from: String::new(),
            transfer_to: String::new(),
            transfer_amount: String::new(),
            transfer_focus: TransferFocus::From,
            transfer_error: None,

            account_selection: 0,
            user_selection: 0,
            audit_selection: 0,

            accounts: Vec::new(),
            transactions: HashMap::new(),
            users: Vec::new(),
            audit_log: Vec::new(),

            refresh_rx: Some(rx),
            refresh_tx: tx,

            status_message: None,
            cache_ages: CacheAges::default(),
        };

        // The initial screen goes through the gate like any other
        app.navigate(Screen::Home);
        Ok(app)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Request a screen change. The gate decides what actually renders;
    /// a denied target is remembered and replayed after login.
    pub fn navigate(&mut self, target: Screen) {
        match self.gate.resolve(target, &self.session) {
            Resolution::Proceed(screen) => {
                self.screen = screen;
            }
            Resolution::Redirect(login) => {
                debug!(?target, "Navigation gated, redirecting to login");
                self.pending_screen = Some(target);
                self.screen = login;
                self.start_login();
            }
        }
    }

    pub fn next_screen(&mut self) {
        self.navigate(self.screen.next());
    }

    pub fn prev_screen(&mut self) {
        self.navigate(self.screen.prev());
    }

    /// Jump to a route by its path (deep-link style, from the CLI).
    /// Returns false if the path is not in the route table.
    pub fn open_path(&mut self, path: &str) -> bool {
        let screen = self.gate.table().find_by_path(path).map(|r| r.screen);
        match screen {
            Some(screen) => {
                self.navigate(screen);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Prepare the login form and focus the first empty field
    pub fn start_login(&mut self) {
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.clone();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        let otp = if self.otp_required && !self.login_otp.is_empty() {
            Some(self.login_otp.clone())
        } else {
            None
        };

        self.login_error = None;

        match self.api.login(&username, &password, otp.as_deref()).await {
            Ok(session_data) => {
                if let Err(e) = CredentialStore::for_user(&username).remember(&password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.api.set_token(session_data.token.clone());
                self.session.login(session_data);

                self.login_password.clear();
                self.login_otp.clear();
                self.otp_required = false;
                info!("Login successful");

                // Replay the screen the gate denied, or land on Home
                let target = self.pending_screen.take().unwrap_or(Screen::Home);
                self.navigate(target);

                self.refresh_all_background();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let user_message = match e.downcast_ref::<ApiError>() {
                    Some(ApiError::MfaRequired) => {
                        self.otp_required = true;
                        self.login_focus = LoginFocus::Otp;
                        "Enter the one-time passcode from your authenticator".to_string()
                    }
                    Some(ApiError::Unauthorized) => "Invalid username or password".to_string(),
                    Some(ApiError::NetworkError(_)) => {
                        "Unable to connect to server. Check your connection.".to_string()
                    }
                    _ => format!("Login failed: {}", e),
                };
                self.login_error = Some(user_message);
                Err(e)
            }
        }
    }

    /// Revoke the token (best-effort), clear the session, and return to
    /// the public home screen. Cached account data is wiped so nothing
    /// lingers on a shared terminal.
    pub async fn logout(&mut self) {
        if self.is_authenticated() {
            if let Err(e) = self.api.logout().await {
                warn!(error = %e, "Token revocation failed, clearing session anyway");
            }
        }
        self.session.logout();
        self.api.clear_token();
        self.pending_screen = None;

        self.cache.clear();
        self.accounts.clear();
        self.transactions.clear();
        self.users.clear();
        self.audit_log.clear();
        self.cache_ages = CacheAges::default();

        info!("Logged out");
        self.navigate(Screen::Home);
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Accounts in the current sort order
    pub fn sorted_accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.iter().collect();
        accounts.sort_by(|a, b| {
            let ord = match self.account_sort_column {
                AccountSortColumn::Id => a.id.cmp(&b.id),
                AccountSortColumn::Owner => cmp_ignore_case(&a.owner, &b.owner),
                AccountSortColumn::Balance => a.balance_cents().cmp(&b.balance_cents()),
            };
            if self.account_sort_ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        accounts
    }

    pub fn selected_account(&self) -> Option<&Account> {
        self.sorted_accounts().get(self.account_selection).copied()
    }

    pub fn toggle_account_sort(&mut self, column: AccountSortColumn) {
        if self.account_sort_column == column {
            self.account_sort_ascending = !self.account_sort_ascending;
        } else {
            self.account_sort_column = column;
            self.account_sort_ascending = true;
        }
        self.account_selection = 0;
    }

    /// Transactions for the currently selected account, newest first
    pub fn selected_account_transactions(&self) -> &[Transaction] {
        self.selected_account()
            .and_then(|a| self.transactions.get(&a.id))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    /// Validate the transfer form. Returns (from, to, amount_cents).
    fn validate_transfer(from: &str, to: &str, amount: &str) -> Result<(i64, i64, i64), String> {
        let from: i64 = from
            .parse()
            .map_err(|_| "Source account id must be a number".to_string())?;
        let to: i64 = to
            .parse()
            .map_err(|_| "Destination account id must be a number".to_string())?;
        if from == to {
            return Err("Source and destination must differ".to_string());
        }
        let cents = parse_cents(amount).ok_or_else(|| "Invalid amount".to_string())?;
        if cents <= 0 {
            return Err("Amount must be positive".to_string());
        }
        Ok((from, to, cents))
    }

    /// Submit the transfer form to the backend
    pub async fn attempt_transfer(&mut self) -> Result<()> {
        let (from, to, cents) = match Self::validate_transfer(
            &self.transfer_from,
            &self.transfer_to,
            &self.transfer_amount,
        ) {
            Ok(parsed) => parsed,
            Err(msg) => {
                self.transfer_error = Some(msg.clone());
                return Err(anyhow::anyhow!(msg));
            }
        };

        self.transfer_error = None;

        match self.api.submit_transfer(from, to, cents).await {
            Ok(tx) => {
                info!(id = tx.id, "Transfer completed");
                self.status_message = Some(format!("Transfer #{} {}", tx.id, tx.status));
                self.transfer_amount.clear();
                self.transfer_focus = TransferFocus::From;
                self.refresh_all_background();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Transfer failed");
                let user_message = match e.downcast_ref::<ApiError>() {
                    Some(ApiError::Unauthorized) => "Session expired. Log in again.".to_string(),
                    Some(ApiError::NotFound(_)) => "No such account".to_string(),
                    _ if e.to_string().contains("Insufficient funds") => {
                        "Insufficient funds".to_string()
                    }
                    _ => format!("Transfer failed: {}", e),
                };
                self.transfer_error = Some(user_message);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Load all data from cache for immediate display
    pub fn load_from_cache(&mut self) {
        if let Ok(Some(cached)) = self.cache.load_accounts() {
            for account in &cached.data {
                if let Ok(Some(txs)) = self.cache.load_transactions(account.id) {
                    self.transactions.insert(account.id, txs.data);
                }
            }
            self.accounts = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_users() {
            self.users = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_audit_log() {
            self.audit_log = cached.data;
        }

        self.cache_ages = self.cache.get_cache_ages();
    }

    /// Check if the cached account data is stale
    pub fn is_cache_stale(&self) -> bool {
        self.cache.accounts_stale()
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refresh all data
    pub fn refresh_all_background(&mut self) {
        if !self.is_authenticated() {
            debug!("Skipping refresh without a session");
            return;
        }

        info!("Starting background refresh of all data");
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, api).await;
        });

        self.status_message = Some("Refreshing data...".to_string());
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Execute the background refresh task.
    ///
    /// Runs in a spawned Tokio task: fetches accounts, users, and the
    /// audit log in parallel, then per-account transaction histories with
    /// limited concurrency. Admin endpoints answer 403 for non-admin
    /// sessions; those are skipped quietly.
    async fn execute_background_refresh(tx: mpsc::Sender<RefreshResult>, api: ApiClient) {
        info!("Background refresh task started");

        let (accounts_res, users_res, audit_res) = tokio::join!(
            api.fetch_accounts(),
            api.fetch_users(),
            api.fetch_audit_log(),
        );

        let account_ids: Vec<i64> = accounts_res
            .as_ref()
            .map(|list| list.iter().map(|a| a.id).collect())
            .unwrap_or_default();

        match accounts_res {
            Ok(accounts) => {
                debug!(count = accounts.len(), "Accounts fetched");
                Self::send_result(&tx, RefreshResult::Accounts(accounts)).await;
            }
            Err(e) => {
                error!(error = %e, "Accounts fetch failed");
                Self::send_result(&tx, RefreshResult::Error(format!("Accounts: {}", e))).await;
            }
        }

        Self::send_admin_result(&tx, "Users", users_res.map(RefreshResult::Users)).await;
        Self::send_admin_result(&tx, "Audit log", audit_res.map(RefreshResult::AuditLog)).await;

        // Fetch per-account histories with limited concurrency
        let tx_clone = tx.clone();
        stream::iter(account_ids)
            .map(|id| {
                let api = api.clone();
                async move { (id, api.fetch_transactions(id).await) }
            })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .for_each(|(id, result)| {
                let tx = tx_clone.clone();
                async move {
                    match result {
                        Ok(history) => {
                            Self::send_result(&tx, RefreshResult::Transactions(id, history)).await;
                        }
                        Err(e) => {
                            debug!(account_id = id, error = %e, "Transaction fetch failed");
                        }
                    }
                }
            })
            .await;

        info!("Background refresh complete");
        Self::send_result(&tx, RefreshResult::RefreshComplete).await;
    }

    /// Send an admin-endpoint result, treating 403 as "not an admin"
    /// rather than an error.
    async fn send_admin_result(
        tx: &mpsc::Sender<RefreshResult>,
        name: &str,
        result: Result<RefreshResult>,
    ) {
        match result {
            Ok(data) => {
                debug!("{} fetched successfully", name);
                Self::send_result(tx, data).await;
            }
            Err(e) => match e.downcast_ref::<ApiError>() {
                Some(ApiError::AccessDenied(_)) => {
                    debug!("{} not available for this role", name);
                }
                _ => {
                    debug!(error = %e, "{} fetch failed", name);
                }
            },
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let results: Vec<RefreshResult> = {
            if let Some(ref mut rx) = self.refresh_rx {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            } else {
                Vec::new()
            }
        };

        for result in results {
            self.process_refresh_result(result);
        }
    }

    /// Process a single refresh result from the background task,
    /// updating state and the cache.
    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Accounts(data) => {
                if let Err(e) = self.cache.save_accounts(&data) {
                    warn!(error = %e, "Failed to cache accounts");
                }
                self.accounts = data;
                self.account_selection = self
                    .account_selection
                    .min(self.accounts.len().saturating_sub(1));
                self.cache_ages = self.cache.get_cache_ages();
            }
            RefreshResult::Transactions(account_id, data) => {
                if let Err(e) = self.cache.save_transactions(account_id, &data) {
                    warn!(error = %e, "Failed to cache transactions");
                }
                self.transactions.insert(account_id, data);
            }
            RefreshResult::Users(data) => {
                if let Err(e) = self.cache.save_users(&data) {
                    warn!(error = %e, "Failed to cache users");
                }
                self.users = data;
            }
            RefreshResult::AuditLog(data) => {
                if let Err(e) = self.cache.save_audit_log(&data) {
                    warn!(error = %e, "Failed to cache audit log");
                }
                self.audit_log = data;
            }
            RefreshResult::RefreshComplete => {
                // Only clear status if it's a progress message, preserve errors
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error:") {
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                let lowered = msg.to_lowercase();
                let user_message = if lowered.contains("unauthorized") || lowered.contains("401") {
                    // Stored token is no longer honored server-side; drop
                    // it and re-run the gate on whatever screen is showing
                    self.session.logout();
                    self.api.clear_token();
                    self.navigate(self.screen);
                    "Session expired. Sign in again.".to_string()
                } else if lowered.contains("network") || lowered.contains("connect") {
                    "Connection to the backend failed.".to_string()
                } else {
                    format!("Error: {}", msg)
                };
                self.status_message = Some(user_message);
            }
        }
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check if a character is valid for text input (no control chars)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_otp_char(current_len: usize, c: char) -> bool {
    current_len < MAX_OTP_LENGTH && c.is_ascii_digit()
}

pub fn can_add_account_id_char(current_len: usize, c: char) -> bool {
    current_len < 12 && c.is_ascii_digit()
}

pub fn can_add_amount_char(current_len: usize, c: char) -> bool {
    current_len < MAX_AMOUNT_LENGTH && (c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(63, 'z'));
        assert!(!can_add_username_char(64, 'a'));
        // Control characters rejected
        assert!(!can_add_username_char(0, '\x00'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_otp_char() {
        assert!(can_add_otp_char(0, '7'));
        assert!(!can_add_otp_char(6, '7'));
        assert!(!can_add_otp_char(0, 'a'));
    }

    #[test]
    fn test_can_add_amount_char() {
        assert!(can_add_amount_char(0, '1'));
        assert!(can_add_amount_char(3, '.'));
        assert!(!can_add_amount_char(0, '-'));
        assert!(!can_add_amount_char(10, '1'));
    }

    // -------------------------------------------------------------------------
    // Transfer Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_transfer_ok() {
        assert_eq!(App::validate_transfer("1", "2", "10.50"), Ok((1, 2, 1050)));
    }

    #[test]
    fn test_validate_transfer_same_account() {
        assert!(App::validate_transfer("1", "1", "10.00").is_err());
    }

    #[test]
    fn test_validate_transfer_bad_amount() {
        assert!(App::validate_transfer("1", "2", "ten").is_err());
        assert!(App::validate_transfer("1", "2", "0").is_err());
        assert!(App::validate_transfer("1", "2", "-5.00").is_err());
    }

    #[test]
    fn test_validate_transfer_bad_account() {
        assert!(App::validate_transfer("abc", "2", "1.00").is_err());
        assert!(App::validate_transfer("1", "", "1.00").is_err());
    }
}
