use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// The durable session record written at login.
///
/// `token` is the opaque bearer credential issued by the backend; the
/// remaining fields are display metadata from the login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Token-based session state, persisted to disk.
///
/// One `Session` value is constructed at startup and passed by reference
/// to whoever needs the authenticated signal; there is no global. Disk
/// reads and writes are best-effort: a failure leaves the session in a
/// consistent in-memory state and logs a warning, it is never surfaced
/// to callers.
pub struct Session {
    data_dir: PathBuf,
    data: Option<SessionData>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
        }
    }

    /// Load the session from disk. Returns true if a session was restored.
    ///
    /// A missing file means logged out. An unreadable or malformed file is
    /// treated the same way, with a warning; the stale file is left in
    /// place to be overwritten by the next login.
    pub fn load(&mut self) -> bool {
        let path = self.session_path();
        if !path.exists() {
            return false;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to read session file");
                return false;
            }
        };

        match serde_json::from_str::<SessionData>(&contents) {
            Ok(data) if !data.token.is_empty() => {
                self.data = Some(data);
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "Failed to parse session file");
                false
            }
        }
    }

    /// Store a new session and persist it.
    ///
    /// An empty token is rejected: the session stays as it was.
    pub fn login(&mut self, data: SessionData) {
        if data.token.is_empty() {
            warn!("Ignoring login with empty token");
            return;
        }
        self.data = Some(data);
        self.save();
    }

    /// Clear the session and remove the durable entry. Idempotent.
    pub fn logout(&mut self) {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(error = %e, "Failed to remove session file");
            }
        }
    }

    /// True iff a token is present. Computed on read; there is no
    /// client-side expiry check.
    pub fn is_authenticated(&self) -> bool {
        self.data.as_ref().map(|d| !d.token.is_empty()).unwrap_or(false)
    }

    /// The bearer token, if logged in
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.username.as_str())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.data
            .as_ref()
            .map(|d| d.roles.iter().any(|r| r == role))
            .unwrap_or(false)
    }

    fn save(&self) {
        let Some(ref data) = self.data else {
            return;
        };
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(error = %e, "Failed to create session directory");
                return;
            }
        }
        match serde_json::to_string_pretty(data) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(&path, contents) {
                    warn!(error = %e, "Failed to write session file");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize session"),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_data(token: &str) -> SessionData {
        SessionData {
            token: token.to_string(),
            username: "jdoe".to_string(),
            roles: vec!["teller".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fresh_session_is_unauthenticated() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        assert!(!session.load());
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_login_authenticates_and_persists() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.login(sample_data("abc"));

        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("abc"));

        let on_disk = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
        let parsed: SessionData = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed.token, "abc");
    }

    #[test]
    fn test_logout_clears_and_removes_entry() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.login(sample_data("abc"));
        session.logout();

        assert!(!session.is_authenticated());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.logout();
        session.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_from_durable_entry() {
        let dir = tempdir().unwrap();
        {
            let mut session = Session::new(dir.path().to_path_buf());
            session.login(sample_data("xyz"));
        }

        // A second store over the same directory restores the session
        // without any login call
        let mut restored = Session::new(dir.path().to_path_buf());
        assert!(restored.load());
        assert!(restored.is_authenticated());
        assert_eq!(restored.token(), Some("xyz"));
        assert_eq!(restored.username(), Some("jdoe"));
        assert!(restored.has_role("teller"));
        assert!(!restored.has_role("admin"));
    }

    #[test]
    fn test_malformed_entry_loads_as_logged_out() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("session.json"), "{not json").unwrap();

        let mut session = Session::new(dir.path().to_path_buf());
        assert!(!session.load());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_empty_token_entry_loads_as_logged_out() {
        let dir = tempdir().unwrap();
        let data = sample_data("");
        std::fs::write(
            dir.path().join("session.json"),
            serde_json::to_string(&data).unwrap(),
        )
        .unwrap();

        let mut session = Session::new(dir.path().to_path_buf());
        assert!(!session.load());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_with_empty_token_is_rejected() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.login(sample_data(""));
        assert!(!session.is_authenticated());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_relogin_overwrites_durable_entry() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.login(sample_data("first"));
        session.login(sample_data("second"));

        let on_disk = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
        let parsed: SessionData = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed.token, "second");
    }
}
