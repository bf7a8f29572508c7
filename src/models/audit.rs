// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry from the backend audit trail.
/// The backend signs and optionally encrypts entries server-side; the
/// client receives only the public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub user_id: Option<i64>,
    pub action: String,
    pub resource: String,
}

impl AuditEntry {
    /// Actor column for table display ("-" for anonymous entries such as
    /// failed logins)
    pub fn actor_display(&self) -> String {
        match self.user_id {
            Some(id) => format!("user:{}", id),
            None => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_entry_deserialize() {
        let json = r#"{
            "timestamp": "2025-11-03T09:00:00Z",
            "user_id": 5,
            "action": "view_account",
            "resource": "account:12"
        }"#;
        let entry: AuditEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.action, "view_account");
        assert_eq!(entry.actor_display(), "user:5");
    }

    #[test]
    fn test_audit_entry_anonymous() {
        let json = r#"{"timestamp": null, "user_id": null, "action": "login_failed", "resource": "user:ghost"}"#;
        let entry: AuditEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.actor_display(), "-");
    }
}
