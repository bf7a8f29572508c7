// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A backend user, as returned by the admin user listing.
/// Role names come from the backend's RBAC tables ("admin", "teller",
/// "customer"); the client only displays them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub mfa_enabled: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Comma-joined role list for table display
    pub fn roles_display(&self) -> String {
        if self.roles.is_empty() {
            "-".to_string()
        } else {
            self.roles.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserialize_minimal() {
        // roles and mfa_enabled default when the backend omits them
        let json = r#"{"id": 3, "username": "jdoe", "created_at": null}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.roles.is_empty());
        assert!(!user.mfa_enabled);
        assert_eq!(user.roles_display(), "-");
    }

    #[test]
    fn test_user_has_role() {
        let json = r#"{"id": 1, "username": "root", "roles": ["admin", "teller"], "mfa_enabled": true, "created_at": null}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.has_role("admin"));
        assert!(!user.has_role("customer"));
        assert_eq!(user.roles_display(), "admin, teller");
    }
}
