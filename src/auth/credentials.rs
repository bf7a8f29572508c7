// Allow dead code: Infrastructure methods for future use
#![allow(dead_code)]

use anyhow::{Context, Result};
use keyring::Entry;

/// Keychain service name remembered passwords are filed under
const KEYCHAIN_SERVICE: &str = "tellerdeck";

/// OS-keychain storage for the password a user opts to remember.
/// Tokens never go through here; they live in the session file.
pub struct CredentialStore {
    username: String,
}

impl CredentialStore {
    pub fn for_user(username: &str) -> Self {
        Self {
            username: username.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYCHAIN_SERVICE, &self.username).context("Failed to open keyring entry")
    }

    /// File the password in the OS keychain
    pub fn remember(&self, password: &str) -> Result<()> {
        self.entry()?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// The remembered password, if the keychain holds one for this user
    pub fn recall(&self) -> Option<String> {
        self.entry().ok()?.get_password().ok()
    }

    /// Remove the remembered password. A missing entry is not an error.
    pub fn forget(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}
