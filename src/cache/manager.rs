// Allow dead code: Infrastructure methods for future use
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::models::{Account, AuditEntry, Transaction, User};

/// Consider cache stale after 15 minutes.
/// Balances move quickly, so the window is short; the UI refreshes in
/// the background anyway.
const CACHE_STALE_MINUTES: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Cache age summary for the status bar
#[derive(Debug, Clone, Default)]
pub struct CacheAges {
    pub accounts: Option<String>,
    pub users: Option<String>,
    pub audit: Option<String>,
}

impl CacheAges {
    /// Most relevant age for the status bar, "never" if nothing cached
    pub fn last_updated(&self) -> String {
        self.accounts
            .clone()
            .or_else(|| self.users.clone())
            .or_else(|| self.audit.clone())
            .unwrap_or_else(|| "never".to_string())
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn read_entry<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.entry_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", name))?;
        let cached = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry: {}", name))?;
        Ok(Some(cached))
    }

    /// Write an entry through a temp file so a crash mid-write never
    /// leaves a half-written cache behind.
    fn write_entry<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.entry_path(name);
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(&CachedData::new(data))?;
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace cache entry: {}", name))?;
        Ok(())
    }

    // ===== Accounts =====

    pub fn load_accounts(&self) -> Result<Option<CachedData<Vec<Account>>>> {
        self.read_entry("accounts")
    }

    pub fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        self.write_entry("accounts", &accounts)
    }

    // ===== Transactions (per account) =====

    pub fn load_transactions(&self, account_id: i64) -> Result<Option<CachedData<Vec<Transaction>>>> {
        self.read_entry(&format!("transactions_{}", account_id))
    }

    pub fn save_transactions(&self, account_id: i64, transactions: &[Transaction]) -> Result<()> {
        self.write_entry(&format!("transactions_{}", account_id), &transactions)
    }

    // ===== Users =====

    pub fn load_users(&self) -> Result<Option<CachedData<Vec<User>>>> {
        self.read_entry("users")
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        self.write_entry("users", &users)
    }

    // ===== Audit log =====

    pub fn load_audit_log(&self) -> Result<Option<CachedData<Vec<AuditEntry>>>> {
        self.read_entry("audit_log")
    }

    pub fn save_audit_log(&self, entries: &[AuditEntry]) -> Result<()> {
        self.write_entry("audit_log", &entries)
    }

    /// Remove every cached entry. Called at logout so account data does
    /// not linger on disk after the session ends.
    pub fn clear(&self) {
        let entries = match std::fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to list cache directory for clearing");
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(error = %e, path = %path.display(), "Failed to remove cache entry");
                }
            }
        }
    }

    /// Gather display ages for the status bar
    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            accounts: self
                .load_accounts()
                .ok()
                .flatten()
                .map(|c| c.age_display()),
            users: self.load_users().ok().flatten().map(|c| c.age_display()),
            audit: self
                .load_audit_log()
                .ok()
                .flatten()
                .map(|c| c.age_display()),
        }
    }

    /// True if the accounts cache is missing or past the staleness window
    pub fn accounts_stale(&self) -> bool {
        match self.load_accounts() {
            Ok(Some(cached)) => cached.is_stale(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(16);
        assert!(old.is_stale());
    }

    #[test]
    fn test_cache_ages_last_updated_empty() {
        let ages = CacheAges::default();
        assert_eq!(ages.last_updated(), "never");
    }

    #[test]
    fn test_accounts_round_trip() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        assert!(cache.load_accounts().unwrap().is_none());
        assert!(cache.accounts_stale());

        let accounts = vec![Account {
            id: 1,
            owner: "Alice".to_string(),
            balance: "10.00".to_string(),
            currency: "USD".to_string(),
        }];
        cache.save_accounts(&accounts).unwrap();

        let cached = cache.load_accounts().unwrap().unwrap();
        assert_eq!(cached.data.len(), 1);
        assert_eq!(cached.data[0].owner, "Alice");
        assert!(!cache.accounts_stale());
    }

    #[test]
    fn test_transactions_keyed_per_account() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        cache.save_transactions(7, &[]).unwrap();
        assert!(cache.load_transactions(7).unwrap().is_some());
        assert!(cache.load_transactions(8).unwrap().is_none());
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        cache.save_accounts(&[]).unwrap();
        cache.save_users(&[]).unwrap();
        cache.clear();

        assert!(cache.load_accounts().unwrap().is_none());
        assert!(cache.load_users().unwrap().is_none());
    }
}
