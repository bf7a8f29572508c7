// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::utils::parse_cents;

/// A bank account as returned by the backend.
/// Balances arrive as decimal strings (e.g. "1204.50") and are kept
/// verbatim; use `balance_cents` for arithmetic and sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub balance: String,
    pub currency: String,
}

impl Account {
    /// Balance in integer cents, or None if the backend sent something
    /// that doesn't parse as a decimal amount.
    pub fn balance_cents(&self) -> Option<i64> {
        parse_cents(&self.balance)
    }
}

/// Sortable columns on the accounts screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSortColumn {
    Id,
    Owner,
    Balance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_balance_cents() {
        let account = Account {
            id: 1,
            owner: "Alice".to_string(),
            balance: "1204.50".to_string(),
            currency: "USD".to_string(),
        };
        assert_eq!(account.balance_cents(), Some(120450));
    }

    #[test]
    fn test_account_balance_cents_malformed() {
        let account = Account {
            id: 1,
            owner: "Alice".to_string(),
            balance: "n/a".to_string(),
            currency: "USD".to_string(),
        };
        assert_eq!(account.balance_cents(), None);
    }

    #[test]
    fn test_account_deserialize() {
        let json = r#"{"id": 7, "owner": "Bob", "balance": "0.00", "currency": "USD"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.id, 7);
        assert_eq!(account.balance_cents(), Some(0));
    }
}
