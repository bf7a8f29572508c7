// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::parse_cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A transfer between two accounts as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: String,
    pub status: TransactionStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn amount_cents(&self) -> Option<i64> {
        parse_cents(&self.amount)
    }

    /// True if this transaction touches the given account on either side
    pub fn involves(&self, account_id: i64) -> bool {
        self.from_account_id == account_id || self.to_account_id == account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_deserialize() {
        let json = r#"{
            "id": 42,
            "from_account_id": 1,
            "to_account_id": 2,
            "amount": "250.00",
            "status": "completed",
            "created_at": "2025-11-03T14:22:00Z"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.amount_cents(), Some(25000));
        assert!(tx.involves(1));
        assert!(tx.involves(2));
        assert!(!tx.involves(3));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TransactionStatus::Pending.to_string(), "pending");
        assert_eq!(TransactionStatus::Failed.to_string(), "failed");
    }
}
