//! Data models for bank backend entities.
//!
//! This module contains the data structures used to represent
//! backend data including:
//!
//! - `Account`: bank accounts with owner and balance
//! - `Transaction`: transfers between accounts
//! - `User`: backend users with role assignments
//! - `AuditEntry`: entries from the backend audit trail

pub mod account;
pub mod audit;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountSortColumn};
pub use audit::AuditEntry;
pub use transaction::{Transaction, TransactionStatus};
pub use user::User;
