//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `Session`: token-based session state, persisted across restarts
//! - `CredentialStore`: secure OS-level credential storage via keyring
//!
//! The session holds the bearer token issued by the backend at login.
//! Whether the token is still honored is the backend's decision; the
//! client treats any non-empty stored token as an active session until
//! the backend rejects it.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{Session, SessionData};
