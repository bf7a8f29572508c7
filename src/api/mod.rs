//! REST API client module for the bank backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to authenticate and fetch account, transaction, user, and
//! audit data.
//!
//! The API uses JWT bearer token authentication obtained through the
//! `/api/auth/login` endpoint. Role checks happen server-side; the
//! client only maps 403 responses to `ApiError::AccessDenied`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
