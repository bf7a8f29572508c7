//! Local caching module for fast startup and degraded connectivity.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! backend data locally. Data is cached in JSON format and considered
//! stale after 15 minutes.
//!
//! Cached data types include:
//! - Accounts
//! - Per-account transaction histories
//! - Users and the audit log (admin data)

pub mod manager;

pub use manager::CacheManager;
