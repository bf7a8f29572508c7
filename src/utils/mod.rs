//! Utility functions for string and money formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{cmp_ignore_case, format_cents, parse_cents, truncate_string};
