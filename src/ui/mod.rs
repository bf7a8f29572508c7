//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard event handling (where navigation requests originate)
//! - `styles`: Color schemes and text styling
//! - `screens`: Per-screen content rendering (accounts, transfers, etc.)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
