//! User interface module - terminal messages.
//!
//! - `formatter` - Pure formatting functions and their stderr printers

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{display_error, format_error};
