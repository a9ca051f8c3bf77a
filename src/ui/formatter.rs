//! Pure formatting functions for UI output.
//!
//! Results go to stdout untouched; every message produced here is meant for
//! stderr so that piping a version or changelog stays clean.

use console::style;

/// Format an error message with a red prefix.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").for_stderr().red().bold(), message)
}

/// Print an error message to stderr.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}
