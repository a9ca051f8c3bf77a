//! Workflows behind the command-line interface

pub mod orchestration;

pub use orchestration::{
    compare_versions, ordering_symbol, render_log, resolve_latest, resolve_next, LogOptions,
};
