//! Analysis engine for determining version bumps from commits

pub mod version_analyzer;

pub use version_analyzer::{NextOptions, NextVersion, VersionAnalyzer};
