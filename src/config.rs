use crate::error::{GitSemverError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "gitsemver.toml";

/// Represents the complete configuration for git-semver.
///
/// Contains the bump priority table, versioning rules and changelog labels.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub bump: BumpConfig,

    #[serde(default)]
    pub versioning: VersioningConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string()]
}

fn default_patch_types() -> Vec<String> {
    vec!["fix".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_labels() -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert("feat".to_string(), "Features".to_string());
    labels.insert("fix".to_string(), "Bug Fixes".to_string());
    labels
}

/// Commit types that trigger a version bump.
///
/// A breaking change always bumps major; these lists are consulted after
/// that, minor first.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpConfig {
    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,

    #[serde(default = "default_patch_types")]
    pub patch_types: Vec<String>,
}

impl Default for BumpConfig {
    fn default() -> Self {
        BumpConfig {
            minor_types: default_minor_types(),
            patch_types: default_patch_types(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersioningConfig {
    /// Breaking changes on a 0.x version bump minor instead of major
    #[serde(default = "default_true")]
    pub zero_major_rule: bool,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        VersioningConfig {
            zero_major_rule: true,
        }
    }
}

/// Section titles of the Markdown changelog, keyed by commit type.
///
/// Types without a label are rendered verbatim.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_labels")]
    pub labels: BTreeMap<String, String>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            labels: default_labels(),
        }
    }
}

impl ChangelogConfig {
    pub fn label_for<'a>(&'a self, commit_type: &'a str) -> &'a str {
        self.labels
            .get(commit_type)
            .map(String::as_str)
            .unwrap_or(commit_type)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitsemver.toml` in the working directory
/// 3. `gitsemver.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `workdir` - Directory searched before the user config directory
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If the custom path is missing, or a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, workdir: &Path) -> Result<Config> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(GitSemverError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => find_config_file(workdir),
    };

    let Some(path) = path else {
        debug!("no config file found, using defaults");
        return Ok(Config::default());
    };

    debug!(path = %path.display(), "loading config");
    let config_str = fs::read_to_string(&path)?;
    parse_config(&config_str)
        .map_err(|e| GitSemverError::config(format!("{}: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(config_str: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(config_str)
}

fn find_config_file(workdir: &Path) -> Option<PathBuf> {
    let local = workdir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
