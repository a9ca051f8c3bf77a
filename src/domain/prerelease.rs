//! Pre-release labelling for the next version
//!
//! A label such as `beta` or `rc.2026-01-01` can be attached to a computed
//! release, optionally followed by a numeric counter that keeps counting up
//! while the same release is still in its pre-release cycle.
//! According to semver.org: https://semver.org/

use crate::domain::Version;
use crate::error::{GitSemverError, Result};
use semver::Prerelease;

/// Options controlling the pre-release identifiers of a next version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreReleaseOptions {
    /// Dot separated identifiers, e.g. "alpha" or "rc.2026-01-01"
    pub label: String,
    /// Append a numeric counter that increments per pre-release
    pub append_counter: bool,
}

impl PreReleaseOptions {
    /// Create new pre-release options
    pub fn new(label: impl Into<String>, append_counter: bool) -> Self {
        PreReleaseOptions {
            label: label.into(),
            append_counter,
        }
    }

    /// Whether these options ask for a pre-release at all
    pub fn is_requested(&self) -> bool {
        !self.label.is_empty() || self.append_counter
    }

    /// Build the identifiers for a fresh pre-release cycle
    ///
    /// # Returns
    /// * `Ok(Prerelease)` - label identifiers, plus `1` if a counter is requested
    /// * `Err` - If the label is not a valid SemVer pre-release
    pub fn identifiers(&self) -> Result<Prerelease> {
        let mut parts: Vec<&str> = Vec::new();
        if !self.label.is_empty() {
            parts.push(&self.label);
        }
        if self.append_counter {
            parts.push("1");
        }

        Prerelease::new(&parts.join(".")).map_err(|e| {
            GitSemverError::invalid_version(format!(
                "Invalid pre-release label '{}': {}",
                self.label, e
            ))
        })
    }

    /// Attach pre-release identifiers to a computed release
    ///
    /// When `latest` is a pre-release of the same release whose identifiers
    /// only differ by the trailing counter, the counter continues from there.
    pub fn apply(&self, release: &Version, latest: Option<&Version>) -> Result<Version> {
        let fresh = self.identifiers()?;

        let continued = match latest {
            Some(latest)
                if self.append_counter
                    && latest.is_prerelease()
                    && latest.same_release(release)
                    && differ_only_by_counter(&fresh, &latest.pre) =>
            {
                increment_counter(&latest.pre)?
            }
            _ => fresh,
        };

        Ok(release.with_prerelease(continued))
    }
}

fn is_numeric(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

/// Equal identifiers except for the last one, which is numeric on both sides
fn differ_only_by_counter(a: &Prerelease, b: &Prerelease) -> bool {
    let a: Vec<&str> = a.as_str().split('.').collect();
    let b: Vec<&str> = b.as_str().split('.').collect();

    if a.len() != b.len() {
        return false;
    }

    let last = a.len() - 1;
    a[..last] == b[..last] && is_numeric(a[last]) && is_numeric(b[last])
}

fn increment_counter(pre: &Prerelease) -> Result<Prerelease> {
    let mut parts: Vec<String> = pre.as_str().split('.').map(str::to_string).collect();

    if let Some(last) = parts.last_mut() {
        let counter = last.parse::<u64>().map_err(|_| {
            GitSemverError::invalid_version(format!("Invalid pre-release counter: '{}'", last))
        })?;
        let next = counter.checked_add(1).ok_or_else(|| {
            GitSemverError::invalid_version(format!("Pre-release counter overflows: '{}'", last))
        })?;
        *last = next.to_string();
    }

    Prerelease::new(&parts.join("."))
        .map_err(|e| GitSemverError::invalid_version(format!("Invalid pre-release: {}", e)))
}
