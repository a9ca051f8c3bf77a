//! Command workflows
//!
//! Each function here backs one subcommand. They take the graph provider
//! explicitly and return plain values, so the binary only parses arguments
//! and prints results. Nothing here depends on clap.

use std::cmp::Ordering;

use tracing::debug;

use crate::analyzer::{NextOptions, NextVersion, VersionAnalyzer};
use crate::changelog::{self, OutputMode};
use crate::config::Config;
use crate::domain::Version;
use crate::error::{GitSemverError, Result};
use crate::git::Repository;
use crate::graph::RevisionGraph;
use crate::resolver::{TagFilter, TagIndex};

/// Arguments for the log workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Release to show; `None` means the unreleased commits on `HEAD`
    pub reference: Option<String>,
    pub mode: OutputMode,
    /// Let prerelease tags bound the range, so commits already shipped in a
    /// prerelease are left out
    pub exclude_prereleases: bool,
    pub major: Option<u64>,
}

/// Latest version among all tags, `0.0.0` if none qualifies
///
/// Reachability from `HEAD` is not considered.
pub fn resolve_latest<R: Repository + ?Sized>(
    repo: &R,
    major: Option<u64>,
    include_prereleases: bool,
) -> Result<Version> {
    let index = TagIndex::load(repo)?;
    let latest = index
        .global_latest(&TagFilter::new(major, include_prereleases))
        .map(|t| t.version.clone())
        .unwrap_or(Version::ZERO);

    debug!(version = %latest, "resolved latest version");
    Ok(latest)
}

/// Next version to release from `HEAD`
///
/// # Errors
/// * `ReleaseNotOnHead` - the latest version tag is not an ancestor of `HEAD`
/// * `MissingObject` - the history between the two is incomplete
pub fn resolve_next<R: Repository + ?Sized>(
    repo: &R,
    options: &NextOptions,
    config: &Config,
) -> Result<NextVersion> {
    VersionAnalyzer::new(config.bump.clone()).next_version(repo, options)
}

/// Render the commits belonging to a release
///
/// Without a reference this is everything since the latest version tag,
/// which is empty when `HEAD` carries that tag. With a reference it is
/// everything since the release preceding it.
///
/// # Errors
/// * `RefNotFound` - the reference does not resolve
/// * `MissingObject` - the history behind the reference is incomplete
pub fn render_log<R: Repository + ?Sized>(
    repo: &R,
    options: &LogOptions,
    config: &Config,
) -> Result<String> {
    let index = TagIndex::load(repo)?;
    let filter = TagFilter::new(options.major, options.exclude_prereleases);

    let (target, boundary) = match options.reference.as_deref() {
        None => {
            let head = repo.resolve_ref("HEAD")?;
            (head, index.global_latest(&filter))
        }
        Some(reference) => {
            let target = resolve_log_ref(repo, reference)?;
            (target, index.range_boundary(target, &filter))
        }
    };

    debug!(
        target = %target,
        boundary = ?boundary.map(|t| t.tag.name.as_str()),
        "rendering log"
    );

    let graph = RevisionGraph::new(repo);
    let commits = graph.range_diff(boundary.map(|t| t.commit()), target)?;

    changelog::render(&commits, options.mode, &config.changelog)
}

/// Resolve a log reference, trying `v<version>` for bare version numbers
fn resolve_log_ref<R: Repository + ?Sized>(repo: &R, reference: &str) -> Result<git2::Oid> {
    match repo.resolve_ref(reference) {
        Err(GitSemverError::RefNotFound { .. })
            if !reference.starts_with('v') && Version::parse(reference).is_some() =>
        {
            let prefixed = format!("v{}", reference);
            debug!(reference, prefixed = %prefixed, "retrying with version prefix");
            repo.resolve_ref(&prefixed)
                .map_err(|_| GitSemverError::ref_not_found(reference))
        }
        result => result,
    }
}

/// Compare two user supplied versions
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    let a: Version = a.parse()?;
    let b: Version = b.parse()?;
    Ok(a.cmp(&b))
}

/// Symbol printed by the compare command
pub fn ordering_symbol(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}
