use crate::config::BumpConfig;
use crate::domain::{ConventionalCommit, PreReleaseOptions, Version, VersionBump, VersionTag};
use crate::error::{GitSemverError, Result};
use crate::git::Repository;
use crate::graph::RevisionGraph;
use crate::resolver::{TagFilter, TagIndex};
use git2::Oid;
use tracing::{debug, info};

/// Options for computing the next version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextOptions {
    /// Only consider versions with this major component
    pub major: Option<u64>,
    /// A breaking change on 0.x bumps minor instead of major
    pub zero_major_rule: bool,
    pub pre_release: PreReleaseOptions,
}

impl Default for NextOptions {
    fn default() -> Self {
        NextOptions {
            major: None,
            zero_major_rule: true,
            pre_release: PreReleaseOptions::default(),
        }
    }
}

/// Result of a next version computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextVersion {
    pub version: Version,
    /// Bump warranted by the commits since `latest`, `None` if nothing qualifies
    pub level: Option<VersionBump>,
    /// Latest version tag the computation started from
    pub latest: Option<VersionTag>,
    pub head: Oid,
}

impl NextVersion {
    /// Whether the commits since the latest version warrant no release at all
    pub fn is_unchanged(&self) -> bool {
        matches!(&self.latest, Some(latest) if latest.version == self.version)
    }
}

/// Analyzes commits to determine version bump type
pub struct VersionAnalyzer {
    config: BumpConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: BumpConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Determine the bump warranted by a set of commits
    ///
    /// Priority: any breaking change means major, then a minor type, then a
    /// patch type. Returns `None` when no commit qualifies.
    pub fn bump_level(&self, commits: &[ConventionalCommit]) -> Option<VersionBump> {
        if commits.iter().any(|c| c.is_breaking_change) {
            return Some(VersionBump::Major);
        }

        let has_type = |types: &[String]| commits.iter().any(|c| types.contains(&c.r#type));

        if has_type(&self.config.minor_types) {
            Some(VersionBump::Minor)
        } else if has_type(&self.config.patch_types) {
            Some(VersionBump::Patch)
        } else {
            None
        }
    }

    /// Analyze raw commit messages, skipping non-conventional ones
    pub fn analyze_messages<S: AsRef<str>>(&self, messages: &[S]) -> Option<VersionBump> {
        let parsed: Vec<ConventionalCommit> = messages
            .iter()
            .filter_map(|m| ConventionalCommit::parse(m.as_ref()))
            .collect();
        self.bump_level(&parsed)
    }

    /// Compute the version following the latest version tag
    ///
    /// The latest tag (prereleases included) must be reachable from `HEAD`;
    /// the commits between the two decide the bump. Without any version tag
    /// the first release is always `1.0.0`.
    pub fn next_version<R: Repository + ?Sized>(
        &self,
        repo: &R,
        options: &NextOptions,
    ) -> Result<NextVersion> {
        let head = repo.resolve_ref("HEAD")?;
        let index = TagIndex::load(repo)?;

        let Some(latest) = index
            .global_latest(&TagFilter::new(options.major, true))
            .cloned()
        else {
            debug!("no version tag found, starting at 1.0.0");
            let version = options.pre_release.apply(&Version::new(1, 0, 0), None)?;
            return Ok(NextVersion {
                version,
                level: None,
                latest: None,
                head,
            });
        };

        let graph = RevisionGraph::new(repo);
        let Some(commits) = graph.range_since_ancestor(latest.commit(), head)? else {
            return Err(GitSemverError::release_not_on_head(
                format!("refs/tags/{}", latest.tag.name),
                latest.commit(),
            ));
        };
        let parsed: Vec<ConventionalCommit> = commits
            .iter()
            .filter_map(|c| {
                let parsed = ConventionalCommit::parse(&c.message);
                if parsed.is_none() {
                    debug!(commit = %c.hash, "commit message is not conventional");
                }
                parsed
            })
            .collect();

        let level = self.bump_level(&parsed);
        info!(
            latest = %latest.version,
            commits = commits.len(),
            level = ?level,
            "analyzed commits since latest version"
        );

        let release = match level {
            Some(level) => latest.version.bump(&level, options.zero_major_rule)?,
            None if latest.version.is_prerelease() => {
                latest.version.bump(&VersionBump::ReleaseOnly, options.zero_major_rule)?
            }
            None => latest.version.clone(),
        };

        let version = if options.pre_release.is_requested() {
            options.pre_release.apply(&release, Some(&latest.version))?
        } else {
            release
        };

        Ok(NextVersion {
            version,
            level,
            latest: Some(latest),
            head,
        })
    }
}
