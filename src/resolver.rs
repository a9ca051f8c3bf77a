//! Version tag resolution
//!
//! Collects the tags whose names parse as versions and answers the two
//! questions every operation asks: which version is the latest, and which
//! tag bounds the commits belonging to a given release.

use crate::boundary::BoundaryWarning;
use crate::domain::{Tag, Version, VersionTag};
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use tracing::{debug, warn};

/// Restricts which version tags take part in a resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagFilter {
    /// Only versions with exactly this major component
    pub major: Option<u64>,
    pub include_prereleases: bool,
}

impl TagFilter {
    pub fn new(major: Option<u64>, include_prereleases: bool) -> Self {
        TagFilter {
            major,
            include_prereleases,
        }
    }

    pub fn accepts(&self, version: &Version) -> bool {
        if let Some(major) = self.major {
            if version.major != major {
                return false;
            }
        }
        self.include_prereleases || !version.is_prerelease()
    }
}

/// Every version tag of a repository, one tag per version
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: Vec<VersionTag>,
    warnings: Vec<BoundaryWarning>,
}

impl TagIndex {
    /// Read all tags from the provider
    pub fn load<R: Repository + ?Sized>(repo: &R) -> Result<Self> {
        Ok(Self::from_tags(repo.list_tags()?))
    }

    /// Build the index from raw tags
    ///
    /// Tags that are not versions are dropped silently. When several tags
    /// carry the same version, the lexicographically smallest name is kept
    /// and a [`BoundaryWarning::DuplicateVersionTags`] is recorded.
    pub fn from_tags(tags: Vec<Tag>) -> Self {
        let mut parsed: Vec<VersionTag> = tags
            .into_iter()
            .filter_map(|tag| {
                let name = tag.name.clone();
                let version_tag = VersionTag::from_tag(tag);
                if version_tag.is_none() {
                    debug!(tag = %name, "ignoring tag that is not a version");
                }
                version_tag
            })
            .collect();

        parsed.sort_by(|a, b| {
            a.version
                .cmp(&b.version)
                .then_with(|| a.tag.name.cmp(&b.tag.name))
        });

        let mut index = TagIndex::default();
        for version_tag in parsed {
            match index.tags.last() {
                Some(kept) if kept.version == version_tag.version => {
                    let kept_name = kept.tag.name.clone();
                    index.record_duplicate(&version_tag.version, kept_name, version_tag.tag.name);
                }
                _ => index.tags.push(version_tag),
            }
        }

        for warning in &index.warnings {
            warn!("{}", warning);
        }

        index
    }

    fn record_duplicate(&mut self, version: &Version, kept: String, ignored: String) {
        let version = version.to_string();
        for warning in &mut self.warnings {
            if let BoundaryWarning::DuplicateVersionTags {
                version: existing,
                ignored: names,
                ..
            } = warning
            {
                if *existing == version {
                    names.push(ignored);
                    return;
                }
            }
        }
        self.warnings.push(BoundaryWarning::DuplicateVersionTags {
            version,
            kept,
            ignored: vec![ignored],
        });
    }

    /// Version tags in ascending version order
    pub fn tags(&self) -> &[VersionTag] {
        &self.tags
    }

    pub fn warnings(&self) -> &[BoundaryWarning] {
        &self.warnings
    }

    /// Highest version accepted by `filter`, regardless of reachability
    pub fn global_latest(&self, filter: &TagFilter) -> Option<&VersionTag> {
        self.tags.iter().rev().find(|t| filter.accepts(&t.version))
    }

    /// Highest version tagged on `commit`, unfiltered
    pub fn highest_at(&self, commit: Oid) -> Option<&VersionTag> {
        self.tags.iter().rev().find(|t| t.commit() == commit)
    }

    /// The tag bounding the commits that went into `target`
    ///
    /// If `target` is itself tagged with version `V`, this is the highest
    /// accepted version below `V` on another commit: "everything since the
    /// previous release". Otherwise it is [`TagIndex::global_latest`].
    /// `None` means the range starts at the beginning of history.
    pub fn range_boundary(&self, target: Oid, filter: &TagFilter) -> Option<&VersionTag> {
        let Some(current) = self.highest_at(target) else {
            return self.global_latest(filter);
        };

        let boundary = self.tags.iter().rev().find(|t| {
            t.commit() != target && t.version < current.version && filter.accepts(&t.version)
        });

        debug!(
            release = %current.version,
            boundary = ?boundary.map(|t| t.tag.name.as_str()),
            "resolved range boundary"
        );
        boundary
    }
}
