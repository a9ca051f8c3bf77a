use crate::error::{GitSemverError, Result};
use semver::Prerelease;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Build metadata is accepted when parsing but not kept: it takes no part in
/// ordering and is never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Prerelease,
}

impl Version {
    /// The sentinel used when no version tag exists at all
    pub const ZERO: Version = Version {
        major: 0,
        minor: 0,
        patch: 0,
        pre: Prerelease::EMPTY,
    };

    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
        }
    }

    /// Parse a version from a tag name (e.g., "v1.2.3-rc.1" -> 1.2.3-rc.1)
    ///
    /// Returns `None` for anything that is not a semantic version with an
    /// optional leading `v`. Tag names that do not parse are simply not
    /// version tags, so this is not an error condition.
    pub fn parse(tag: &str) -> Option<Self> {
        let clean_tag = tag.strip_prefix('v').unwrap_or(tag);
        let parsed = semver::Version::parse(clean_tag).ok()?;

        Some(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre: parsed.pre,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Whether both versions share major, minor and patch
    pub fn same_release(&self, other: &Version) -> bool {
        self.major == other.major && self.minor == other.minor && self.patch == other.patch
    }

    /// Copy of this version carrying the given prerelease identifiers
    pub fn with_prerelease(&self, pre: Prerelease) -> Self {
        Version {
            pre,
            ..self.clone()
        }
    }

    /// Bump version according to bump type
    ///
    /// With `zero_major_rule` set, a major bump on a `0.x` version bumps the
    /// minor component instead: the 0.x line is pre-stable.
    ///
    /// # Errors
    /// * `InvalidVersion` - the bumped component would overflow
    pub fn bump(&self, bump_type: &VersionBump, zero_major_rule: bool) -> Result<Self> {
        let bumped = match bump_type {
            VersionBump::Major if zero_major_rule && self.major == 0 => {
                Version::new(0, increment(self.minor, self)?, 0)
            }
            VersionBump::Major => Version::new(increment(self.major, self)?, 0, 0),
            VersionBump::Minor => Version::new(self.major, increment(self.minor, self)?, 0),
            VersionBump::Patch => {
                Version::new(self.major, self.minor, increment(self.patch, self)?)
            }
            VersionBump::ReleaseOnly => Version::new(self.major, self.minor, self.patch),
        };
        Ok(bumped)
    }
}

fn increment(component: u64, version: &Version) -> Result<u64> {
    component.checked_add(1).ok_or_else(|| {
        GitSemverError::invalid_version(format!("cannot bump '{}': component overflows", version))
    })
}

impl Default for Version {
    fn default() -> Self {
        Version::ZERO
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                // a release outranks every prerelease of the same triple
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = GitSemverError;

    /// Strict counterpart of [`Version::parse`] for explicit user input
    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s).ok_or_else(|| {
            GitSemverError::invalid_version(format!(
                "'{}' - expected MAJOR.MINOR.PATCH[-PRERELEASE]",
                s
            ))
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        Ok(())
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
    /// Drop the prerelease identifiers, keep the numbers
    ReleaseOnly,
}
