use crate::domain::Version;
use git2::Oid;

/// Represents a git tag, peeled to the commit it marks
///
/// Annotated and lightweight tags are treated identically for resolution;
/// the flag is kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub target: Oid,
    pub annotated: bool,
}

impl Tag {
    /// Create a new lightweight tag pointing at a commit
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        Tag {
            name: name.into(),
            target,
            annotated: false,
        }
    }

    /// Create a new annotated tag pointing at a commit
    pub fn annotated(name: impl Into<String>, target: Oid) -> Self {
        Tag {
            name: name.into(),
            target,
            annotated: true,
        }
    }

    /// Version encoded in the tag name, if any (e.g., "v1.2.3" -> 1.2.3)
    pub fn version(&self) -> Option<Version> {
        Version::parse(&self.name)
    }
}

/// A tag whose name parsed as a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub version: Version,
    pub tag: Tag,
}

impl VersionTag {
    /// Pair a tag with its version, skipping tags that are not versions
    pub fn from_tag(tag: Tag) -> Option<Self> {
        let version = tag.version()?;
        Some(VersionTag { version, tag })
    }

    /// The commit this version was released from
    pub fn commit(&self) -> Oid {
        self.tag.target
    }
}
