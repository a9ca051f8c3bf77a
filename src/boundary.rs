use std::fmt;

/// Non-fatal findings while resolving versions from tags.
/// These are reported to the user but never abort a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Several tags parse to the same version; only one takes part in resolution
    DuplicateVersionTags {
        version: String,
        kept: String,
        ignored: Vec<String>,
    },
    /// No commit since the latest version warrants a new release
    NothingToRelease {
        version: String,
        current_commit_hash: String,
    },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::DuplicateVersionTags {
                version,
                kept,
                ignored,
            } => {
                write!(
                    f,
                    "Tags {} resolve to version {} as well; using '{}'",
                    ignored
                        .iter()
                        .map(|t| format!("'{}'", t))
                        .collect::<Vec<_>>()
                        .join(", "),
                    version,
                    kept
                )
            }
            BoundaryWarning::NothingToRelease {
                version,
                current_commit_hash,
            } => {
                let short_hash = if current_commit_hash.len() > 7 {
                    &current_commit_hash[..7]
                } else {
                    current_commit_hash.as_str()
                };
                write!(
                    f,
                    "No releasable commits since version {} (current: {})",
                    version, short_hash
                )
            }
        }
    }
}
