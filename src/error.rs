use thiserror::Error;

/// Unified error type for git-semver operations
#[derive(Error, Debug)]
pub enum GitSemverError {
    #[error("Reference not found: '{reference}'")]
    RefNotFound { reference: String },

    #[error("object not found: {oid} (the history is incomplete, e.g. a shallow clone)")]
    MissingObject { oid: String },

    #[error("Latest tag is not on HEAD. This is necessary as the next version is calculated based on the commits since the latest version tag. (tag: {tag}; commit: {commit})")]
    ReleaseNotOnHead { tag: String, commit: String },

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in git-semver
pub type Result<T> = std::result::Result<T, GitSemverError>;

impl GitSemverError {
    /// Create a reference error for a user supplied reference
    pub fn ref_not_found(reference: impl Into<String>) -> Self {
        GitSemverError::RefNotFound {
            reference: reference.into(),
        }
    }

    /// Create a missing object error naming the absent object
    pub fn missing_object(oid: impl ToString) -> Self {
        GitSemverError::MissingObject {
            oid: oid.to_string(),
        }
    }

    /// Create an error for a release tag that diverged from HEAD
    pub fn release_not_on_head(tag: impl Into<String>, commit: impl ToString) -> Self {
        GitSemverError::ReleaseNotOnHead {
            tag: tag.into(),
            commit: commit.to_string(),
        }
    }

    /// Create a version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        GitSemverError::InvalidVersion(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitSemverError::Config(msg.into())
    }

    /// Whether the error was caused by user input rather than repository state
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GitSemverError::RefNotFound { .. } | GitSemverError::InvalidVersion(_)
        )
    }
}
