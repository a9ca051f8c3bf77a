//! Git graph provider abstraction
//!
//! The engine never talks to libgit2 directly. It reads tags, references and
//! commits through the [Repository] trait so that version resolution can run
//! against a real repository or against an in-memory graph in tests.
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory commit graph for testing
//!
//! ```rust
//! # use git_semver::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_semver::error::Result<()> {
//! let head = repo.resolve_ref("HEAD")?;
//! let commit = repo.find_commit(head)?;
//! println!("{} has {} parent(s)", commit.hash, commit.parents.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::Tag;
use crate::error::Result;
use chrono::{DateTime, FixedOffset};
use git2::Oid;

/// Read-only snapshot of a commit as delivered by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub id: Oid,
    /// Full hex hash
    pub hash: String,
    /// Parent ids: none for a root commit, two or more for a merge
    pub parents: Vec<Oid>,
    /// Raw message: subject plus optional body and footers
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    /// Author time in the author's own offset
    pub time: DateTime<FixedOffset>,
}

/// Graph provider used by every resolution operation
///
/// Implementations are handed explicitly to each operation; nothing in the
/// engine keeps a repository handle around between calls.
pub trait Repository {
    /// Enumerate every tag, peeled to the commit it marks
    ///
    /// Tags that do not point at a commit (e.g. a tagged tree) are skipped.
    fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Resolve a reference (branch, tag, `HEAD`, full or short hash) to a commit id
    ///
    /// # Returns
    /// * `Ok(Oid)` - id of the commit the reference points at
    /// * `Err(RefNotFound)` - if the reference does not resolve
    fn resolve_ref(&self, reference: &str) -> Result<Oid>;

    /// Look up a single commit
    ///
    /// # Returns
    /// * `Ok(CommitInfo)` - parents, message and author of the commit
    /// * `Err(MissingObject)` - if the object is absent, e.g. beyond a shallow clone boundary
    fn find_commit(&self, id: Oid) -> Result<CommitInfo>;
}
