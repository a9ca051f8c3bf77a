use crate::domain::Tag;
use crate::error::{GitSemverError, Result};
use crate::git::CommitInfo;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{ErrorCode, Oid, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn to_commit_info(commit: &git2::Commit<'_>) -> CommitInfo {
        let author = commit.author();
        let when = author.when();
        let offset = FixedOffset::east_opt(when.offset_minutes() * 60)
            .unwrap_or_else(|| Utc.fix());
        let time = DateTime::from_timestamp(when.seconds(), 0)
            .unwrap_or_default()
            .with_timezone(&offset);

        CommitInfo {
            id: commit.id(),
            hash: commit.id().to_string(),
            parents: recorded_parents(commit),
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            author_name: author.name().unwrap_or("unknown").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            time,
        }
    }
}

/// Parent ids as written in the commit object
///
/// `parent_ids()` applies the grafts of `.git/shallow` and reports a shallow
/// commit as a root. The header keeps the real parents, so a walk past the
/// cut hits `MissingObject`.
fn recorded_parents(commit: &git2::Commit<'_>) -> Vec<Oid> {
    commit
        .raw_header_bytes()
        .split(|b| *b == b'\n')
        .filter_map(|line| line.strip_prefix(b"parent "))
        .filter_map(|hex| std::str::from_utf8(hex).ok())
        .filter_map(|hex| Oid::from_str(hex.trim()).ok())
        .collect()
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    debug!(tag = name, error = %e, "skipping tag that does not mark a commit");
                    continue;
                }
            };

            let annotated = reference
                .target()
                .map(|oid| self.repo.find_tag(oid).is_ok())
                .unwrap_or(false);

            tags.push(Tag {
                name: name.to_string(),
                target: commit.id(),
                annotated,
            });
        }

        Ok(tags)
    }

    fn resolve_ref(&self, reference: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(reference)
            .map_err(|_| GitSemverError::ref_not_found(reference))?;

        let commit = object
            .peel_to_commit()
            .map_err(|_| GitSemverError::ref_not_found(reference))?;

        Ok(commit.id())
    }

    fn find_commit(&self, id: Oid) -> Result<CommitInfo> {
        match self.repo.find_commit(id) {
            Ok(commit) => Ok(Self::to_commit_info(&commit)),
            Err(e) if e.code() == ErrorCode::NotFound => Err(GitSemverError::missing_object(id)),
            Err(e) => Err(e.into()),
        }
    }
}
