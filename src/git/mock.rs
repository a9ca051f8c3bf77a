use crate::domain::Tag;
use crate::error::{GitSemverError, Result};
use crate::git::{CommitInfo, Repository};
use chrono::{DateTime, Offset, Utc};
use git2::Oid;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// Holds an in-memory commit graph. Commit ids are derived from a counter so
/// that every test run builds exactly the same graph.
pub struct MockRepository {
    commits: HashMap<Oid, CommitInfo>,
    tags: HashMap<String, Tag>,
    refs: HashMap<String, Oid>,
    next_id: u32,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            tags: HashMap::new(),
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    /// Add a commit with explicit parents and return its id
    pub fn add_commit(&mut self, message: &str, parents: &[Oid]) -> Oid {
        let seq = self.next_id;
        self.next_id += 1;

        let mut bytes = [0u8; 20];
        bytes[16..].copy_from_slice(&seq.to_be_bytes());
        let id = Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero());

        let time = DateTime::from_timestamp(1_700_000_000 + i64::from(seq) * 60, 0)
            .unwrap_or_default()
            .with_timezone(&Utc.fix());

        self.commits.insert(
            id,
            CommitInfo {
                id,
                hash: id.to_string(),
                parents: parents.to_vec(),
                message: message.to_string(),
                author_name: "testuser".to_string(),
                author_email: "test@example.com".to_string(),
                time,
            },
        );

        id
    }

    /// Commit on top of `HEAD` and move `HEAD` forward
    pub fn commit(&mut self, message: &str) -> Oid {
        let parents: Vec<Oid> = self.refs.get("HEAD").copied().into_iter().collect();
        let id = self.add_commit(message, &parents);
        self.refs.insert("HEAD".to_string(), id);
        id
    }

    /// Create a merge commit of `HEAD` and `other`, moving `HEAD` forward
    pub fn merge(&mut self, other: Oid, message: &str) -> Oid {
        let mut parents: Vec<Oid> = self.refs.get("HEAD").copied().into_iter().collect();
        parents.push(other);
        let id = self.add_commit(message, &parents);
        self.refs.insert("HEAD".to_string(), id);
        id
    }

    /// Add a lightweight tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        let tag = Tag::new(name, oid);
        self.tags.insert(tag.name.clone(), tag);
    }

    /// Add an annotated tag pointing to a commit
    pub fn add_annotated_tag(&mut self, name: impl Into<String>, oid: Oid) {
        let tag = Tag::annotated(name, oid);
        self.tags.insert(tag.name.clone(), tag);
    }

    /// Point a named reference (`HEAD`, a branch) at a commit
    pub fn set_ref(&mut self, name: impl Into<String>, oid: Oid) {
        self.refs.insert(name.into(), oid);
    }

    /// Drop a commit object while its children still name it as a parent,
    /// as beyond the cut of a shallow clone
    pub fn remove_commit(&mut self, oid: Oid) {
        self.commits.remove(&oid);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut tags: Vec<Tag> = self.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    fn resolve_ref(&self, reference: &str) -> Result<Oid> {
        if let Some(oid) = self.refs.get(reference) {
            return Ok(*oid);
        }
        if let Some(tag) = self.tags.get(reference) {
            return Ok(tag.target);
        }

        // full or abbreviated hash, must be unambiguous
        if reference.len() >= 4 && reference.bytes().all(|b| b.is_ascii_hexdigit()) {
            let matches: Vec<Oid> = self
                .commits
                .keys()
                .filter(|oid| oid.to_string().starts_with(&reference.to_lowercase()))
                .copied()
                .collect();
            if let [oid] = matches.as_slice() {
                return Ok(*oid);
            }
        }

        Err(GitSemverError::ref_not_found(reference))
    }

    fn find_commit(&self, id: Oid) -> Result<CommitInfo> {
        self.commits
            .get(&id)
            .cloned()
            .ok_or_else(|| GitSemverError::missing_object(id))
    }
}
