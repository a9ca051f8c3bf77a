//! Reachability queries over the commit graph
//!
//! Every walk keeps an explicit visited set keyed by commit id, so diamond
//! merges are visited once and the walk terminates whatever the fan-in.
//! A commit the provider cannot produce aborts the walk with
//! `MissingObject`. The one exception is history behind a range boundary,
//! which a shallow clone is allowed to cut off.

use crate::error::{GitSemverError, Result};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::debug;

/// Read-only view of a provider's commit graph
pub struct RevisionGraph<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> RevisionGraph<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        RevisionGraph { repo }
    }

    /// All commits reachable from `from` by following parent edges, `from` included
    pub fn reachable_set(&self, from: Oid) -> Result<HashSet<Oid>> {
        let mut visited = HashSet::new();
        let mut stack = vec![from];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let commit = self.repo.find_commit(id)?;
            stack.extend(commit.parents.iter().filter(|p| !visited.contains(*p)));
        }

        Ok(visited)
    }

    /// Whether `candidate` is `of` or one of its ancestors
    pub fn is_ancestor(&self, candidate: Oid, of: Oid) -> Result<bool> {
        let mut visited = HashSet::new();
        let mut stack = vec![of];

        while let Some(id) = stack.pop() {
            if id == candidate {
                return Ok(true);
            }
            if !visited.insert(id) {
                continue;
            }
            let commit = self.repo.find_commit(id)?;
            stack.extend(commit.parents.iter().filter(|p| !visited.contains(*p)));
        }

        Ok(false)
    }

    /// Commits reachable from `to` but not from `from`, newest first
    ///
    /// Without `from` the range covers the whole history behind `to`.
    /// Children always come before their parents; among commits whose
    /// children have all been emitted, the most recent author time goes first.
    pub fn range_diff(&self, from: Option<Oid>, to: Oid) -> Result<Vec<CommitInfo>> {
        let range = self.collect_range(from, to)?;
        let ordered = range.into_ordered();

        debug!(from = ?from, to = %to, commits = ordered.len(), "computed commit range");
        Ok(ordered)
    }

    /// Like [`RevisionGraph::range_diff`] for a boundary that must be an
    /// ancestor of `to`
    ///
    /// Returns `None` when `ancestor` is not reachable from `to`.
    pub fn range_since_ancestor(&self, ancestor: Oid, to: Oid) -> Result<Option<Vec<CommitInfo>>> {
        let range = self.collect_range(Some(ancestor), to)?;
        if !range.reached_boundary {
            return Ok(None);
        }
        Ok(Some(range.into_ordered()))
    }

    /// Ancestors of a range boundary, the boundary included
    ///
    /// History behind the boundary may be cut off (shallow clone). Absent
    /// commits stay in the set as ids but are not expanded.
    fn boundary_set(&self, from: Oid) -> Result<HashSet<Oid>> {
        let mut visited = HashSet::new();
        let mut stack = vec![from];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            match self.repo.find_commit(id) {
                Ok(commit) => {
                    stack.extend(commit.parents.iter().filter(|p| !visited.contains(*p)));
                }
                Err(GitSemverError::MissingObject { .. }) => {
                    debug!(commit = %id, "history behind boundary is truncated");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(visited)
    }

    fn collect_range(&self, from: Option<Oid>, to: Oid) -> Result<CommitRange> {
        let excluded = match from {
            Some(from) => self.boundary_set(from)?,
            None => HashSet::new(),
        };

        // collect the range, never walking into the excluded side
        let mut range = CommitRange::default();
        let mut stack = vec![to];
        while let Some(id) = stack.pop() {
            if excluded.contains(&id) {
                range.reached_boundary |= Some(id) == from;
                continue;
            }
            if range.commits.contains_key(&id) {
                continue;
            }
            let commit = self.repo.find_commit(id)?;
            stack.extend(commit.parents.iter().rev().copied());
            range.discovery.insert(id, range.discovery.len());
            range.commits.insert(id, commit);
        }

        Ok(range)
    }
}

#[derive(Default)]
struct CommitRange {
    commits: HashMap<Oid, CommitInfo>,
    /// Walk order, used to break ties between equal timestamps
    discovery: HashMap<Oid, usize>,
    reached_boundary: bool,
}

impl CommitRange {
    fn into_ordered(mut self) -> Vec<CommitInfo> {
        // number of children inside the range
        let mut pending_children: HashMap<Oid, usize> =
            self.commits.keys().map(|id| (*id, 0)).collect();
        for commit in self.commits.values() {
            for parent in &commit.parents {
                if let Some(count) = pending_children.get_mut(parent) {
                    *count += 1;
                }
            }
        }

        let mut ready = BinaryHeap::new();
        for (id, count) in &pending_children {
            if *count == 0 {
                ready.push(self.entry(*id));
            }
        }

        let mut ordered = Vec::with_capacity(self.commits.len());
        while let Some((_, _, id)) = ready.pop() {
            let Some(commit) = self.commits.remove(&id) else {
                continue;
            };
            for parent in &commit.parents {
                if let Some(count) = pending_children.get_mut(parent) {
                    *count -= 1;
                    if *count == 0 && self.commits.contains_key(parent) {
                        ready.push(self.entry(*parent));
                    }
                }
            }
            ordered.push(commit);
        }

        ordered
    }

    fn entry(&self, id: Oid) -> (i64, Reverse<usize>, Oid) {
        let time = self.commits.get(&id).map_or(0, |c| c.time.timestamp());
        let discovered = self.discovery.get(&id).copied().unwrap_or(usize::MAX);
        (time, Reverse(discovered), id)
    }
}
