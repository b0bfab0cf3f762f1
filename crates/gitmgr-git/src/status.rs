//! Working tree status, staging and diff summaries.

use std::collections::BTreeSet;

use git2::{Diff, ErrorCode, IndexAddOption, Oid, Status, StatusEntry, StatusOptions, Tree};

use crate::Repository;
use crate::error::Result;

const STAGED: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

const MODIFIED: Status = Status::WT_MODIFIED
    .union(Status::WT_DELETED)
    .union(Status::WT_RENAMED)
    .union(Status::WT_TYPECHANGE);

/// Files grouped by where their changes live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// Paths whose index entry differs from HEAD.
    pub staged: Vec<String>,
    /// Tracked paths whose working copy differs from the index.
    pub modified: Vec<String>,
    /// Untracked, non-ignored files.
    pub untracked: Vec<String>,
}

impl WorkingTreeStatus {
    /// No staged, modified or untracked files.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty() && self.untracked.is_empty()
    }
}

/// Line and file totals for a single commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl Repository {
    /// Collect staged, modified and untracked paths.
    ///
    /// # Errors
    /// Returns error if status computation fails.
    pub fn working_tree_status(&self) -> Result<WorkingTreeStatus> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.inner().statuses(Some(&mut opts))?;
        let mut status = WorkingTreeStatus::default();

        for entry in statuses.iter() {
            let Some(path) = entry_path(&entry) else {
                continue;
            };
            let flags = entry.status();

            if flags.intersects(STAGED) {
                status.staged.push(path.clone());
            }
            if flags.intersects(MODIFIED) {
                status.modified.push(path.clone());
            }
            if flags.contains(Status::WT_NEW) {
                status.untracked.push(path);
            }
        }

        Ok(status)
    }

    /// Check if the working directory is clean, untracked files included.
    ///
    /// # Errors
    /// Returns error if status check fails.
    pub fn is_clean(&self) -> Result<bool> {
        Ok(self.working_tree_status()?.is_clean())
    }

    /// Stage every change: new, modified and deleted files.
    ///
    /// # Errors
    /// Returns error if the index can't be updated or written.
    pub fn stage_all(&self) -> Result<()> {
        self.stage_pathspecs(&["*"])
    }

    /// Stage the given paths (files or directories), deletions included.
    ///
    /// # Errors
    /// Returns error if the index can't be updated or written.
    pub fn stage_paths(&self, paths: &[String]) -> Result<()> {
        let specs: Vec<&str> = paths.iter().map(String::as_str).collect();
        self.stage_pathspecs(&specs)
    }

    fn stage_pathspecs(&self, specs: &[&str]) -> Result<()> {
        let mut index = self.inner().index()?;
        index.read(false)?;
        index.add_all(specs.iter().copied(), IndexAddOption::DEFAULT, None)?;
        index.update_all(specs.iter().copied(), None)?;
        index.write()?;
        Ok(())
    }

    /// Check if the index differs from HEAD.
    ///
    /// # Errors
    /// Returns error if the diff fails.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let mut index = self.inner().index()?;
        index.read(false)?;
        let head_tree = self.head_tree()?;
        let diff = self
            .inner()
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)?;
        Ok(diff.deltas().len() > 0)
    }

    /// Line and file totals of a commit against its first parent.
    ///
    /// # Errors
    /// Returns error if the commit or its trees can't be read.
    pub fn commit_stats(&self, oid: Oid) -> Result<CommitStats> {
        let commit = self.inner().find_commit(oid)?;
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let diff = self
            .inner()
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        let stats = diff.stats()?;

        Ok(CommitStats {
            files_changed: stats.files_changed(),
            insertions: stats.insertions(),
            deletions: stats.deletions(),
        })
    }

    /// Paths touched between two commits, deduplicated and sorted.
    ///
    /// # Errors
    /// Returns error if either commit can't be read.
    pub fn changed_files(&self, from: Oid, to: Oid) -> Result<Vec<String>> {
        let old_tree = self.inner().find_commit(from)?.tree()?;
        let new_tree = self.inner().find_commit(to)?.tree()?;
        let diff = self
            .inner()
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)?;

        Ok(diff_paths(&diff).into_iter().collect())
    }

    fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        match self.inner().head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// New path of each delta, falling back to the old path.
fn diff_paths(diff: &Diff<'_>) -> BTreeSet<String> {
    diff.deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
        })
        .collect()
}

fn entry_path(entry: &StatusEntry<'_>) -> Option<String> {
    entry
        .head_to_index()
        .or_else(|| entry.index_to_workdir())
        .and_then(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
        })
        .or_else(|| entry.path().map(String::from))
}
