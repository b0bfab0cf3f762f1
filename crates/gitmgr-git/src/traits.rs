//! Trait abstractions for git operations.
//!
//! This module defines the `GitOps` trait which abstracts git operations,
//! enabling dependency injection and testability.

use std::path::Path;

use git2::Oid;

use crate::{CommitStats, PushFlags, Repository, Result, UrlRewrite, WorkingTreeStatus};

/// Trait for git repository operations.
///
/// This trait abstracts git operations, allowing for:
/// - Dependency injection in tool operations
/// - Mock implementations for testing
///
/// Operations are synchronous: git2 is a synchronous library and the
/// subprocess-backed operations wait for git to exit.
#[allow(clippy::missing_errors_doc)]
pub trait GitOps {
    // === Repository Info ===

    /// Get the working directory path.
    fn workdir(&self) -> Option<&Path>;

    /// Get the current branch name.
    ///
    /// Returns an error if HEAD is detached.
    fn current_branch(&self) -> Result<String>;

    /// Check if HEAD is detached.
    fn head_detached(&self) -> Result<bool>;

    /// Get the commit HEAD points at.
    fn head_commit(&self) -> Result<Oid>;

    // === Branch Operations ===

    /// Check if a branch exists.
    fn branch_exists(&self, name: &str) -> bool;

    /// Create a new branch at the current HEAD.
    ///
    /// Returns the OID of the new branch's tip commit.
    fn create_branch(&self, name: &str) -> Result<Oid>;

    /// Checkout a branch.
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Detect the default branch (main/master).
    ///
    /// Returns `None` if neither main nor master exists.
    fn detect_default_branch(&self) -> Option<String>;

    /// Short name of a branch's upstream, if configured.
    fn upstream_branch(&self, branch: &str) -> Result<Option<String>>;

    // === Commit Graph ===

    /// Resolve a revision to a commit.
    fn resolve_commit(&self, spec: &str) -> Result<Oid>;

    /// Count commits reachable from `to` but not from `from`.
    fn count_commits_between(&self, from: Oid, to: Oid) -> Result<usize>;

    /// Paths changed between two commits.
    fn changed_files(&self, from: Oid, to: Oid) -> Result<Vec<String>>;

    // === Working Directory ===

    /// Staged, modified and untracked paths.
    fn working_tree_status(&self) -> Result<WorkingTreeStatus>;

    /// Check if the working directory is clean.
    fn is_clean(&self) -> Result<bool>;

    /// Stage all changes.
    fn stage_all(&self) -> Result<()>;

    /// Stage specific paths.
    fn stage_paths(&self, paths: &[String]) -> Result<()>;

    /// Check if there are staged changes.
    fn has_staged_changes(&self) -> Result<bool>;

    /// Create a commit with the staged changes.
    fn create_commit(&self, message: &str, skip_hooks: bool) -> Result<Oid>;

    /// File and line totals of a commit.
    fn commit_stats(&self, commit: Oid) -> Result<CommitStats>;

    // === Remote Operations ===

    /// Check if a remote is configured.
    fn remote_exists(&self, name: &str) -> bool;

    /// Check if any remote is configured.
    fn has_remotes(&self) -> Result<bool>;

    /// Get a remote's URL.
    fn remote_url(&self, name: &str) -> Result<String>;

    /// Check if a remote-tracking branch exists.
    fn remote_branch_exists(&self, remote: &str, branch: &str) -> bool;

    /// Fetch a specific branch.
    fn fetch(&self, remote: &str, branch: &str, rewrite: Option<&UrlRewrite>) -> Result<()>;

    /// Pull a branch (merge strategy).
    fn pull(&self, remote: &str, branch: &str, rewrite: Option<&UrlRewrite>) -> Result<()>;

    /// Push a branch to the remote.
    fn push(
        &self,
        remote: &str,
        branch: &str,
        flags: PushFlags,
        rewrite: Option<&UrlRewrite>,
    ) -> Result<()>;

    // === Merge / Rebase ===

    /// Merge a revision into the current branch.
    fn merge(&self, target: &str) -> Result<()>;

    /// Rebase the current branch onto a revision.
    fn rebase(&self, target: &str) -> Result<()>;

    /// Abort a merge in progress.
    fn merge_abort(&self) -> Result<()>;

    /// Abort a rebase in progress.
    fn rebase_abort(&self) -> Result<()>;
}

impl GitOps for Repository {
    fn workdir(&self) -> Option<&Path> {
        self.workdir()
    }

    fn current_branch(&self) -> Result<String> {
        self.current_branch()
    }

    fn head_detached(&self) -> Result<bool> {
        self.head_detached()
    }

    fn head_commit(&self) -> Result<Oid> {
        self.head_commit()
    }

    fn branch_exists(&self, name: &str) -> bool {
        self.branch_exists(name)
    }

    fn create_branch(&self, name: &str) -> Result<Oid> {
        self.create_branch(name)
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.checkout(branch)
    }

    fn detect_default_branch(&self) -> Option<String> {
        self.detect_default_branch()
    }

    fn upstream_branch(&self, branch: &str) -> Result<Option<String>> {
        self.upstream_branch(branch)
    }

    fn resolve_commit(&self, spec: &str) -> Result<Oid> {
        self.resolve_commit(spec)
    }

    fn count_commits_between(&self, from: Oid, to: Oid) -> Result<usize> {
        self.count_commits_between(from, to)
    }

    fn changed_files(&self, from: Oid, to: Oid) -> Result<Vec<String>> {
        self.changed_files(from, to)
    }

    fn working_tree_status(&self) -> Result<WorkingTreeStatus> {
        self.working_tree_status()
    }

    fn is_clean(&self) -> Result<bool> {
        self.is_clean()
    }

    fn stage_all(&self) -> Result<()> {
        self.stage_all()
    }

    fn stage_paths(&self, paths: &[String]) -> Result<()> {
        self.stage_paths(paths)
    }

    fn has_staged_changes(&self) -> Result<bool> {
        self.has_staged_changes()
    }

    fn create_commit(&self, message: &str, skip_hooks: bool) -> Result<Oid> {
        self.create_commit(message, skip_hooks)
    }

    fn commit_stats(&self, commit: Oid) -> Result<CommitStats> {
        self.commit_stats(commit)
    }

    fn remote_exists(&self, name: &str) -> bool {
        self.remote_exists(name)
    }

    fn has_remotes(&self) -> Result<bool> {
        self.has_remotes()
    }

    fn remote_url(&self, name: &str) -> Result<String> {
        self.remote_url(name)
    }

    fn remote_branch_exists(&self, remote: &str, branch: &str) -> bool {
        self.remote_branch_exists(remote, branch)
    }

    fn fetch(&self, remote: &str, branch: &str, rewrite: Option<&UrlRewrite>) -> Result<()> {
        self.fetch(remote, branch, rewrite)
    }

    fn pull(&self, remote: &str, branch: &str, rewrite: Option<&UrlRewrite>) -> Result<()> {
        self.pull(remote, branch, rewrite)
    }

    fn push(
        &self,
        remote: &str,
        branch: &str,
        flags: PushFlags,
        rewrite: Option<&UrlRewrite>,
    ) -> Result<()> {
        self.push(remote, branch, flags, rewrite)
    }

    fn merge(&self, target: &str) -> Result<()> {
        self.merge(target)
    }

    fn rebase(&self, target: &str) -> Result<()> {
        self.rebase(target)
    }

    fn merge_abort(&self) -> Result<()> {
        self.merge_abort()
    }

    fn rebase_abort(&self) -> Result<()> {
        self.rebase_abort()
    }
}
