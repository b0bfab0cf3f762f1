//! Status service for the current branch and working tree.

use gitmgr_core::Result;
use gitmgr_git::GitOps;
use serde::Serialize;

use super::{current_branch, git_err};

/// Branch, tracking and file state of the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub branch: String,
    pub tracking: Option<String>,
    pub ahead: usize,
    pub behind: usize,
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    pub clean: bool,
}

/// Service for reporting repository status with trait-based dependencies.
pub struct StatusService<'a, G: GitOps> {
    repo: &'a G,
}

impl<'a, G: GitOps> StatusService<'a, G> {
    /// Create a new status service.
    #[must_use]
    pub const fn new(repo: &'a G) -> Self {
        Self { repo }
    }

    /// Compute the status of the current branch.
    ///
    /// Tracking information is best effort: a missing or unreadable upstream
    /// reports no tracking branch and zero counts.
    pub fn status(&self) -> Result<StatusResult> {
        let branch = current_branch(self.repo)?;

        let tracking = self.repo.upstream_branch(&branch).unwrap_or_else(|e| {
            tracing::debug!(error = %e, branch = %branch, "could not read upstream");
            None
        });
        let (ahead, behind) = tracking
            .as_deref()
            .map_or((0, 0), |upstream| self.ahead_behind(&branch, upstream));

        let tree = self.repo.working_tree_status().map_err(git_err)?;
        let clean = tree.is_clean();

        tracing::info!(
            branch = %branch,
            clean,
            staged = tree.staged.len(),
            modified = tree.modified.len(),
            untracked = tree.untracked.len(),
            "status"
        );

        Ok(StatusResult {
            branch,
            tracking,
            ahead,
            behind,
            staged: tree.staged,
            modified: tree.modified,
            untracked: tree.untracked,
            clean,
        })
    }

    /// Commits on `local` not on `upstream`, and the reverse.
    ///
    /// Returns `(0, 0)` if either side can't be resolved.
    pub fn ahead_behind(&self, local: &str, upstream: &str) -> (usize, usize) {
        let count = || -> gitmgr_git::Result<(usize, usize)> {
            let local = self.repo.resolve_commit(local)?;
            let upstream = self.repo.resolve_commit(upstream)?;
            Ok((
                self.repo.count_commits_between(upstream, local)?,
                self.repo.count_commits_between(local, upstream)?,
            ))
        };

        count().unwrap_or_else(|e| {
            tracing::debug!(error = %e, local, upstream, "could not count ahead/behind");
            (0, 0)
        })
    }
}
