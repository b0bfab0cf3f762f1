//! Branch service for creating and checking out branches.

use gitmgr_core::{BranchNaming, Error, Result};
use gitmgr_git::GitOps;
use gitmgr_github::Auth;
use serde::{Deserialize, Serialize};

use super::{current_branch, git_err, short_sha, url_rewrite};

/// Arguments of `git_create_branch`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBranchRequest {
    /// Explicit name; wins over the auto-naming fields.
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub issue_number: Option<u64>,
    /// Lowercase slug used in the derived name.
    #[serde(default)]
    pub description: Option<String>,
    /// Base branch; defaults to HEAD, or the primary branch when auto-naming.
    #[serde(default)]
    pub from_branch: Option<String>,
    #[serde(default)]
    pub pull_latest: bool,
}

/// Outcome of `git_create_branch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBranchResult {
    pub branch_name: String,
    pub previous_branch: String,
    pub sha: String,
    pub based_on: Option<String>,
}

/// Service for creating branches with trait-based dependencies.
pub struct BranchService<'a, G: GitOps> {
    repo: &'a G,
    auth: &'a Auth,
    remote: &'a str,
}

impl<'a, G: GitOps> BranchService<'a, G> {
    /// Create a new branch service pulling bases from `remote`.
    #[must_use]
    pub const fn new(repo: &'a G, auth: &'a Auth, remote: &'a str) -> Self {
        Self { repo, auth, remote }
    }

    /// Create the branch and check it out.
    ///
    /// When the name is derived, the base defaults to the primary branch
    /// (`main`, else `master`) and the base is pulled first unless an explicit
    /// base was given.
    pub fn create(&self, request: &CreateBranchRequest) -> Result<CreateBranchResult> {
        let naming = BranchNaming::from_params(
            request.branch_name.as_deref(),
            request.issue_number,
            request.description.as_deref(),
        )?;
        let target = naming.branch_name()?.into_inner();
        let previous_branch = current_branch(self.repo)?;

        let (base, pull_latest) = if naming.is_auto() {
            let base = request.from_branch.clone().unwrap_or_else(|| {
                self.repo
                    .detect_default_branch()
                    .unwrap_or_else(|| "master".to_string())
            });
            (Some(base), request.pull_latest || request.from_branch.is_none())
        } else {
            (request.from_branch.clone(), request.pull_latest)
        };

        if self.repo.branch_exists(&target) {
            return Err(Error::BranchExists(target));
        }
        if let Some(base) = &base {
            if !self.repo.branch_exists(base) {
                return Err(Error::BranchNotFound(base.clone()));
            }
        }

        let failed = |e| Error::command_failed(format!("Create branch '{target}'"), e);

        if let Some(base) = &base {
            self.repo.checkout(base).map_err(failed)?;
            if pull_latest {
                self.pull_base(base);
            }
        }

        let oid = self.repo.create_branch(&target).map_err(failed)?;
        self.repo.checkout(&target).map_err(failed)?;

        let sha = oid.to_string();
        tracing::info!(branch = %target, sha = short_sha(&sha), "created branch");

        Ok(CreateBranchResult {
            branch_name: target,
            previous_branch,
            sha,
            based_on: base,
        })
    }

    /// Best-effort pull of the base branch; failures are logged and ignored.
    fn pull_base(&self, base: &str) {
        match self.repo.has_remotes() {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                tracing::debug!(error = %git_err(e), "could not list remotes, skipping pull");
                return;
            }
        }

        let rewrite = url_rewrite(self.repo, self.remote, self.auth);
        match self.repo.pull(self.remote, base, rewrite.as_ref()) {
            Ok(()) => tracing::info!(remote = self.remote, base, "pulled latest"),
            Err(e) => tracing::debug!(error = %e, "pull failed, continuing without pull"),
        }
    }
}
