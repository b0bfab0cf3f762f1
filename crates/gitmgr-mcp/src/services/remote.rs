//! Remote service for push and pull.

use gitmgr_core::{Error, Result};
use gitmgr_git::{GitOps, PushFlags};
use gitmgr_github::Auth;
use serde::{Deserialize, Serialize};

use super::{current_branch, git_err, history_delta, require_remote, short_sha, url_rewrite};

const fn default_true() -> bool {
    true
}

/// Arguments of `git_push`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushRequest {
    #[serde(default)]
    pub remote: Option<String>,
    /// Defaults to the current branch.
    #[serde(default)]
    pub branch: Option<String>,
    /// Record the upstream when the branch is new on the remote.
    #[serde(default = "default_true")]
    pub set_upstream: bool,
    #[serde(default)]
    pub force: bool,
}

impl Default for PushRequest {
    fn default() -> Self {
        Self {
            remote: None,
            branch: None,
            set_upstream: true,
            force: false,
        }
    }
}

/// Outcome of `git_push`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushResult {
    pub branch: String,
    pub remote: String,
    pub sha: String,
    pub commits_pushed: usize,
    pub is_new_branch: bool,
    pub force: bool,
}

/// Arguments of `git_pull`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PullRequest {
    #[serde(default)]
    pub remote: Option<String>,
    /// Defaults to the current branch.
    #[serde(default)]
    pub branch: Option<String>,
}

/// Outcome of `git_pull`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullResult {
    pub branch: String,
    pub remote: String,
    pub sha_before: String,
    pub sha_after: String,
    pub commits_pulled: usize,
    pub files_changed: Vec<String>,
    pub up_to_date: bool,
}

/// Service for talking to remotes with trait-based dependencies.
pub struct RemoteService<'a, G: GitOps> {
    repo: &'a G,
    auth: &'a Auth,
    default_remote: &'a str,
}

impl<'a, G: GitOps> RemoteService<'a, G> {
    /// Create a new remote service; `default_remote` applies when a request names none.
    #[must_use]
    pub const fn new(repo: &'a G, auth: &'a Auth, default_remote: &'a str) -> Self {
        Self {
            repo,
            auth,
            default_remote,
        }
    }

    /// Push a branch, authenticating with the GitHub token when it applies.
    pub fn push(&self, request: &PushRequest) -> Result<PushResult> {
        let branch = match &request.branch {
            Some(branch) => branch.clone(),
            None => current_branch(self.repo)?,
        };
        let remote = request.remote.as_deref().unwrap_or(self.default_remote);
        require_remote(self.repo, remote)?;

        let is_new_branch = !self.repo.remote_branch_exists(remote, &branch);
        let sha = self.repo.head_commit().map_err(git_err)?.to_string();
        let commits_pushed = if is_new_branch {
            1
        } else {
            self.commits_ahead(remote, &branch)
        };

        let flags = PushFlags {
            set_upstream: request.set_upstream && is_new_branch,
            force: request.force,
        };
        let rewrite = url_rewrite(self.repo, remote, self.auth);

        self.repo
            .push(remote, &branch, flags, rewrite.as_ref())
            .map_err(|e| {
                if e.is_auth_failure() {
                    Error::AuthenticationFailed
                } else if e.is_non_fast_forward() {
                    Error::NonFastForward
                } else if e.is_invalid_remote() {
                    Error::InvalidRemote(remote.to_string())
                } else {
                    Error::command_failed("Push", e)
                }
            })?;

        tracing::info!(
            branch = %branch,
            remote,
            sha = short_sha(&sha),
            commits_pushed,
            is_new_branch,
            force = request.force,
            "pushed"
        );

        Ok(PushResult {
            branch,
            remote: remote.to_string(),
            sha,
            commits_pushed,
            is_new_branch,
            force: request.force,
        })
    }

    /// Pull a branch with a merge, refusing to touch a dirty working tree.
    pub fn pull(&self, request: &PullRequest) -> Result<PullResult> {
        let branch = match &request.branch {
            Some(branch) => branch.clone(),
            None => current_branch(self.repo)?,
        };
        let remote = request.remote.as_deref().unwrap_or(self.default_remote);

        if !self.repo.is_clean().map_err(git_err)? {
            return Err(Error::DirtyWorkingTree("pull"));
        }
        require_remote(self.repo, remote)?;

        let before = self.repo.head_commit().map_err(git_err)?;
        let rewrite = url_rewrite(self.repo, remote, self.auth);

        self.repo
            .pull(remote, &branch, rewrite.as_ref())
            .map_err(|e| {
                if e.is_auth_failure() {
                    Error::AuthenticationFailed
                } else if e.is_conflict() {
                    if let Err(abort) = self.repo.merge_abort() {
                        tracing::debug!(error = %abort, "merge abort failed");
                    }
                    Error::Conflict { operation: "Merge" }
                } else if e.is_invalid_remote() {
                    Error::InvalidRemote(remote.to_string())
                } else if e.is_missing_remote_ref() {
                    Error::RemoteBranchNotFound {
                        branch: branch.clone(),
                        remote: remote.to_string(),
                    }
                } else {
                    Error::command_failed("Pull", e)
                }
            })?;

        let after = self.repo.head_commit().map_err(git_err)?;
        let (commits_pulled, files_changed) = history_delta(self.repo, before, after);

        tracing::info!(branch = %branch, remote, commits_pulled, "pulled");

        Ok(PullResult {
            branch,
            remote: remote.to_string(),
            sha_before: before.to_string(),
            sha_after: after.to_string(),
            commits_pulled,
            files_changed,
            up_to_date: before == after,
        })
    }

    /// Commits on the local branch not on its remote-tracking ref.
    fn commits_ahead(&self, remote: &str, branch: &str) -> usize {
        let count = || -> gitmgr_git::Result<usize> {
            let local = self.repo.resolve_commit(branch)?;
            let tracking = self.repo.resolve_commit(&format!("{remote}/{branch}"))?;
            self.repo.count_commits_between(tracking, local)
        };

        count().unwrap_or_else(|e| {
            tracing::debug!(error = %e, remote, branch, "could not count commits to push");
            0
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_mocks::{MockGitOps, oid};
    use gitmgr_git::WorkingTreeStatus;

    const URL: &str = "https://github.com/o/r.git";

    fn service<'a>(mock: &'a MockGitOps, auth: &'a Auth) -> RemoteService<'a, MockGitOps> {
        RemoteService::new(mock, auth, "origin")
    }

    #[test]
    fn test_push_new_branch_sets_upstream() {
        let mock = MockGitOps::new()
            .with_current_branch("feature")
            .with_head(oid(3))
            .with_remote("origin", URL);

        let result = service(&mock, &Auth::None)
            .push(&PushRequest::default())
            .unwrap();

        assert!(result.is_new_branch);
        assert_eq!(result.commits_pushed, 1);
        assert_eq!(result.sha, oid(3).to_string());
        assert_eq!(mock.calls(), vec!["push -u origin feature"]);
    }

    #[test]
    fn test_push_existing_branch_counts_ahead() {
        let mock = MockGitOps::new()
            .with_current_branch("feature")
            .with_remote("origin", URL)
            .with_remote_branch("origin", "feature")
            .with_ref("feature", oid(2))
            .with_ref("origin/feature", oid(1))
            .with_count(oid(1), oid(2), 4);

        let result = service(&mock, &Auth::None)
            .push(&PushRequest {
                force: true,
                ..PushRequest::default()
            })
            .unwrap();

        assert!(!result.is_new_branch);
        assert_eq!(result.commits_pushed, 4);
        assert!(result.force);
        assert_eq!(mock.calls(), vec!["push --force origin feature"]);
    }

    #[test]
    fn test_push_uses_token_rewrite() {
        let mock = MockGitOps::new().with_remote("origin", URL);
        let auth = Auth::Token(gitmgr_github::SecretString::from("tok"));

        service(&mock, &auth).push(&PushRequest::default()).unwrap();
        assert_eq!(mock.calls(), vec!["push -u origin main [auth]"]);
    }

    #[test]
    fn test_push_missing_remote() {
        let mock = MockGitOps::new();
        let err = service(&mock, &Auth::None)
            .push(&PushRequest::default())
            .unwrap_err();
        assert!(matches!(err, Error::RemoteNotFound(ref r) if r == "origin"));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_push_failure_interpretation() {
        let cases = [
            ("fatal: Authentication failed for 'x'", "auth"),
            (" ! [rejected] main -> main (non-fast-forward)", "nff"),
            ("fatal: 'origin' does not appear to be a git repository", "invalid"),
            ("error: RPC failed", "other"),
        ];
        for (output, kind) in cases {
            let mock = MockGitOps::new()
                .with_remote("origin", URL)
                .with_failure("push", output);
            let err = service(&mock, &Auth::None)
                .push(&PushRequest::default())
                .unwrap_err();
            match kind {
                "auth" => assert!(matches!(err, Error::AuthenticationFailed)),
                "nff" => {
                    assert!(matches!(err, Error::NonFastForward));
                    assert!(err.to_string().contains("git_pull()"));
                }
                "invalid" => assert!(matches!(err, Error::InvalidRemote(_))),
                _ => assert!(err.to_string().starts_with("Push failed:")),
            }
        }
    }

    #[test]
    fn test_pull_dirty_tree_fails_before_remote_check() {
        let mock = MockGitOps::new().with_tree(WorkingTreeStatus {
            modified: vec!["a.txt".into()],
            ..WorkingTreeStatus::default()
        });

        let err = service(&mock, &Auth::None)
            .pull(&PullRequest::default())
            .unwrap_err();
        assert!(matches!(err, Error::DirtyWorkingTree("pull")));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_pull_up_to_date() {
        let mock = MockGitOps::new().with_remote("origin", URL).with_head(oid(1));
        let result = service(&mock, &Auth::None)
            .pull(&PullRequest::default())
            .unwrap();

        assert!(result.up_to_date);
        assert_eq!(result.commits_pulled, 0);
        assert!(result.files_changed.is_empty());
        assert_eq!(result.sha_before, result.sha_after);
    }

    #[test]
    fn test_pull_new_commits() {
        let mock = MockGitOps::new()
            .with_remote("origin", URL)
            .with_head(oid(1))
            .with_head_after_update(oid(2))
            .with_count(oid(1), oid(2), 2)
            .with_changed_files(&["a.txt", "b.txt"]);

        let result = service(&mock, &Auth::None)
            .pull(&PullRequest::default())
            .unwrap();

        assert!(!result.up_to_date);
        assert_eq!(result.commits_pulled, 2);
        assert_eq!(result.files_changed, vec!["a.txt", "b.txt"]);
        assert_eq!(mock.calls(), vec!["pull origin main"]);
    }

    #[test]
    fn test_pull_conflict_aborts_merge() {
        let mock = MockGitOps::new()
            .with_remote("origin", URL)
            .with_failure("pull", "CONFLICT (content): Merge conflict in a.txt");

        let err = service(&mock, &Auth::None)
            .pull(&PullRequest::default())
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { operation: "Merge" }));
        assert_eq!(mock.calls(), vec!["pull origin main", "merge --abort"]);
    }

    #[test]
    fn test_pull_missing_remote_branch() {
        let mock = MockGitOps::new()
            .with_remote("origin", URL)
            .with_failure("pull", "fatal: couldn't find remote ref feature");

        let err = service(&mock, &Auth::None)
            .pull(&PullRequest {
                branch: Some("feature".into()),
                ..PullRequest::default()
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Branch 'feature' does not exist on remote 'origin'."
        );
    }

    #[test]
    fn test_push_request_defaults() {
        let req: PushRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.set_upstream);
        assert!(!req.force);
        assert!(req.remote.is_none());
    }
}
