//! Sync service for bringing the primary branch into a feature branch.
//!
//! The service fetches the primary branch, then merges or rebases the current
//! branch onto its remote-tracking ref. Conflicts leave nothing behind: the
//! merge or rebase is aborted before the error is returned.

use std::fmt;
use std::str::FromStr;

use gitmgr_core::{Error, GeneralConfig, Result};
use gitmgr_git::GitOps;
use gitmgr_github::Auth;
use serde::{Deserialize, Serialize};

use super::{current_branch, git_err, history_delta, short_sha, url_rewrite};

/// How to integrate the primary branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStrategy {
    #[default]
    Merge,
    Rebase,
}

impl SyncStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Rebase => "rebase",
        }
    }

    const fn conflict_operation(self) -> &'static str {
        match self {
            Self::Merge => "Merge",
            Self::Rebase => "Rebase",
        }
    }
}

impl FromStr for SyncStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "merge" => Ok(Self::Merge),
            "rebase" => Ok(Self::Rebase),
            other => Err(Error::InvalidStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of `git_sync_with_main`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncRequest {
    #[serde(default)]
    pub main_branch: Option<String>,
    /// `merge` (default) or `rebase`.
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub remote: Option<String>,
}

/// Outcome of `git_sync_with_main`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub branch: String,
    pub main_branch: String,
    pub strategy: SyncStrategy,
    pub sha_before: String,
    pub sha_after: String,
    pub commits_added: usize,
    pub up_to_date: bool,
    pub files_changed: Vec<String>,
}

/// Service for sync operations with trait-based dependencies.
pub struct SyncService<'a, G: GitOps> {
    repo: &'a G,
    auth: &'a Auth,
    defaults: &'a GeneralConfig,
}

impl<'a, G: GitOps> SyncService<'a, G> {
    /// Create a new sync service; `defaults` supplies the primary branch and remote.
    #[must_use]
    pub const fn new(repo: &'a G, auth: &'a Auth, defaults: &'a GeneralConfig) -> Self {
        Self {
            repo,
            auth,
            defaults,
        }
    }

    /// Fetch the primary branch and integrate it into the current branch.
    ///
    /// Every local precondition is checked before the remote is contacted.
    pub fn sync(&self, request: &SyncRequest) -> Result<SyncResult> {
        let strategy = request
            .strategy
            .as_deref()
            .map_or(Ok(SyncStrategy::default()), |s| s.parse())?;
        let main_branch = request
            .main_branch
            .as_deref()
            .unwrap_or(&self.defaults.main_branch);
        let remote = request
            .remote
            .as_deref()
            .unwrap_or(&self.defaults.default_remote);

        let branch = current_branch(self.repo)?;
        if branch == main_branch {
            return Err(Error::AlreadyOnBranch(branch));
        }
        if !self.repo.is_clean().map_err(git_err)? {
            return Err(Error::DirtyWorkingTree("sync"));
        }

        let rewrite = url_rewrite(self.repo, remote, self.auth);
        self.repo
            .fetch(remote, main_branch, rewrite.as_ref())
            .map_err(|source| Error::FetchFailed {
                remote: remote.to_string(),
                source,
            })?;

        let before = self.repo.head_commit().map_err(git_err)?;
        let target = format!("{remote}/{main_branch}");
        let target_oid = self.repo.resolve_commit(&target).map_err(git_err)?;
        let commits_added = self
            .repo
            .count_commits_between(before, target_oid)
            .map_err(git_err)?;

        if commits_added == 0 {
            tracing::info!(branch = %branch, main_branch, "already up to date");
            let sha = before.to_string();
            return Ok(SyncResult {
                branch,
                main_branch: main_branch.to_string(),
                strategy,
                sha_before: sha.clone(),
                sha_after: sha,
                commits_added: 0,
                up_to_date: true,
                files_changed: Vec::new(),
            });
        }

        self.integrate(strategy, &target)?;

        let after = self.repo.head_commit().map_err(git_err)?;
        let (_, files_changed) = history_delta(self.repo, before, after);

        let sha_after = after.to_string();
        tracing::info!(
            branch = %branch,
            main_branch,
            strategy = strategy.as_str(),
            commits_added,
            sha = short_sha(&sha_after),
            "synced with primary branch"
        );

        Ok(SyncResult {
            branch,
            main_branch: main_branch.to_string(),
            strategy,
            sha_before: before.to_string(),
            sha_after,
            commits_added,
            up_to_date: false,
            files_changed,
        })
    }

    fn integrate(&self, strategy: SyncStrategy, target: &str) -> Result<()> {
        let outcome = match strategy {
            SyncStrategy::Merge => self.repo.merge(target),
            SyncStrategy::Rebase => self.repo.rebase(target),
        };

        outcome.map_err(|e| {
            if e.is_conflict() {
                self.abort(strategy);
                Error::Conflict {
                    operation: strategy.conflict_operation(),
                }
            } else if e.is_auth_failure() {
                Error::AuthenticationFailed
            } else {
                Error::command_failed(strategy.conflict_operation(), e)
            }
        })
    }

    fn abort(&self, strategy: SyncStrategy) {
        let aborted = match strategy {
            SyncStrategy::Merge => self.repo.merge_abort(),
            SyncStrategy::Rebase => self.repo.rebase_abort(),
        };
        if let Err(e) = aborted {
            tracing::debug!(error = %e, strategy = strategy.as_str(), "abort failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_mocks::{MockGitOps, oid};
    use gitmgr_git::WorkingTreeStatus;

    fn sync(mock: &MockGitOps, request: &SyncRequest) -> Result<SyncResult> {
        let defaults = GeneralConfig::default();
        SyncService::new(mock, &Auth::None, &defaults).sync(request)
    }

    fn feature_branch() -> MockGitOps {
        MockGitOps::new()
            .with_current_branch("feature")
            .with_remote("origin", "https://example.com/r.git")
            .with_head(oid(1))
            .with_ref("origin/main", oid(2))
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("merge".parse::<SyncStrategy>().unwrap(), SyncStrategy::Merge);
        assert_eq!("rebase".parse::<SyncStrategy>().unwrap(), SyncStrategy::Rebase);
        let err = "squash".parse::<SyncStrategy>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid strategy 'squash'. Must be 'merge' or 'rebase'."
        );
    }

    #[test]
    fn test_on_main_fails_without_network() {
        let mock = MockGitOps::new().with_current_branch("main");
        let err = sync(&mock, &SyncRequest::default()).unwrap_err();

        assert!(matches!(err, Error::AlreadyOnBranch(ref b) if b == "main"));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_invalid_strategy_checked_first() {
        let mock = MockGitOps::new().with_current_branch("main");
        let request = SyncRequest {
            strategy: Some("squash".into()),
            ..SyncRequest::default()
        };
        let err = sync(&mock, &request).unwrap_err();
        assert!(matches!(err, Error::InvalidStrategy(_)));
    }

    #[test]
    fn test_dirty_tree_fails() {
        let mock = feature_branch().with_tree(WorkingTreeStatus {
            untracked: vec!["scratch.txt".into()],
            ..WorkingTreeStatus::default()
        });
        let err = sync(&mock, &SyncRequest::default()).unwrap_err();

        assert!(matches!(err, Error::DirtyWorkingTree("sync")));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_up_to_date_skips_merge() {
        let mock = feature_branch();
        let result = sync(&mock, &SyncRequest::default()).unwrap();

        assert!(result.up_to_date);
        assert_eq!(result.commits_added, 0);
        assert_eq!(result.sha_before, result.sha_after);
        assert_eq!(mock.calls(), vec!["fetch origin main"]);
    }

    #[test]
    fn test_merge_new_commits() {
        let mock = feature_branch()
            .with_count(oid(1), oid(2), 3)
            .with_head_after_update(oid(5))
            .with_changed_files(&["lib.rs"]);

        let result = sync(&mock, &SyncRequest::default()).unwrap();
        assert!(!result.up_to_date);
        assert_eq!(result.commits_added, 3);
        assert_eq!(result.strategy, SyncStrategy::Merge);
        assert_eq!(result.sha_after, oid(5).to_string());
        assert_eq!(result.files_changed, vec!["lib.rs"]);
        assert_eq!(mock.calls(), vec!["fetch origin main", "merge origin/main"]);
    }

    #[test]
    fn test_rebase_onto_custom_main() {
        let mock = feature_branch()
            .with_ref("upstream/develop", oid(3))
            .with_remote("upstream", "https://example.com/u.git")
            .with_count(oid(1), oid(3), 1);
        let request = SyncRequest {
            main_branch: Some("develop".into()),
            strategy: Some("rebase".into()),
            remote: Some("upstream".into()),
        };

        let result = sync(&mock, &request).unwrap();
        assert_eq!(result.main_branch, "develop");
        assert_eq!(
            mock.calls(),
            vec!["fetch upstream develop", "rebase upstream/develop"]
        );
    }

    #[test]
    fn test_merge_conflict_aborts() {
        let mock = feature_branch()
            .with_count(oid(1), oid(2), 1)
            .with_failure("merge", "CONFLICT (content): Merge conflict in a.txt");

        let err = sync(&mock, &SyncRequest::default()).unwrap_err();
        assert!(matches!(err, Error::Conflict { operation: "Merge" }));
        assert_eq!(
            mock.calls(),
            vec!["fetch origin main", "merge origin/main", "merge --abort"]
        );
    }

    #[test]
    fn test_rebase_conflict_aborts_rebase() {
        let mock = feature_branch()
            .with_count(oid(1), oid(2), 1)
            .with_failure("rebase", "CONFLICT (content): could not apply 1234abc");
        let request = SyncRequest {
            strategy: Some("rebase".into()),
            ..SyncRequest::default()
        };

        let err = sync(&mock, &request).unwrap_err();
        assert!(matches!(err, Error::Conflict { operation: "Rebase" }));
        assert_eq!(mock.calls().last().map(String::as_str), Some("rebase --abort"));
    }

    #[test]
    fn test_fetch_failure_message() {
        let mock = feature_branch().with_failure("fetch", "fatal: unable to access");
        let err = sync(&mock, &SyncRequest::default()).unwrap_err();
        assert!(matches!(err, Error::FetchFailed { ref remote, .. } if remote == "origin"));
        assert!(err.to_string().starts_with("Failed to fetch from origin: "));
        assert_eq!(mock.calls(), vec!["fetch origin main"]);
    }

    #[test]
    fn test_result_serializes_strategy_lowercase() {
        let mock = feature_branch();
        let json = serde_json::to_value(sync(&mock, &SyncRequest::default()).unwrap()).unwrap();
        assert_eq!(json["strategy"], "merge");
        assert_eq!(json["up_to_date"], true);
    }
}
