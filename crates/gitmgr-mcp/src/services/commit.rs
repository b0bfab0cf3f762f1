//! Commit service for conventional commits.

use gitmgr_core::{CommitConfig, CommitType, Error, Result, build_message, validate_message};
use gitmgr_git::{CommitStats, GitOps};
use serde::{Deserialize, Serialize};

use super::{git_err, short_sha};

/// Arguments of `git_commit`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitRequest {
    /// Conventional commit type, e.g. `feat`.
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Subject after the `type: ` prefix.
    pub message: String,
    /// Stage only these paths instead of everything.
    #[serde(default)]
    pub files: Option<Vec<String>>,
    /// Pass `--no-verify`.
    #[serde(default)]
    pub skip_hooks: bool,
}

/// Line and file totals of the new commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsResult {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl From<CommitStats> for StatsResult {
    fn from(stats: CommitStats) -> Self {
        Self {
            files_changed: stats.files_changed,
            insertions: stats.insertions,
            deletions: stats.deletions,
        }
    }
}

/// Outcome of `git_commit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitResult {
    pub sha: String,
    pub stats: StatsResult,
    pub message: String,
}

/// Service for creating commits with trait-based dependencies.
pub struct CommitService<'a, G: GitOps> {
    repo: &'a G,
    config: &'a CommitConfig,
}

impl<'a, G: GitOps> CommitService<'a, G> {
    /// Create a new commit service.
    #[must_use]
    pub const fn new(repo: &'a G, config: &'a CommitConfig) -> Self {
        Self { repo, config }
    }

    /// Validate, stage and commit.
    ///
    /// Stages `files` when given, otherwise every change including
    /// untracked and deleted files.
    pub fn commit(&self, request: &CommitRequest) -> Result<CommitResult> {
        let commit_type: CommitType = request.commit_type.parse()?;
        validate_message(&request.message)?;

        if let Some(files) = &request.files {
            self.require_files_exist(files)?;
        }

        if self.repo.is_clean().map_err(git_err)? {
            return Err(Error::NothingToCommit);
        }

        match &request.files {
            Some(files) => self.repo.stage_paths(files),
            None => self.repo.stage_all(),
        }
        .map_err(git_err)?;

        if !self.repo.has_staged_changes().map_err(git_err)? {
            return Err(Error::NothingToCommit);
        }

        let message = build_message(commit_type, &request.message, self.config);
        let oid = self
            .repo
            .create_commit(&message, request.skip_hooks)
            .map_err(|e| Error::command_failed("Commit", e))?;
        let stats = self.repo.commit_stats(oid).map_err(git_err)?;

        let sha = oid.to_string();
        tracing::info!(
            sha = short_sha(&sha),
            commit_type = commit_type.as_str(),
            files_changed = stats.files_changed,
            "created commit"
        );

        Ok(CommitResult {
            sha,
            stats: stats.into(),
            message,
        })
    }

    fn require_files_exist(&self, files: &[String]) -> Result<()> {
        let workdir = self
            .repo
            .workdir()
            .ok_or(Error::Git(gitmgr_git::Error::BareRepository))?;

        match files.iter().find(|file| !workdir.join(file).exists()) {
            Some(missing) => Err(Error::FileNotFound(missing.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::services::test_mocks::{MockGitOps, oid};
    use gitmgr_git::WorkingTreeStatus;

    fn request(commit_type: &str, message: &str) -> CommitRequest {
        CommitRequest {
            commit_type: commit_type.into(),
            message: message.into(),
            files: None,
            skip_hooks: false,
        }
    }

    fn dirty() -> WorkingTreeStatus {
        WorkingTreeStatus {
            untracked: vec!["new.txt".into()],
            ..WorkingTreeStatus::default()
        }
    }

    #[test]
    fn test_commit_stages_all_and_formats_message() {
        let mock = MockGitOps::new()
            .with_tree(dirty())
            .with_staged_changes(true)
            .with_commit(
                oid(9),
                CommitStats {
                    files_changed: 1,
                    insertions: 2,
                    deletions: 0,
                },
            );
        let config = CommitConfig::default();

        let result = CommitService::new(&mock, &config)
            .commit(&request("feat", "add x"))
            .unwrap();

        assert_eq!(result.sha, oid(9).to_string());
        assert_eq!(result.stats.files_changed, 1);
        assert!(result.message.starts_with("feat: add x\n\n"));
        assert!(result.message.contains("Co-Authored-By:"));
        assert_eq!(mock.calls(), vec!["stage_all", "commit"]);
    }

    #[test]
    fn test_invalid_type_checked_before_message() {
        let mock = MockGitOps::new();
        let config = CommitConfig::default();
        let err = CommitService::new(&mock, &config)
            .commit(&request("feature", ""))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCommitType { .. }));
    }

    #[test]
    fn test_empty_message() {
        let mock = MockGitOps::new();
        let config = CommitConfig::default();
        let err = CommitService::new(&mock, &config)
            .commit(&request("fix", "   "))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyMessage));
    }

    #[test]
    fn test_clean_tree_has_nothing_to_commit() {
        let mock = MockGitOps::new();
        let config = CommitConfig::default();
        let err = CommitService::new(&mock, &config)
            .commit(&request("chore", "tidy"))
            .unwrap_err();
        assert!(matches!(err, Error::NothingToCommit));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_nothing_staged_after_staging() {
        let mock = MockGitOps::new().with_tree(dirty()).with_staged_changes(false);
        let config = CommitConfig::default();
        let err = CommitService::new(&mock, &config)
            .commit(&request("chore", "tidy"))
            .unwrap_err();
        assert!(matches!(err, Error::NothingToCommit));
        assert!(!mock.calls().contains(&"commit".to_string()));
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("present.txt"), "x").unwrap();
        let mock = MockGitOps::new().with_workdir(temp.path()).with_tree(dirty());
        let config = CommitConfig::default();

        let mut req = request("docs", "update");
        req.files = Some(vec!["present.txt".into(), "absent.txt".into()]);
        let err = CommitService::new(&mock, &config).commit(&req).unwrap_err();

        assert!(matches!(err, Error::FileNotFound(ref f) if f == "absent.txt"));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_stages_only_given_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "x").unwrap();
        let mock = MockGitOps::new()
            .with_workdir(temp.path())
            .with_tree(dirty())
            .with_staged_changes(true);
        let config = CommitConfig::default();

        let mut req = request("docs", "update");
        req.files = Some(vec!["a.txt".into()]);
        req.skip_hooks = true;
        CommitService::new(&mock, &config).commit(&req).unwrap();

        assert_eq!(mock.calls(), vec!["stage a.txt", "commit --no-verify"]);
    }

    #[test]
    fn test_request_uses_type_key() {
        let req: CommitRequest =
            serde_json::from_value(serde_json::json!({"type": "fix", "message": "m"})).unwrap();
        assert_eq!(req.commit_type, "fix");
        assert!(!req.skip_hooks);

        let unknown = serde_json::from_value::<CommitRequest>(
            serde_json::json!({"type": "fix", "message": "m", "amend": true}),
        );
        assert!(unknown.is_err());
    }
}
