//! Service layer for the git tools with dependency injection.
//!
//! Each service borrows a [`GitOps`] implementation, so the same logic runs
//! against a real repository or a mock. Services return the caller-visible
//! [`gitmgr_core::Error`]; protocol concerns live in the registry.

pub mod branch;
pub mod commit;
pub mod remote;
pub mod status;
pub mod sync;

#[cfg(test)]
pub mod test_mocks;

pub use branch::{BranchService, CreateBranchRequest, CreateBranchResult};
pub use commit::{CommitRequest, CommitResult, CommitService};
pub use remote::{PullRequest, PullResult, PushRequest, PushResult, RemoteService};
pub use status::{StatusResult, StatusService};
pub use sync::{SyncRequest, SyncResult, SyncService, SyncStrategy};

use gitmgr_core::Error;
use gitmgr_git::{GitOps, UrlRewrite};
use gitmgr_github::Auth;

/// Lift a git-layer error into the caller-visible error.
pub(crate) fn git_err(err: gitmgr_git::Error) -> Error {
    gitmgr_core::error::from_git(err)
}

/// First eight characters of a hex SHA, for logs.
pub(crate) fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

/// Current branch, failing with a detached-HEAD error when not on one.
pub(crate) fn current_branch<G: GitOps>(repo: &G) -> gitmgr_core::Result<String> {
    if repo.head_detached().map_err(git_err)? {
        return Err(Error::DetachedHead);
    }
    repo.current_branch().map_err(git_err)
}

/// Authenticated URL substitution for `remote`, when the token applies.
pub(crate) fn url_rewrite<G: GitOps>(repo: &G, remote: &str, auth: &Auth) -> Option<UrlRewrite> {
    let url = repo.remote_url(remote).ok()?;
    let authenticated = auth.authenticate(&url)?;
    tracing::debug!(remote, "using token authentication");
    Some(UrlRewrite::new(url, authenticated))
}

/// Fail with `RemoteNotFound` unless `remote` is configured.
pub(crate) fn require_remote<G: GitOps>(repo: &G, remote: &str) -> gitmgr_core::Result<()> {
    if repo.remote_exists(remote) {
        Ok(())
    } else {
        Err(Error::RemoteNotFound(remote.to_string()))
    }
}

/// Commit counts and changed files between two commits on one line of history.
pub(crate) fn history_delta<G: GitOps>(
    repo: &G,
    before: gitmgr_git::Oid,
    after: gitmgr_git::Oid,
) -> (usize, Vec<String>) {
    if before == after {
        return (0, Vec::new());
    }

    let commits = repo.count_commits_between(before, after).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "could not count new commits");
        1
    });
    let files = repo.changed_files(before, after).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "could not diff old and new HEAD");
        Vec::new()
    });
    (commits, files)
}
