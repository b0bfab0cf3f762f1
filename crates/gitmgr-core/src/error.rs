//! Error types for gitmgr-core.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitmgr-core and the tool operations built on it.
///
/// Every message ends with the step the caller can take next.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No repository discoverable from the given directory.
    #[error("Not a git repository: {}\nPlease run this tool from within a git repository.", path.display())]
    NotARepository {
        /// Directory the search started from.
        path: PathBuf,
    },

    /// Invalid branch name.
    #[error("Invalid branch name '{name}': {reason}")]
    InvalidBranchName {
        /// The invalid name.
        name: String,
        /// Why the name is invalid.
        reason: String,
    },

    /// Description is not a lowercase slug.
    #[error("Description must be lowercase with hyphens (e.g. 'add-feature'). Got: {0}")]
    InvalidDescription(String),

    /// Commit type outside the conventional-commit set.
    #[error("Invalid commit type: {given}. Valid types: {valid}")]
    InvalidCommitType {
        /// The rejected type.
        given: String,
        /// Comma separated list of accepted types.
        valid: String,
    },

    /// Commit message empty after trimming.
    #[error("Commit message cannot be empty")]
    EmptyMessage,

    /// Sync strategy other than merge or rebase.
    #[error("Invalid strategy '{0}'. Must be 'merge' or 'rebase'.")]
    InvalidStrategy(String),

    /// A required parameter (or parameter combination) is missing.
    #[error("{0}")]
    MissingParameter(String),

    /// Tool arguments could not be decoded.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Branch name already taken.
    #[error("Branch '{0}' already exists")]
    BranchExists(String),

    /// Local branch missing.
    #[error("Branch '{0}' does not exist")]
    BranchNotFound(String),

    /// Path given to commit is not in the working tree.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Remote not configured.
    #[error("Remote '{0}' not found. Use 'git remote add' first.")]
    RemoteNotFound(String),

    /// Branch missing on the remote.
    #[error("Branch '{branch}' does not exist on remote '{remote}'.")]
    RemoteBranchNotFound {
        /// Requested branch.
        branch: String,
        /// Remote that was asked.
        remote: String,
    },

    /// Remote URL does not point at a repository.
    #[error("Remote '{0}' is not a valid git repository.")]
    InvalidRemote(String),

    /// Working tree has uncommitted changes.
    #[error("Cannot {0} with uncommitted changes. Commit or stash changes first.")]
    DirtyWorkingTree(&'static str),

    /// HEAD is detached.
    #[error("Cannot operate in detached HEAD state. Checkout a branch first.")]
    DetachedHead,

    /// Already on the branch the operation would bring in.
    #[error("Already on '{0}' branch. Use git_pull() instead, or checkout a feature branch first.")]
    AlreadyOnBranch(String),

    /// Remote rejected the credentials.
    #[error(
        "Authentication failed. Ensure GITHUB_TOKEN is set in environment, or configure git credentials."
    )]
    AuthenticationFailed,

    /// Merge or rebase stopped on conflicts.
    #[error("{operation} conflict detected. Resolve conflicts manually, then stage and commit the resolution.")]
    Conflict {
        /// `Merge` or `Rebase`.
        operation: &'static str,
    },

    /// Push rejected because the remote moved on.
    #[error(
        "Push rejected: Remote has changes not in local branch. Pull first with 'git_pull()', or use force=true (caution!)."
    )]
    NonFastForward,

    /// Nothing staged or changed.
    #[error("No changes to commit")]
    NothingToCommit,

    /// A git command failed for a reason not covered above.
    #[error("{operation} failed: {source}")]
    CommandFailed {
        /// What was being attempted, e.g. `Push`.
        operation: String,
        /// The underlying git failure.
        source: gitmgr_git::Error,
    },

    /// Fetching from a remote failed.
    #[error("Failed to fetch from {remote}: {source}")]
    FetchFailed {
        remote: String,
        source: gitmgr_git::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Git operation error.
    #[error("git error: {0}")]
    Git(#[from] gitmgr_git::Error),
}

impl Error {
    /// Wrap a git failure with the operation it interrupted.
    #[must_use]
    pub fn command_failed(operation: impl Into<String>, source: gitmgr_git::Error) -> Self {
        Self::CommandFailed {
            operation: operation.into(),
            source,
        }
    }

    /// Invalid input, a missing or existing object, or a state precondition.
    ///
    /// These are the failures the caller fixes by changing the request or the
    /// repository state, not by retrying.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidBranchName { .. }
                | Self::InvalidDescription(_)
                | Self::InvalidCommitType { .. }
                | Self::EmptyMessage
                | Self::InvalidStrategy(_)
                | Self::MissingParameter(_)
                | Self::InvalidArguments(_)
                | Self::BranchExists(_)
                | Self::BranchNotFound(_)
                | Self::FileNotFound(_)
                | Self::RemoteBranchNotFound { .. }
                | Self::InvalidRemote(_)
                | Self::DirtyWorkingTree(_)
                | Self::AlreadyOnBranch(_)
        )
    }
}

/// Lift the typed git failures into their core counterparts.
///
/// Untyped failures stay wrapped in [`Error::Git`].
#[must_use]
pub fn from_git(err: gitmgr_git::Error) -> Error {
    match err {
        gitmgr_git::Error::NotARepository { path } => Error::NotARepository { path },
        gitmgr_git::Error::DetachedHead => Error::DetachedHead,
        gitmgr_git::Error::BranchNotFound(name) => Error::BranchNotFound(name),
        gitmgr_git::Error::RemoteNotFound(name) => Error::RemoteNotFound(name),
        other => Error::Git(other),
    }
}
