//! Error types for gitmgr-git.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No repository found at or above the given directory.
    #[error("not a git repository: {}", path.display())]
    NotARepository {
        /// Directory the search started from.
        path: PathBuf,
    },

    /// Repository has no working directory.
    #[error("repository is bare - a working tree is required")]
    BareRepository,

    /// Branch not found.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Reference not found.
    #[error("reference not found: {0}")]
    RefNotFound(String),

    /// HEAD is detached (not on a branch).
    #[error("HEAD is detached - checkout a branch first")]
    DetachedHead,

    /// Remote not found.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// A `git` subprocess exited unsuccessfully.
    #[error("`git {command}` failed: {output}")]
    CommandFailed {
        /// Arguments passed to git, space separated.
        command: String,
        /// Combined stderr and stdout of the process.
        output: String,
    },

    /// Underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error (e.g. spawning the git binary).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Output of a failed git subprocess, if this is one.
    #[must_use]
    pub fn command_output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

// Interpretation of subprocess output. Only `CommandFailed` carries output,
// so every predicate is false for the typed variants.
impl Error {
    fn output_contains_any(&self, needles: &[&str]) -> bool {
        self.command_output().is_some_and(|output| {
            let output = output.to_lowercase();
            needles.iter().any(|needle| output.contains(needle))
        })
    }

    /// The remote rejected our credentials.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        self.output_contains_any(&["authentication failed", "permission denied"])
    }

    /// A push was rejected because the remote has commits we don't.
    #[must_use]
    pub fn is_non_fast_forward(&self) -> bool {
        self.output_contains_any(&["rejected"]) && self.output_contains_any(&["non-fast-forward"])
    }

    /// The output mentions a conflict or an unfinished merge.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.output_contains_any(&["conflict", "merge"])
    }

    /// The remote URL does not point at a repository.
    #[must_use]
    pub fn is_invalid_remote(&self) -> bool {
        self.output_contains_any(&["does not appear to be a git repository"])
    }

    /// The requested ref does not exist on the remote.
    #[must_use]
    pub fn is_missing_remote_ref(&self) -> bool {
        self.output_contains_any(&["couldn't find remote ref"])
    }
}
