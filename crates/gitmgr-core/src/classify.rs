//! Structured classification of failures.
//!
//! [`classify`] turns any [`Error`] into a [`StructuredError`]: a fixed
//! category, a message, a suggestion and, for everything but invalid input,
//! a git command that helps diagnose the problem.
//!
//! Typed variants map directly. Git commands that failed for reasons the
//! git layer can't type are classified by keywords in their output, checked
//! in a fixed order because one message can contain several keywords:
//!
//! 1. `authentication failed` / `permission denied`
//! 2. `conflict` / `merge`
//! 3. `detached head`
//! 4. `nothing to commit`
//! 5. `no configured push destination` / `no upstream branch`
//!
//! Anything else is a generic command failure.

use serde::Serialize;

use crate::error::Error;

/// Category of a [`StructuredError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    NotARepo,
    AuthFailed,
    MergeConflict,
    DetachedHead,
    NothingToCommit,
    NoRemote,
    GitCommandFailed,
    ValidationError,
    UnknownError,
}

impl ErrorType {
    /// Wire name, e.g. `not_a_repo`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotARepo => "not_a_repo",
            Self::AuthFailed => "auth_failed",
            Self::MergeConflict => "merge_conflict",
            Self::DetachedHead => "detached_head",
            Self::NothingToCommit => "nothing_to_commit",
            Self::NoRemote => "no_remote",
            Self::GitCommandFailed => "git_command_failed",
            Self::ValidationError => "validation_error",
            Self::UnknownError => "unknown_error",
        }
    }
}

/// A failure with an actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredError {
    pub error_type: ErrorType,
    pub message: String,
    pub suggestion: String,
    pub command: Option<String>,
}

impl StructuredError {
    fn new(
        error_type: ErrorType,
        message: impl Into<String>,
        suggestion: &str,
        command: Option<&str>,
    ) -> Self {
        Self {
            error_type,
            message: message.into(),
            suggestion: suggestion.to_string(),
            command: command.map(String::from),
        }
    }

    fn not_a_repo(message: String) -> Self {
        Self::new(
            ErrorType::NotARepo,
            message,
            "Navigate to a git repository before running git commands.",
            Some("git status"),
        )
    }

    fn auth_failed() -> Self {
        Self::new(
            ErrorType::AuthFailed,
            "Git authentication failed",
            "Check your git credentials. For HTTPS, verify your personal access token. \
             For SSH, ensure your SSH key is configured correctly.",
            Some("git config --list | grep credential"),
        )
    }

    fn merge_conflict() -> Self {
        Self::new(
            ErrorType::MergeConflict,
            "Merge conflict detected",
            "Resolve merge conflicts in affected files, then stage and commit the resolution.",
            Some("git status"),
        )
    }

    fn detached_head() -> Self {
        Self::new(
            ErrorType::DetachedHead,
            "Repository is in detached HEAD state",
            "Create a new branch or checkout an existing branch to continue.",
            Some("git checkout -b new-branch-name"),
        )
    }

    fn nothing_to_commit() -> Self {
        Self::new(
            ErrorType::NothingToCommit,
            "No changes to commit",
            "Make changes to files before committing, or use 'git status' to see current state.",
            Some("git status"),
        )
    }

    fn no_remote() -> Self {
        Self::new(
            ErrorType::NoRemote,
            "No remote repository configured",
            "Set up a remote repository or specify the remote branch when pushing. \
             Use 'git remote add origin <url>' to add a remote.",
            Some("git remote -v"),
        )
    }

    fn command_failed(detail: &str) -> Self {
        Self::new(
            ErrorType::GitCommandFailed,
            format!("Git command failed: {detail}"),
            "Check the error message above for details. Run 'git status' to see repository state.",
            Some("git status"),
        )
    }

    fn validation(message: String) -> Self {
        Self::new(
            ErrorType::ValidationError,
            message,
            "Check the error message and verify your input parameters.",
            None,
        )
    }

    fn unknown(detail: &str) -> Self {
        Self::new(
            ErrorType::UnknownError,
            format!("Unexpected error: {detail}"),
            "Check the error message above. If the issue persists, please report it.",
            Some("git status"),
        )
    }
}

/// Classify an error. Total: every input yields a structured error.
#[must_use]
pub fn classify(err: &Error) -> StructuredError {
    use gitmgr_git::Error as GitError;

    let structured = match err {
        Error::NotARepository { .. } | Error::Git(GitError::NotARepository { .. }) => {
            StructuredError::not_a_repo(err.to_string())
        }
        Error::AuthenticationFailed => StructuredError::auth_failed(),
        Error::Conflict { .. } => StructuredError::merge_conflict(),
        Error::DetachedHead | Error::Git(GitError::DetachedHead) => {
            StructuredError::detached_head()
        }
        Error::NothingToCommit => StructuredError::nothing_to_commit(),
        Error::RemoteNotFound(_) | Error::Git(GitError::RemoteNotFound(_)) => {
            StructuredError::no_remote()
        }
        Error::NonFastForward => StructuredError::command_failed(&err.to_string()),
        Error::CommandFailed { source, .. } | Error::FetchFailed { source, .. } => {
            let source_text = source.to_string();
            let output = source.command_output().unwrap_or(&source_text);
            classify_command_output(output, &err.to_string())
        }
        Error::Git(source @ (GitError::CommandFailed { .. } | GitError::Git2(_))) => {
            let detail = err.to_string();
            let output = source.command_output().unwrap_or(&detail);
            classify_command_output(output, &detail)
        }
        Error::Git(
            GitError::BranchNotFound(_) | GitError::RefNotFound(_) | GitError::BareRepository,
        ) => StructuredError::validation(err.to_string()),
        _ if err.is_validation() => StructuredError::validation(err.to_string()),
        _ => StructuredError::unknown(&err.to_string()),
    };

    tracing::error!(
        error_type = structured.error_type.as_str(),
        error = %err,
        "git operation failed"
    );
    structured
}

/// Ordered keyword table for opaque command failures.
///
/// Keywords are matched against what git printed, never the command line,
/// which may carry a user-written commit message. `detail` is reported for
/// the generic case.
fn classify_command_output(output: &str, detail: &str) -> StructuredError {
    let lower = output.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("authentication failed") || has("permission denied") {
        StructuredError::auth_failed()
    } else if has("conflict") || has("merge") {
        StructuredError::merge_conflict()
    } else if has("detached head") {
        StructuredError::detached_head()
    } else if has("nothing to commit") {
        StructuredError::nothing_to_commit()
    } else if has("no configured push destination") || has("no upstream branch") {
        StructuredError::no_remote()
    } else {
        StructuredError::command_failed(detail)
    }
}
