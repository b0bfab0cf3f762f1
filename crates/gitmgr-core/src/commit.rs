//! Conventional commit types and message formatting.

use std::fmt;
use std::str::FromStr;

use crate::config::CommitConfig;
use crate::error::{Error, Result};

/// Conventional commit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
    Revert,
    Merge,
}

impl CommitType {
    /// Every accepted type, in documentation order.
    pub const ALL: [Self; 12] = [
        Self::Feat,
        Self::Fix,
        Self::Docs,
        Self::Style,
        Self::Refactor,
        Self::Perf,
        Self::Test,
        Self::Build,
        Self::Ci,
        Self::Chore,
        Self::Revert,
        Self::Merge,
    ];

    /// The token used as the subject prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Test => "test",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Chore => "chore",
            Self::Revert => "revert",
            Self::Merge => "merge",
        }
    }

    fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for CommitType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidCommitType {
                given: s.to_string(),
                valid: Self::valid_list(),
            })
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Footer appended to commits when attribution is on and no override is set.
pub const DEFAULT_FOOTER: &str = "🤖 Generated with [Claude Code](https://claude.com/claude-code)\n\nCo-Authored-By: Claude <noreply@anthropic.com>";

/// Check a commit message is not blank.
///
/// # Errors
/// Returns [`Error::EmptyMessage`] if `message` is empty after trimming.
pub fn validate_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(Error::EmptyMessage);
    }
    Ok(())
}

/// Compose `"{type}: {message}"` followed by a blank line and the footer.
#[must_use]
pub fn build_message(commit_type: CommitType, message: &str, config: &CommitConfig) -> String {
    let subject = format!("{commit_type}: {message}");
    match config.footer_text() {
        Some(footer) => format!("{subject}\n\n{footer}"),
        None => subject,
    }
}
