//! Branch name validation and newtype.
//!
//! Provides a [`BranchName`] type that rejects names git would refuse or
//! misinterpret as revision syntax.

use std::fmt;

use crate::error::Error;

/// Characters git reserves for revision and pathspec syntax.
const FORBIDDEN: [char; 8] = ['~', '^', ':', '?', '*', '[', ']', '\\'];

/// A validated git branch name.
///
/// # Examples
///
/// ```
/// use gitmgr_core::BranchName;
///
/// // Valid branch names
/// let name = BranchName::new("feature/auth").unwrap();
/// let name = BranchName::new("fix-bug-123").unwrap();
///
/// // Invalid branch names
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("HEAD~1").is_err());
/// assert!(BranchName::new("branch..name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBranchName`] if the name is blank, contains
    /// whitespace, one of `~ ^ : ? * [ ] \`, or `..`.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        validate_branch_name(&name)?;
        Ok(Self(name))
    }

    /// Get the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the `BranchName` and return the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for BranchName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for BranchName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BranchName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> Error {
    Error::InvalidBranchName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a branch name against the characters git rejects.
fn validate_branch_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(invalid(name, "branch name cannot be empty"));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(invalid(name, "branch name cannot contain whitespace"));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(invalid(
            name,
            format!("cannot contain '{c}' (forbidden: ~, ^, :, ?, *, [, ], \\, ..)"),
        ));
    }

    if name.contains("..") {
        return Err(invalid(name, "branch name cannot contain '..'"));
    }

    Ok(())
}
