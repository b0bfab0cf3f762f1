//! Branch descriptions and automatic branch naming.

use std::fmt;

use crate::branch_name::BranchName;
use crate::error::{Error, Result};

/// A lowercase slug: alphanumeric runs joined by single hyphens.
///
/// Matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    /// Validate a description.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDescription`] unless `text` is a slug.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if is_slug(&text) {
            Ok(Self(text))
        } else {
            Err(Error::InvalidDescription(text))
        }
    }

    /// Get the description as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_slug(text: &str) -> bool {
    !text.is_empty()
        && text.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// How the name of a new branch is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchNaming {
    /// Use this name as given.
    Explicit(BranchName),
    /// Derive the name from an issue number and/or a description.
    Auto {
        issue: Option<u64>,
        description: Option<Description>,
    },
}

impl BranchNaming {
    /// Pick the naming policy from tool parameters.
    ///
    /// An explicit name always wins; the auto fields are then ignored.
    ///
    /// # Errors
    /// Returns a validation error for a bad name or description, or
    /// [`Error::MissingParameter`] when nothing to name the branch from is given.
    pub fn from_params(
        branch_name: Option<&str>,
        issue: Option<u64>,
        description: Option<&str>,
    ) -> Result<Self> {
        if let Some(name) = branch_name {
            return Ok(Self::Explicit(BranchName::new(name)?));
        }

        let description = description.map(Description::new).transpose()?;
        if issue.is_none() && description.is_none() {
            return Err(Error::MissingParameter(
                "Provide branch_name OR issue_number/description for auto-naming".into(),
            ));
        }

        Ok(Self::Auto { issue, description })
    }

    /// Whether the name was derived rather than given.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto { .. })
    }

    /// The resulting branch name.
    ///
    /// `issue-{n}-{desc}`, `issue-{n}` or `feature-{desc}` for automatic names.
    ///
    /// # Errors
    /// Only fails if the composed name is not a valid branch name, which a
    /// slug and a number cannot produce.
    pub fn branch_name(&self) -> Result<BranchName> {
        match self {
            Self::Explicit(name) => Ok(name.clone()),
            Self::Auto { issue, description } => {
                let name = match (issue, description) {
                    (Some(n), Some(desc)) => format!("issue-{n}-{desc}"),
                    (Some(n), None) => format!("issue-{n}"),
                    (None, Some(desc)) => format!("feature-{desc}"),
                    (None, None) => {
                        return Err(Error::MissingParameter(
                            "Provide branch_name OR issue_number/description for auto-naming"
                                .into(),
                        ));
                    }
                };
                BranchName::new(name)
            }
        }
    }
}
