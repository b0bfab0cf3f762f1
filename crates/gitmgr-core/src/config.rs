//! Configuration management for gitmgr.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commit::DEFAULT_FOOTER;
use crate::error::Result;

/// File name looked up in the repository root when no path is given.
pub const CONFIG_FILE_NAME: &str = ".gitmgr.toml";

/// gitmgr configuration loaded from `.gitmgr.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Commit message settings.
    #[serde(default)]
    pub commit: CommitConfig,

    /// GitHub-specific settings.
    #[serde(default)]
    pub github: GitHubConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Remote used when a tool call names none.
    #[serde(default = "default_remote")]
    pub default_remote: String,

    /// Branch `git_sync_with_main` syncs from when none is given.
    #[serde(default = "default_main_branch")]
    pub main_branch: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_remote: default_remote(),
            main_branch: default_main_branch(),
        }
    }
}

fn default_remote() -> String {
    "origin".into()
}

fn default_main_branch() -> String {
    "main".into()
}

/// Commit message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitConfig {
    /// Append the attribution footer.
    #[serde(default = "default_attribution")]
    pub attribution: bool,

    /// Replaces the built-in footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl CommitConfig {
    /// Footer to append, if any.
    #[must_use]
    pub fn footer_text(&self) -> Option<&str> {
        if !self.attribution {
            return None;
        }
        Some(self.footer.as_deref().unwrap_or(DEFAULT_FOOTER))
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            attribution: default_attribution(),
            footer: None,
        }
    }
}

const fn default_attribution() -> bool {
    true
}

/// GitHub-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
        }
    }
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
