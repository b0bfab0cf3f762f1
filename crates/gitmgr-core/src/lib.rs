//! # gitmgr-core
//!
//! Core library for gitmgr: input validation, conventional-commit
//! formatting, automatic branch naming, the error taxonomy and its
//! structured classification, configuration, and the repository handle
//! shared by the tool operations.

mod branch_name;
mod classify;
mod commit;
mod config;
mod context;
pub mod error;
mod naming;

pub use branch_name::BranchName;
pub use classify::{ErrorType, StructuredError, classify};
pub use commit::{CommitType, DEFAULT_FOOTER, build_message, validate_message};
pub use config::{CONFIG_FILE_NAME, CommitConfig, Config, GeneralConfig, GitHubConfig};
pub use context::RepoContext;
pub use error::{Error, Result};
pub use naming::{BranchNaming, Description};
