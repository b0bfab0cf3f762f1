//! # gitmgr-git
//!
//! Git operations abstraction layer for gitmgr, built on git2-rs.
//! Local repository state (branches, status, diffs, commit graph) is read
//! through libgit2; commits, network operations, merges and rebases run the
//! `git` binary so that hooks, credential helpers and user config apply.

mod command;
mod error;
mod remote;
mod repository;
mod status;
mod traits;

pub use command::{PushFlags, UrlRewrite};
pub use error::{Error, Result};
pub use git2::Oid;
pub use repository::Repository;
pub use status::{CommitStats, WorkingTreeStatus};
pub use traits::GitOps;
