//! Operations that shell out to the `git` binary.
//!
//! Commits go through git so hooks run; fetch, pull and push so the user's
//! credential helpers and transport config apply; merge and rebase because
//! libgit2 has no porcelain for them.

use std::fmt;
use std::path::Path;
use std::process::Command;

use git2::Oid;

use crate::Repository;
use crate::error::{Error, Result};

/// Substitutes an authenticated URL for a remote's URL for one command.
///
/// Applied as `-c url.<authenticated>.insteadOf=<original>`, so the remote
/// name, remote-tracking refs and upstream config stay untouched and the
/// credential never reaches `.git/config`.
#[derive(Clone, PartialEq, Eq)]
pub struct UrlRewrite {
    original: String,
    authenticated: String,
}

impl UrlRewrite {
    /// Rewrite `original` to `authenticated`.
    #[must_use]
    pub fn new(original: impl Into<String>, authenticated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            authenticated: authenticated.into(),
        }
    }

    /// The URL as configured on the remote.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    fn config_arg(&self) -> String {
        format!("url.{}.insteadOf={}", self.authenticated, self.original)
    }

    /// Replace the authenticated URL in command output with the original.
    fn scrub(&self, text: &str) -> String {
        text.replace(&self.authenticated, &self.original)
    }
}

impl fmt::Debug for UrlRewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlRewrite")
            .field("original", &self.original)
            .field("authenticated", &"[REDACTED]")
            .finish()
    }
}

/// Flags for [`Repository::push`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushFlags {
    /// Pass `-u` to record the upstream.
    pub set_upstream: bool,
    /// Pass `--force`.
    pub force: bool,
}

/// Run git in `workdir`, returning stdout on success.
fn run_git(workdir: &Path, rewrite: Option<&UrlRewrite>, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.current_dir(workdir).env("GIT_TERMINAL_PROMPT", "0");
    if let Some(rewrite) = rewrite {
        cmd.arg("-c").arg(rewrite.config_arg());
    }
    cmd.args(args);

    tracing::debug!(args = ?args, authenticated = rewrite.is_some(), "running git");
    let output = cmd.output()?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = [stderr.trim(), stdout.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let combined = match rewrite {
        Some(rewrite) => rewrite.scrub(&combined),
        None => combined,
    };

    Err(Error::CommandFailed {
        command: args.join(" "),
        output: combined,
    })
}

impl Repository {
    fn git(&self, rewrite: Option<&UrlRewrite>, args: &[&str]) -> Result<String> {
        run_git(self.require_workdir()?, rewrite, args)
    }

    /// Commit the index with `message`, returning the new HEAD.
    ///
    /// # Errors
    /// Returns `CommandFailed` if git refuses (hooks, nothing to commit, no identity).
    pub fn create_commit(&self, message: &str, skip_hooks: bool) -> Result<Oid> {
        let mut args = vec!["commit", "-m", message];
        if skip_hooks {
            args.push("--no-verify");
        }
        self.git(None, &args)?;
        self.head_commit()
    }

    /// Fetch a single branch from a remote.
    ///
    /// # Errors
    /// Returns `CommandFailed` if the fetch fails.
    pub fn fetch(&self, remote: &str, branch: &str, rewrite: Option<&UrlRewrite>) -> Result<()> {
        self.git(rewrite, &["fetch", remote, branch])?;
        Ok(())
    }

    /// Pull a branch with a merge (never a rebase), without opening an editor.
    ///
    /// # Errors
    /// Returns `CommandFailed` if the pull fails or conflicts.
    pub fn pull(&self, remote: &str, branch: &str, rewrite: Option<&UrlRewrite>) -> Result<()> {
        self.git(rewrite, &["pull", remote, branch, "--no-rebase", "--no-edit"])?;
        Ok(())
    }

    /// Push a branch to a remote.
    ///
    /// # Errors
    /// Returns `CommandFailed` if the push is rejected or fails.
    pub fn push(
        &self,
        remote: &str,
        branch: &str,
        flags: PushFlags,
        rewrite: Option<&UrlRewrite>,
    ) -> Result<()> {
        let mut args = vec!["push"];
        if flags.set_upstream {
            args.push("-u");
        }
        if flags.force {
            args.push("--force");
        }
        args.extend([remote, branch]);
        self.git(rewrite, &args)?;
        Ok(())
    }

    /// Merge `target` into the current branch.
    ///
    /// # Errors
    /// Returns `CommandFailed` if the merge conflicts or fails.
    pub fn merge(&self, target: &str) -> Result<()> {
        self.git(None, &["merge", target, "--no-edit"])?;
        Ok(())
    }

    /// Rebase the current branch onto `target`.
    ///
    /// # Errors
    /// Returns `CommandFailed` if the rebase conflicts or fails.
    pub fn rebase(&self, target: &str) -> Result<()> {
        self.git(None, &["rebase", target])?;
        Ok(())
    }

    /// Abort an in-progress merge.
    ///
    /// # Errors
    /// Returns `CommandFailed` if there is no merge to abort.
    pub fn merge_abort(&self) -> Result<()> {
        self.git(None, &["merge", "--abort"])?;
        Ok(())
    }

    /// Abort an in-progress rebase.
    ///
    /// # Errors
    /// Returns `CommandFailed` if there is no rebase to abort.
    pub fn rebase_abort(&self) -> Result<()> {
        self.git(None, &["rebase", "--abort"])?;
        Ok(())
    }
}
