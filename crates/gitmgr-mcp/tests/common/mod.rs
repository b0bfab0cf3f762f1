//! Scratch repositories for integration tests.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run git in `dir`, panicking with its output on failure. Returns stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "core.editor", "true"]);
}

/// A repository on `main` with one commit containing `README.md`.
pub fn setup_git_repo() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    git(temp.path(), &["init"]);
    configure_identity(temp.path());

    fs::write(temp.path().join("README.md"), "# Test Repo\n").unwrap();
    git(temp.path(), &["add", "."]);
    git(temp.path(), &["commit", "-m", "Initial commit"]);
    git(temp.path(), &["branch", "-M", "main"]);
    temp
}

/// A repository whose `main` tracks `origin/main` on a local bare remote.
///
/// Returns `(work, remote)`.
pub fn setup_with_remote() -> (TempDir, TempDir) {
    let work = setup_git_repo();
    let remote = TempDir::new().expect("Failed to create temp dir");
    git(remote.path(), &["init", "--bare"]);
    git(remote.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);

    let url = remote.path().to_str().unwrap();
    git(work.path(), &["remote", "add", "origin", url]);
    git(work.path(), &["push", "-u", "origin", "main"]);
    (work, remote)
}

/// A second clone of `remote`, for moving the remote forward.
pub fn clone_remote(remote: &TempDir) -> TempDir {
    let clone = TempDir::new().expect("Failed to create temp dir");
    let url = remote.path().to_str().unwrap();
    git(clone.path(), &["clone", url, "."]);
    configure_identity(clone.path());
    clone
}

/// Write `content` to `file` and commit it.
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) {
    fs::write(dir.join(file), content).unwrap();
    git(dir, &["add", file]);
    git(dir, &["commit", "-m", message]);
}

pub fn head_sha(dir: &Path) -> String {
    git(dir, &["rev-parse", "HEAD"])
}

pub fn current_branch(dir: &Path) -> String {
    git(dir, &["rev-parse", "--abbrev-ref", "HEAD"])
}
