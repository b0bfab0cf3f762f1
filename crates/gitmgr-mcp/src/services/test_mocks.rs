//! Mock implementation of `GitOps` for testing services.
//!
//! The mock keeps repository state in memory and records every mutating or
//! networked call as a short string (e.g. `push -u origin main`) so tests can
//! assert on precondition ordering. A failure registered with
//! [`MockGitOps::with_failure`] makes the named operation return a
//! `CommandFailed` error carrying the given output.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use gitmgr_git::{
    CommitStats, Error as GitError, GitOps, Oid, PushFlags, Result as GitResult, UrlRewrite,
    WorkingTreeStatus,
};

/// Deterministic object id filled with `n`.
#[allow(clippy::unwrap_used)]
pub fn oid(n: u8) -> Oid {
    Oid::from_bytes(&[n; 20]).unwrap()
}

/// Mock implementation of `GitOps` for testing.
pub struct MockGitOps {
    pub current_branch: RefCell<String>,
    pub detached: bool,
    pub head: RefCell<Oid>,
    pub head_after_update: Option<Oid>,
    pub branches: RefCell<HashMap<String, Oid>>,
    pub upstreams: HashMap<String, String>,
    pub refs: HashMap<String, Oid>,
    pub counts: HashMap<(Oid, Oid), usize>,
    pub tree: WorkingTreeStatus,
    pub staged: bool,
    pub remotes: HashMap<String, String>,
    pub remote_branches: HashSet<(String, String)>,
    pub changed_files: Vec<String>,
    pub commit: (Oid, CommitStats),
    pub failures: HashMap<String, String>,
    pub workdir: Option<PathBuf>,
    pub calls: RefCell<Vec<String>>,
}

impl Default for MockGitOps {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl MockGitOps {
    pub fn new() -> Self {
        Self {
            current_branch: RefCell::new("main".to_string()),
            detached: false,
            head: RefCell::new(Oid::zero()),
            head_after_update: None,
            branches: RefCell::new(HashMap::new()),
            upstreams: HashMap::new(),
            refs: HashMap::new(),
            counts: HashMap::new(),
            tree: WorkingTreeStatus::default(),
            staged: false,
            remotes: HashMap::new(),
            remote_branches: HashSet::new(),
            changed_files: Vec::new(),
            commit: (Oid::zero(), CommitStats::default()),
            failures: HashMap::new(),
            workdir: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_current_branch(self, name: &str) -> Self {
        *self.current_branch.borrow_mut() = name.to_string();
        self
    }

    pub fn with_detached_head(mut self) -> Self {
        self.detached = true;
        self
    }

    pub fn with_head(self, oid: Oid) -> Self {
        *self.head.borrow_mut() = oid;
        self
    }

    /// HEAD after a successful pull, merge or rebase.
    pub fn with_head_after_update(mut self, oid: Oid) -> Self {
        self.head_after_update = Some(oid);
        self
    }

    pub fn with_branch(self, name: &str, oid: Oid) -> Self {
        self.branches.borrow_mut().insert(name.to_string(), oid);
        self
    }

    pub fn with_upstream(mut self, branch: &str, upstream: &str) -> Self {
        self.upstreams
            .insert(branch.to_string(), upstream.to_string());
        self
    }

    pub fn with_ref(mut self, spec: &str, oid: Oid) -> Self {
        self.refs.insert(spec.to_string(), oid);
        self
    }

    pub fn with_count(mut self, from: Oid, to: Oid, count: usize) -> Self {
        self.counts.insert((from, to), count);
        self
    }

    pub fn with_tree(mut self, tree: WorkingTreeStatus) -> Self {
        self.tree = tree;
        self
    }

    pub fn with_staged_changes(mut self, staged: bool) -> Self {
        self.staged = staged;
        self
    }

    pub fn with_commit(mut self, oid: Oid, stats: CommitStats) -> Self {
        self.commit = (oid, stats);
        self
    }

    pub fn with_workdir(mut self, path: &Path) -> Self {
        self.workdir = Some(path.to_path_buf());
        self
    }

    pub fn with_remote(mut self, name: &str, url: &str) -> Self {
        self.remotes.insert(name.to_string(), url.to_string());
        self
    }

    pub fn with_remote_branch(mut self, remote: &str, branch: &str) -> Self {
        self.remote_branches
            .insert((remote.to_string(), branch.to_string()));
        self
    }

    pub fn with_changed_files(mut self, files: &[&str]) -> Self {
        self.changed_files = files.iter().map(ToString::to_string).collect();
        self
    }

    /// Make `op` (`pull`, `push`, `merge`, ...) fail with `output`.
    pub fn with_failure(mut self, op: &str, output: &str) -> Self {
        self.failures.insert(op.to_string(), output.to_string());
        self
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, op: &str, call: String) -> GitResult<()> {
        self.calls.borrow_mut().push(call.clone());
        match self.failures.get(op) {
            Some(output) => Err(GitError::CommandFailed {
                command: call,
                output: output.clone(),
            }),
            None => Ok(()),
        }
    }

    fn networked(call: String, rewrite: Option<&UrlRewrite>) -> String {
        if rewrite.is_some() {
            format!("{call} [auth]")
        } else {
            call
        }
    }

    fn advance_head(&self) {
        if let Some(oid) = self.head_after_update {
            *self.head.borrow_mut() = oid;
        }
    }
}

impl GitOps for MockGitOps {
    fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    fn current_branch(&self) -> GitResult<String> {
        if self.detached {
            return Err(GitError::DetachedHead);
        }
        Ok(self.current_branch.borrow().clone())
    }

    fn head_detached(&self) -> GitResult<bool> {
        Ok(self.detached)
    }

    fn head_commit(&self) -> GitResult<Oid> {
        Ok(*self.head.borrow())
    }

    fn branch_exists(&self, name: &str) -> bool {
        self.branches.borrow().contains_key(name)
    }

    fn create_branch(&self, name: &str) -> GitResult<Oid> {
        self.record("create_branch", format!("create_branch {name}"))?;
        let oid = *self.head.borrow();
        self.branches.borrow_mut().insert(name.to_string(), oid);
        Ok(oid)
    }

    fn checkout(&self, branch: &str) -> GitResult<()> {
        self.record("checkout", format!("checkout {branch}"))?;
        *self.current_branch.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn detect_default_branch(&self) -> Option<String> {
        ["main", "master"]
            .into_iter()
            .find(|name| self.branch_exists(name))
            .map(String::from)
    }

    fn upstream_branch(&self, branch: &str) -> GitResult<Option<String>> {
        Ok(self.upstreams.get(branch).cloned())
    }

    fn resolve_commit(&self, spec: &str) -> GitResult<Oid> {
        self.refs
            .get(spec)
            .copied()
            .or_else(|| self.branches.borrow().get(spec).copied())
            .ok_or_else(|| GitError::RefNotFound(spec.to_string()))
    }

    fn count_commits_between(&self, from: Oid, to: Oid) -> GitResult<usize> {
        Ok(self.counts.get(&(from, to)).copied().unwrap_or(0))
    }

    fn changed_files(&self, _from: Oid, _to: Oid) -> GitResult<Vec<String>> {
        Ok(self.changed_files.clone())
    }

    fn working_tree_status(&self) -> GitResult<WorkingTreeStatus> {
        Ok(self.tree.clone())
    }

    fn is_clean(&self) -> GitResult<bool> {
        Ok(self.tree.is_clean())
    }

    fn stage_all(&self) -> GitResult<()> {
        self.record("stage", "stage_all".to_string())
    }

    fn stage_paths(&self, paths: &[String]) -> GitResult<()> {
        self.record("stage", format!("stage {}", paths.join(" ")))
    }

    fn has_staged_changes(&self) -> GitResult<bool> {
        Ok(self.staged)
    }

    fn create_commit(&self, _message: &str, skip_hooks: bool) -> GitResult<Oid> {
        let call = if skip_hooks {
            "commit --no-verify"
        } else {
            "commit"
        };
        self.record("commit", call.to_string())?;
        *self.head.borrow_mut() = self.commit.0;
        Ok(self.commit.0)
    }

    fn commit_stats(&self, _commit: Oid) -> GitResult<CommitStats> {
        Ok(self.commit.1)
    }

    fn remote_exists(&self, name: &str) -> bool {
        self.remotes.contains_key(name)
    }

    fn has_remotes(&self) -> GitResult<bool> {
        Ok(!self.remotes.is_empty())
    }

    fn remote_url(&self, name: &str) -> GitResult<String> {
        self.remotes
            .get(name)
            .cloned()
            .ok_or_else(|| GitError::RemoteNotFound(name.to_string()))
    }

    fn remote_branch_exists(&self, remote: &str, branch: &str) -> bool {
        self.remote_branches
            .contains(&(remote.to_string(), branch.to_string()))
    }

    fn fetch(&self, remote: &str, branch: &str, rewrite: Option<&UrlRewrite>) -> GitResult<()> {
        self.record(
            "fetch",
            Self::networked(format!("fetch {remote} {branch}"), rewrite),
        )
    }

    fn pull(&self, remote: &str, branch: &str, rewrite: Option<&UrlRewrite>) -> GitResult<()> {
        self.record(
            "pull",
            Self::networked(format!("pull {remote} {branch}"), rewrite),
        )?;
        self.advance_head();
        Ok(())
    }

    fn push(
        &self,
        remote: &str,
        branch: &str,
        flags: PushFlags,
        rewrite: Option<&UrlRewrite>,
    ) -> GitResult<()> {
        let mut call = String::from("push");
        if flags.set_upstream {
            call.push_str(" -u");
        }
        if flags.force {
            call.push_str(" --force");
        }
        call.push_str(&format!(" {remote} {branch}"));
        self.record("push", Self::networked(call, rewrite))
    }

    fn merge(&self, target: &str) -> GitResult<()> {
        self.record("merge", format!("merge {target}"))?;
        self.advance_head();
        Ok(())
    }

    fn rebase(&self, target: &str) -> GitResult<()> {
        self.record("rebase", format!("rebase {target}"))?;
        self.advance_head();
        Ok(())
    }

    fn merge_abort(&self) -> GitResult<()> {
        self.record("merge_abort", "merge --abort".to_string())
    }

    fn rebase_abort(&self) -> GitResult<()> {
        self.record("rebase_abort", "rebase --abort".to_string())
    }
}
