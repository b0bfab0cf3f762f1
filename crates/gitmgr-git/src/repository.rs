//! Repository wrapper providing high-level git operations.

use std::path::Path;

use git2::{BranchType, ErrorCode, Oid};

use crate::error::{Error, Result};

/// High-level wrapper around a git repository.
pub struct Repository {
    inner: git2::Repository,
}

impl Repository {
    /// Discover the repository containing `path`, walking up to the root.
    ///
    /// # Errors
    /// Returns `NotARepository` naming `path` if no repository is found.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = git2::Repository::discover(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                Error::NotARepository {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Git2(e)
            }
        })?;
        Ok(Self { inner })
    }

    /// Get the path to the repository root (workdir).
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.inner.workdir()
    }

    /// Get the workdir or fail for bare repositories.
    ///
    /// # Errors
    /// Returns `BareRepository` if there is no working tree.
    pub fn require_workdir(&self) -> Result<&Path> {
        self.inner.workdir().ok_or(Error::BareRepository)
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    // === Branch operations ===

    /// Get the name of the current branch.
    ///
    /// On an unborn branch (no commits yet) the name is read from the
    /// symbolic HEAD.
    ///
    /// # Errors
    /// Returns error if HEAD is detached.
    pub fn current_branch(&self) -> Result<String> {
        if self.inner.head_detached()? {
            return Err(Error::DetachedHead);
        }

        match self.inner.head() {
            Ok(head) => head
                .shorthand()
                .map(String::from)
                .ok_or(Error::DetachedHead),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.inner.find_reference("HEAD")?;
                head.symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(String::from)
                    .ok_or(Error::DetachedHead)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if HEAD is detached.
    ///
    /// # Errors
    /// Returns error if HEAD cannot be read.
    pub fn head_detached(&self) -> Result<bool> {
        Ok(self.inner.head_detached()?)
    }

    /// Get the commit HEAD points at.
    ///
    /// # Errors
    /// Returns error if HEAD is unborn or doesn't resolve to a commit.
    pub fn head_commit(&self) -> Result<Oid> {
        Ok(self.inner.head()?.peel_to_commit()?.id())
    }

    /// Create a new branch at the current HEAD.
    ///
    /// # Errors
    /// Returns error if branch creation fails.
    pub fn create_branch(&self, name: &str) -> Result<Oid> {
        let head_commit = self.inner.head()?.peel_to_commit()?;
        let branch = self.inner.branch(name, &head_commit, false)?;

        branch
            .get()
            .target()
            .ok_or_else(|| Error::BranchNotFound(name.into()))
    }

    /// Checkout a branch.
    ///
    /// # Errors
    /// Returns error if checkout fails.
    pub fn checkout(&self, branch_name: &str) -> Result<()> {
        let branch = self
            .inner
            .find_branch(branch_name, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(branch_name.into()))?;

        let reference = branch.get();
        let object = reference.peel(git2::ObjectType::Commit)?;

        self.inner.checkout_tree(&object, None)?;
        self.inner.set_head(&format!("refs/heads/{branch_name}"))?;

        Ok(())
    }

    /// Check if a branch exists.
    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        self.inner.find_branch(name, BranchType::Local).is_ok()
    }

    /// Detect the primary branch: `main` if it exists, else `master`.
    ///
    /// Returns `None` if neither exists.
    #[must_use]
    pub fn detect_default_branch(&self) -> Option<String> {
        ["main", "master"]
            .into_iter()
            .find(|name| self.branch_exists(name))
            .map(String::from)
    }

    /// Short name of the upstream of a local branch (e.g. `origin/main`).
    ///
    /// # Errors
    /// Returns error if the branch doesn't exist or its upstream config is broken.
    pub fn upstream_branch(&self, branch_name: &str) -> Result<Option<String>> {
        let branch = self
            .inner
            .find_branch(branch_name, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(branch_name.into()))?;

        match branch.upstream() {
            Ok(upstream) => Ok(upstream.name()?.map(String::from)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // === Commit graph ===

    /// Resolve a revision (branch, remote-tracking ref, SHA) to a commit.
    ///
    /// # Errors
    /// Returns `RefNotFound` if the revision doesn't resolve.
    pub fn resolve_commit(&self, spec: &str) -> Result<Oid> {
        let object = self
            .inner
            .revparse_single(spec)
            .map_err(|_| Error::RefNotFound(spec.into()))?;
        Ok(object.peel_to_commit()?.id())
    }

    /// Count commits reachable from `to` but not from `from`.
    ///
    /// # Errors
    /// Returns error if revwalk fails.
    pub fn count_commits_between(&self, from: Oid, to: Oid) -> Result<usize> {
        let mut revwalk = self.inner.revwalk()?;
        revwalk.push(to)?;
        revwalk.hide(from)?;

        Ok(revwalk.count())
    }

    // === Low-level access ===

    /// Get a reference to the underlying git2 repository.
    ///
    /// Use sparingly - prefer high-level methods.
    #[must_use]
    pub const fn inner(&self) -> &git2::Repository {
        &self.inner
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir())
            .finish()
    }
}
