//! Repository handle management.
//!
//! A [`RepoContext`] discovers the repository the first time it is asked for
//! a handle and hands out the same handle until it is reset or rebound.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gitmgr_git::Repository;

use crate::error::{Result, from_git};

/// Lazily opened, cached repository handle.
///
/// Single-threaded: requests are processed one at a time, so the slot is a
/// `RefCell` and handles are shared as `Rc`.
#[derive(Debug)]
pub struct RepoContext {
    start: PathBuf,
    cached: RefCell<Option<Rc<Repository>>>,
}

impl RepoContext {
    /// Discover the repository from `start` (walking up to the root) on first use.
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
            cached: RefCell::new(None),
        }
    }

    /// Directory discovery starts from.
    #[must_use]
    pub fn start_dir(&self) -> &Path {
        &self.start
    }

    /// The cached handle, opening the repository if there is none.
    ///
    /// # Errors
    /// Returns `NotARepository` naming the start directory if no repository
    /// is found at or above it.
    pub fn handle(&self) -> Result<Rc<Repository>> {
        if let Some(repo) = self.cached.borrow().as_ref() {
            return Ok(Rc::clone(repo));
        }

        let repo = Rc::new(Repository::open(&self.start).map_err(from_git)?);
        tracing::debug!(start = %self.start.display(), workdir = ?repo.workdir(), "opened repository");
        *self.cached.borrow_mut() = Some(Rc::clone(&repo));
        Ok(repo)
    }

    /// Whether a handle is currently cached.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.cached.borrow().is_some()
    }

    /// Drop the cached handle; the next [`handle`](Self::handle) rediscovers.
    pub fn reset(&self) {
        self.cached.borrow_mut().take();
    }

    /// Point the context at another directory.
    pub fn rebind(&mut self, start: impl Into<PathBuf>) {
        self.start = start.into();
        self.reset();
    }
}
