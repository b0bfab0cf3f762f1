//! Remote lookup and remote-tracking refs.

use crate::Repository;
use crate::error::{Error, Result};

impl Repository {
    /// Check if a remote is configured.
    #[must_use]
    pub fn remote_exists(&self, name: &str) -> bool {
        self.inner().find_remote(name).is_ok()
    }

    /// Check if any remote is configured.
    ///
    /// # Errors
    /// Returns error if the remote list can't be read.
    pub fn has_remotes(&self) -> Result<bool> {
        Ok(!self.inner().remotes()?.is_empty())
    }

    /// Get the fetch URL of a remote.
    ///
    /// # Errors
    /// Returns `RemoteNotFound` if the remote doesn't exist or has no URL.
    pub fn remote_url(&self, name: &str) -> Result<String> {
        let remote = self
            .inner()
            .find_remote(name)
            .map_err(|_| Error::RemoteNotFound(name.into()))?;

        remote
            .url()
            .map(String::from)
            .ok_or_else(|| Error::RemoteNotFound(name.into()))
    }

    /// Check if `refs/remotes/<remote>/<branch>` exists.
    #[must_use]
    pub fn remote_branch_exists(&self, remote: &str, branch: &str) -> bool {
        self.inner()
            .find_reference(&format!("refs/remotes/{remote}/{branch}"))
            .is_ok()
    }
}
