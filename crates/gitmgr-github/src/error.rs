//! Error types for gitmgr-github.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving GitHub credentials.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Token not found.
    #[error("no GitHub token found - set {0} to authenticate push and pull")]
    NoToken(String),

    /// Token variable set but empty.
    #[error("GitHub token in {0} is empty")]
    EmptyToken(String),
}
