//! # gitmgr-github
//!
//! GitHub authentication for gitmgr: resolves an access token and rewrites
//! GitHub remote URLs so push and pull authenticate with it.
//!
//! # Security
//!
//! Authentication tokens are stored using `SecretString` which automatically
//! zeroizes memory when dropped, reducing credential exposure in memory dumps.

mod auth;
mod error;

pub use auth::{Auth, authenticated_url};
pub use error::{Error, Result};
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
