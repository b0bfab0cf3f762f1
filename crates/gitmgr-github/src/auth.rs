//! Authentication handling for GitHub remotes.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Default environment variable holding the token.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Where the GitHub token comes from.
#[derive(Debug, Clone)]
pub enum Auth {
    /// Use token from environment variable.
    EnvVar(String),

    /// Use a specific token.
    Token(SecretString),

    /// No token; rely on locally configured credentials.
    None,
}

impl Auth {
    /// Read the token from `var` if it is set.
    #[must_use]
    pub fn from_env(var: impl Into<String>) -> Self {
        Self::EnvVar(var.into())
    }

    /// Resolve the authentication to a token.
    ///
    /// # Errors
    /// Returns `NoToken` if the variable is unset (or there is no token at all),
    /// `EmptyToken` if it is set to an empty string.
    pub fn resolve(&self) -> Result<SecretString> {
        match self {
            Self::EnvVar(var) => {
                let token = std::env::var(var).map_err(|_| Error::NoToken(var.clone()))?;
                if token.trim().is_empty() {
                    return Err(Error::EmptyToken(var.clone()));
                }
                Ok(SecretString::from(token))
            }
            Self::Token(token) => Ok(token.clone()),
            Self::None => Err(Error::NoToken(DEFAULT_TOKEN_ENV.into())),
        }
    }

    /// Whether a token is available.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.resolve().is_ok()
    }

    /// The authenticated form of a GitHub remote URL.
    ///
    /// Returns `None` for non-GitHub remotes or when no token is available, in
    /// which case git's own credential configuration applies.
    #[must_use]
    pub fn authenticate(&self, url: &str) -> Option<String> {
        match self.resolve() {
            Ok(token) => authenticated_url(url, &token),
            Err(e) => {
                tracing::debug!(error = %e, "no token, using configured git credentials");
                None
            }
        }
    }
}

impl Default for Auth {
    fn default() -> Self {
        Self::from_env(DEFAULT_TOKEN_ENV)
    }
}

/// Embed `token` in a GitHub remote URL.
///
/// `https://github.com/o/r.git` and `git@github.com:o/r.git` both become
/// `https://<token>@github.com/o/r.git`. Existing userinfo is replaced.
/// Other hosts yield `None`.
#[must_use]
pub fn authenticated_url(url: &str, token: &SecretString) -> Option<String> {
    if !url.contains("github.com") {
        return None;
    }

    let token = token.expose_secret();
    if let Some(rest) = url.strip_prefix("https://") {
        return Some(format!("https://{token}@{}", strip_userinfo(rest)));
    }
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return Some(format!("https://{token}@github.com/{path}"));
    }
    None
}

/// Drop any `user[:password]@` prefix from the authority.
fn strip_userinfo(rest: &str) -> &str {
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => &rest[at + 1..],
        None => rest,
    }
}
