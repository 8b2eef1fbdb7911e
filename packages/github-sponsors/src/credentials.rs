//! Token handling with secure memory.
//!
//! Uses the `secrecy` crate so the GitHub token never ends up in logs,
//! debug output, or error messages.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{Result, SponsorsError};

/// A GitHub personal access token.
///
/// Needs the `read:user` scope for user accounts and `read:org` for
/// organizations. Construction rejects blank values so a missing token is
/// reported before any request goes out.
pub struct GitHubToken(SecretBox<str>);

impl GitHubToken {
    /// Wrap a token, rejecting empty or whitespace-only values.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SponsorsError::Config("GitHub token is empty".into()));
        }
        Ok(Self(SecretBox::new(Box::from(trimmed))))
    }

    /// Expose the token for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for GitHubToken {
    fn clone(&self) -> Self {
        Self(SecretBox::new(Box::from(self.expose())))
    }
}

impl fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GitHubToken([REDACTED])")
    }
}

impl fmt::Display for GitHubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
