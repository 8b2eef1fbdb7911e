//! Error types for the GitHub Sponsors client.

use thiserror::Error;

use crate::transport::GraphQLError;

/// Result type for GitHub Sponsors operations.
pub type Result<T> = std::result::Result<T, SponsorsError>;

/// GitHub Sponsors client errors.
///
/// Every variant is terminal for the fetch that produced it. Nothing is
/// retried internally and no partial result set is returned.
#[derive(Debug, Error)]
pub enum SponsorsError {
    /// Missing or invalid token, login, or account type. Raised before any request is sent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transport answered without a response body.
    #[error("no response from {endpoint}")]
    MissingResponse { endpoint: String },

    /// The token lacks the scopes needed to read sponsorships.
    #[error("token is missing the `read:user` and/or `read:org` scopes")]
    InsufficientScope,

    /// GraphQL error payload. The full list is kept for diagnostics.
    #[error("GitHub API error:\n{}", render_errors(.errors))]
    Api { errors: Vec<GraphQLError> },

    /// An expected field is absent (or undecodable) even though no errors were reported.
    #[error("malformed response: `{path}` is missing or invalid")]
    MalformedResponse { path: String },

    /// Non-2xx HTTP status
    #[error("HTTP {status} from {endpoint}: {body}")]
    Status {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// Network error (connection failed, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not JSON
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl SponsorsError {
    pub(crate) fn malformed(path: impl Into<String>) -> Self {
        Self::MalformedResponse { path: path.into() }
    }
}

fn render_errors(errors: &[GraphQLError]) -> String {
    serde_json::to_string_pretty(errors).unwrap_or_else(|_| format!("{errors:?}"))
}
