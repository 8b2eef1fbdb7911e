//! GraphQL transport boundary.
//!
//! [`Transport`] executes a single query and hands back the raw JSON body.
//! Everything above it (error-envelope checks, field lookup, pagination)
//! is transport-agnostic.

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::credentials::GitHubToken;
use crate::error::{Result, SponsorsError};

/// Error `type` GitHub reports when the token lacks read scopes.
pub const INSUFFICIENT_SCOPES: &str = "INSUFFICIENT_SCOPES";

const USER_AGENT: &str = concat!("github-sponsors/", env!("CARGO_PKG_VERSION"));

/// Executes one GraphQL request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `query` to `endpoint` with bearer authorization.
    ///
    /// `Ok(None)` means the server answered without a body.
    async fn execute(
        &self,
        endpoint: &str,
        query: &str,
        token: &GitHubToken,
    ) -> Result<Option<Value>>;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with its own HTTP client.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Reuse an existing HTTP client.
    ///
    /// The client must send a `User-Agent`; GitHub rejects requests without one.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        endpoint: &str,
        query: &str,
        token: &GitHubToken,
    ) -> Result<Option<Value>> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(token.expose())
            .header(header::ACCEPT, "application/json")
            .json(&GraphQLRequest { query })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint, "GitHub GraphQL request failed");
                SponsorsError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, endpoint, "GitHub GraphQL API error");
            return Err(SponsorsError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&body)?;
        Ok((!value.is_null()).then_some(value))
    }
}

// =============================================================================
// Response envelope
// =============================================================================

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    #[serde(default)]
    pub message: String,
    /// GitHub-specific error code, e.g. `NOT_FOUND` or `INSUFFICIENT_SCOPES`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<GraphQLErrorLocation>>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: None,
            path: None,
            locations: None,
        }
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLErrorLocation {
    pub line: i32,
    pub column: i32,
}

impl GraphQLResponse {
    /// Surface GraphQL-level errors, otherwise return `data`.
    pub fn into_data(self) -> Result<Value> {
        if let Some(errors) = self.errors.filter(|errors| !errors.is_empty()) {
            if errors[0].error_type.as_deref() == Some(INSUFFICIENT_SCOPES) {
                return Err(SponsorsError::InsufficientScope);
            }
            return Err(SponsorsError::Api { errors });
        }

        self.data
            .filter(|data| !data.is_null())
            .ok_or_else(|| SponsorsError::malformed("data"))
    }
}

/// Check a raw transport body and return its `data` object.
pub(crate) fn decode_response(endpoint: &str, body: Option<Value>) -> Result<Value> {
    let body = body.ok_or_else(|| SponsorsError::MissingResponse {
        endpoint: endpoint.to_string(),
    })?;
    let response: GraphQLResponse =
        serde_json::from_value(body).map_err(|_| SponsorsError::malformed("$"))?;
    response.into_data()
}

/// Decode the value at `path` under `data`.
pub(crate) fn extract<T: DeserializeOwned>(data: &Value, path: &[&str]) -> Result<T> {
    let dotted = path.join(".");
    let pointer = format!("/{}", path.join("/"));

    let value = data
        .pointer(&pointer)
        .filter(|value| !value.is_null())
        .ok_or_else(|| SponsorsError::malformed(dotted.as_str()))?;

    T::deserialize(value).map_err(|e| {
        warn!(path = %dotted, error = %e, "Unexpected response shape");
        SponsorsError::malformed(dotted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_body_is_missing_response() {
        let err = decode_response("https://api.github.com/graphql", None).unwrap_err();
        assert!(matches!(err, SponsorsError::MissingResponse { .. }));
    }

    #[test]
    fn test_insufficient_scopes_detected_from_first_error() {
        let body = json!({
            "errors": [
                {
                    "type": "INSUFFICIENT_SCOPES",
                    "message": "Your token has not been granted the required scopes"
                },
                { "type": "NOT_FOUND", "message": "other" }
            ]
        });

        let err = decode_response("e", Some(body)).unwrap_err();
        assert!(matches!(err, SponsorsError::InsufficientScope));
    }

    #[test]
    fn test_scope_error_not_first_is_api_error() {
        let body = json!({
            "errors": [
                { "type": "NOT_FOUND", "message": "Could not resolve to a User" },
                { "type": "INSUFFICIENT_SCOPES", "message": "scopes" }
            ]
        });

        match decode_response("e", Some(body)).unwrap_err() {
            SponsorsError::Api { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].error_type.as_deref(), Some("NOT_FOUND"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_error_list_is_ignored() {
        let body = json!({ "errors": [], "data": { "user": null } });
        let data = decode_response("e", Some(body)).unwrap();
        assert!(data.get("user").is_some());
    }

    #[test]
    fn test_null_data_is_malformed() {
        let err = decode_response("e", Some(json!({ "data": null }))).unwrap_err();
        assert!(matches!(err, SponsorsError::MalformedResponse { path } if path == "data"));
    }

    #[test]
    fn test_extract_reports_dotted_path() {
        let data = json!({ "user": { "sponsorshipsAsSponsor": null } });

        let err = extract::<Value>(&data, &["user", "sponsorshipsAsSponsor"]).unwrap_err();
        match err {
            SponsorsError::MalformedResponse { path } => {
                assert_eq!(path, "user.sponsorshipsAsSponsor")
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_decodes_value() {
        let data = json!({ "organization": { "totalSponsorshipAmountAsSponsorInCents": 12_345 } });

        let cents: i64 = extract(
            &data,
            &["organization", "totalSponsorshipAmountAsSponsorInCents"],
        )
        .unwrap();
        assert_eq!(cents, 12_345);
    }

    mod http {
        use super::*;
        use crate::client::GitHubSponsors;
        use crate::types::{AccountType, TotalAmountFilter};
        use httpmock::prelude::*;

        const QUERY: &str = "query { viewer { login } }";

        fn token() -> GitHubToken {
            GitHubToken::new("ghp_test").unwrap()
        }

        #[tokio::test]
        async fn test_sends_bearer_token_and_query_body() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method(Method::POST)
                    .path("/graphql")
                    .header("authorization", "Bearer ghp_test")
                    .header("accept", "application/json")
                    .header("user-agent", USER_AGENT)
                    .json_body(json!({ "query": QUERY }));
                then.status(200)
                    .json_body(json!({ "data": { "viewer": { "login": "antfu" } } }));
            });

            let transport = HttpTransport::new().unwrap();
            let body = transport
                .execute(&server.url("/graphql"), QUERY, &token())
                .await
                .unwrap();

            mock.assert();
            assert_eq!(body, Some(json!({ "data": { "viewer": { "login": "antfu" } } })));
        }

        #[tokio::test]
        async fn test_non_2xx_is_status_error() {
            let server = MockServer::start();
            let _m = server.mock(|when, then| {
                when.method(Method::POST).path("/graphql");
                then.status(401)
                    .header("content-type", "application/json")
                    .body(r#"{"message": "Bad credentials"}"#);
            });

            let endpoint = server.url("/graphql");
            let err = HttpTransport::new()
                .unwrap()
                .execute(&endpoint, QUERY, &token())
                .await
                .unwrap_err();

            match err {
                SponsorsError::Status {
                    status,
                    endpoint: reported,
                    body,
                } => {
                    assert_eq!(status, 401);
                    assert_eq!(reported, endpoint);
                    assert!(body.contains("Bad credentials"));
                }
                other => panic!("expected Status error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_empty_and_null_bodies_are_none() {
            let server = MockServer::start();
            let _empty = server.mock(|when, then| {
                when.method(Method::POST).path("/empty");
                then.status(200);
            });
            let _null = server.mock(|when, then| {
                when.method(Method::POST).path("/null");
                then.status(200).body("null");
            });

            let transport = HttpTransport::new().unwrap();
            let empty = transport
                .execute(&server.url("/empty"), QUERY, &token())
                .await
                .unwrap();
            let null = transport
                .execute(&server.url("/null"), QUERY, &token())
                .await
                .unwrap();

            assert_eq!(empty, None);
            assert_eq!(null, None);
        }

        #[tokio::test]
        async fn test_empty_body_surfaces_as_missing_response() {
            let server = MockServer::start();
            let _m = server.mock(|when, then| {
                when.method(Method::POST).path("/graphql");
                then.status(200);
            });

            let client = GitHubSponsors::new("ghp_test")
                .unwrap()
                .with_endpoint(server.url("/graphql"));
            let err = client
                .fetch_total_amount("antfu", AccountType::User, &TotalAmountFilter::new())
                .await
                .unwrap_err();

            assert!(matches!(err, SponsorsError::MissingResponse { .. }));
        }

        #[tokio::test]
        async fn test_custom_client_is_used() {
            let server = MockServer::start();
            let mock = server.mock(|when, then| {
                when.method(Method::POST)
                    .path("/graphql")
                    .header("user-agent", "sponsors-dashboard/2.0");
                then.status(200).json_body(json!({
                    "data": { "user": { "totalSponsorshipAmountAsSponsorInCents": 4_200 } }
                }));
            });

            let http = reqwest::Client::builder()
                .user_agent("sponsors-dashboard/2.0")
                .build()
                .unwrap();
            let transport = HttpTransport::with_client(http);
            let client = GitHubSponsors::with_transport("ghp_test", transport)
                .unwrap()
                .with_endpoint(server.url("/graphql"));

            let cents = client
                .fetch_total_amount("antfu", AccountType::User, &TotalAmountFilter::new())
                .await
                .unwrap();

            mock.assert();
            assert_eq!(cents, 4_200);
        }
    }
}
