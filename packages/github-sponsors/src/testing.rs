//! Testing utilities including a mock transport.
//!
//! Lets applications exercise the client without talking to GitHub.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::credentials::GitHubToken;
use crate::error::Result;
use crate::query::TOTAL_AMOUNT_FIELD;
use crate::transport::Transport;
use crate::types::{AccountType, Direction};

/// Record of a request made through the mock.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub endpoint: String,
    pub query: String,
}

/// A mock transport for testing.
///
/// Routes are matched first: the first route whose needle occurs in the
/// query answers it, every time. Otherwise queued responses are handed out
/// in order. An exhausted queue answers with no body.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<(String, Value)>,
    queue: Mutex<VecDeque<Option<Value>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body.
    pub fn with_response(self, body: Value) -> Self {
        self.lock_queue().push_back(Some(body));
        self
    }

    /// Queue an empty response.
    pub fn with_empty_response(self) -> Self {
        self.lock_queue().push_back(None);
        self
    }

    /// Answer every query containing `needle` with `body`.
    pub fn with_route(mut self, needle: impl Into<String>, body: Value) -> Self {
        self.routes.push((needle.into(), body));
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Option<Value>>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        endpoint: &str,
        query: &str,
        _token: &GitHubToken,
    ) -> Result<Option<Value>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockCall {
                endpoint: endpoint.to_string(),
                query: query.to_string(),
            });

        if let Some((_, body)) = self
            .routes
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
        {
            return Ok(Some(body.clone()));
        }

        Ok(self.lock_queue().pop_front().flatten())
    }
}

// =============================================================================
// Payload builders
// =============================================================================

/// Builder for a raw sponsorship node as the API would return it.
#[derive(Debug, Clone)]
pub struct MockNode {
    typename: &'static str,
    login: String,
    website: Option<String>,
    tier: Option<(i64, bool)>,
    has_entity: bool,
    is_active: bool,
    private: bool,
    created_at: String,
}

impl MockNode {
    /// An active, public user sponsorship at $5 a month.
    pub fn user(login: impl Into<String>) -> Self {
        Self::new("User", login)
    }

    /// An active, public organization sponsorship at $5 a month.
    pub fn organization(login: impl Into<String>) -> Self {
        Self::new("Organization", login)
    }

    fn new(typename: &'static str, login: impl Into<String>) -> Self {
        Self {
            typename,
            login: login.into(),
            website: None,
            tier: Some((5, false)),
            has_entity: true,
            is_active: true,
            private: false,
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    pub fn tier(mut self, monthly_dollars: i64, is_one_time: bool) -> Self {
        self.tier = Some((monthly_dollars, is_one_time));
        self
    }

    pub fn without_tier(mut self) -> Self {
        self.tier = None;
        self
    }

    /// Render the entity field as `null`, as GitHub does for deleted accounts.
    pub fn without_entity(mut self) -> Self {
        self.has_entity = false;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn created_at(mut self, timestamp: impl Into<String>) -> Self {
        self.created_at = timestamp.into();
        self
    }

    /// Render the node, placing the entity under the field `direction` uses.
    pub fn to_json(&self, direction: Direction) -> Value {
        let tier = self.tier.map(|(dollars, one_time)| {
            let name = if one_time {
                format!("${dollars} one time")
            } else {
                format!("${dollars} a month")
            };
            json!({
                "name": name,
                "isOneTime": one_time,
                "monthlyPriceInCents": dollars * 100,
                "monthlyPriceInDollars": dollars,
            })
        });

        let mut node = json!({
            "createdAt": self.created_at,
            "privacyLevel": if self.private { "PRIVATE" } else { "PUBLIC" },
            "isActive": self.is_active,
            "tier": tier,
        });
        node[direction.entity_field()] = if self.has_entity {
            json!({
                "__typename": self.typename,
                "login": self.login,
                "name": null,
                "avatarUrl": format!("https://avatars.githubusercontent.com/{}", self.login),
                "websiteUrl": self.website,
            })
        } else {
            Value::Null
        };
        node
    }
}

/// A full response body for one connection page.
pub fn sponsorship_page(
    account_type: AccountType,
    direction: Direction,
    nodes: Vec<Value>,
    next_cursor: Option<&str>,
) -> Value {
    let mut account = json!({});
    account[direction.connection_field()] = json!({
        "totalCount": nodes.len(),
        "pageInfo": {
            "endCursor": next_cursor,
            "hasNextPage": next_cursor.is_some(),
        },
        "nodes": nodes,
    });

    let mut data = json!({});
    data[account_type.as_field()] = account;
    json!({ "data": data })
}

/// A full response body for the total-amount query.
pub fn total_amount_response(account_type: AccountType, cents: i64) -> Value {
    let mut account = json!({});
    account[TOTAL_AMOUNT_FIELD] = json!(cents);

    let mut data = json!({});
    data[account_type.as_field()] = account;
    json!({ "data": data })
}

/// Route needle matching the total-amount query for a single sponsorable.
pub fn total_amount_needle(sponsorable: &str) -> String {
    format!("sponsorableLogins: [\"{sponsorable}\"]")
}
