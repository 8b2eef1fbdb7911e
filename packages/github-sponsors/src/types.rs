//! GitHub Sponsors request and response types.
//!
//! `Raw*` types mirror the GraphQL payload. `Sponsor`, `Sponsorship` and
//! `SponsoringRecord` are the normalized shapes handed to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SponsorsError;

/// Monthly-dollar sentinel for an inactive sponsorship with no attributable current level.
pub const INACTIVE_MONTHLY_DOLLARS: i64 = -1;

// =============================================================================
// Accounts and directions
// =============================================================================

/// Kind of account whose sponsorships are queried.
///
/// Also the GraphQL root field the query selects (`user` / `organization`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    User,
    Organization,
}

impl AccountType {
    /// GraphQL root field for this account type.
    pub fn as_field(&self) -> &'static str {
        match self {
            AccountType::User => "user",
            AccountType::Organization => "organization",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_field())
    }
}

impl FromStr for AccountType {
    type Err = SponsorsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(AccountType::User),
            "organization" | "org" => Ok(AccountType::Organization),
            other => Err(SponsorsError::Config(format!(
                "unknown account type `{other}` (expected `user` or `organization`)"
            ))),
        }
    }
}

/// Which side of the sponsorship relationship a query walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Incoming: accounts sponsoring the queried login.
    AsMaintainer,
    /// Outgoing: accounts the queried login sponsors.
    AsSponsor,
}

impl Direction {
    /// Connection field on the account object.
    pub fn connection_field(&self) -> &'static str {
        match self {
            Direction::AsMaintainer => "sponsorshipsAsMaintainer",
            Direction::AsSponsor => "sponsorshipsAsSponsor",
        }
    }

    /// Field on each sponsorship node holding the other party.
    pub fn entity_field(&self) -> &'static str {
        match self {
            Direction::AsMaintainer => "sponsorEntity",
            Direction::AsSponsor => "sponsorable",
        }
    }
}

/// Fetch mode: who sponsors us, or whom we sponsor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorsMode {
    /// Maintainer mode
    #[default]
    Sponsors,
    /// Sponsee (reverse) mode
    Sponsees,
}

impl FromStr for SponsorsMode {
    type Err = SponsorsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sponsors" => Ok(SponsorsMode::Sponsors),
            "sponsees" => Ok(SponsorsMode::Sponsees),
            other => Err(SponsorsError::Config(format!(
                "unknown mode `{other}` (expected `sponsors` or `sponsees`)"
            ))),
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Entity type as reported by `__typename`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    User,
    Organization,
}

/// Profile fields shared by users and organizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProfile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
}

/// A member of the `Sponsor` / `Sponsorable` union, tagged by `__typename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum RawEntity {
    Organization(EntityProfile),
    User(EntityProfile),
}

impl RawEntity {
    pub fn entity_type(&self) -> EntityType {
        match self {
            RawEntity::Organization(_) => EntityType::Organization,
            RawEntity::User(_) => EntityType::User,
        }
    }

    pub fn profile(&self) -> &EntityProfile {
        match self {
            RawEntity::Organization(profile) | RawEntity::User(profile) => profile,
        }
    }

    pub fn login(&self) -> &str {
        &self.profile().login
    }
}

/// Normalized sponsor or sponsorable account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub website_url: Option<String>,
    /// Profile page, `https://github.com/<login>`
    pub link_url: String,
}

// =============================================================================
// Sponsorship nodes
// =============================================================================

/// Visibility the sponsor chose for the sponsorship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyLevel {
    Public,
    Private,
}

/// Tier as attached to a sponsorship by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTier {
    #[serde(default)]
    pub name: String,
    pub is_one_time: bool,
    pub monthly_price_in_cents: i64,
    pub monthly_price_in_dollars: i64,
}

/// One sponsorship node exactly as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSponsorship {
    pub created_at: DateTime<Utc>,
    pub privacy_level: PrivacyLevel,
    pub is_active: bool,
    #[serde(default)]
    pub tier: Option<RawTier>,
    /// Set on `sponsorshipsAsMaintainer` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor_entity: Option<RawEntity>,
    /// Set on `sponsorshipsAsSponsor` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsorable: Option<RawEntity>,
}

/// Relay page info.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// One page of a sponsorship connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipConnection {
    #[serde(default)]
    pub total_count: Option<u64>,
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Option<Vec<Option<RawSponsorship>>>,
}

// =============================================================================
// Normalized records
// =============================================================================

/// Canonical sponsorship record.
///
/// In maintainer mode `monthly_dollars` is the current monthly level, or
/// [`INACTIVE_MONTHLY_DOLLARS`] for a lapsed sponsorship. In sponsee mode it
/// carries the lifetime total given to the sponsorable, in dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsorship {
    pub sponsor: Sponsor,
    pub is_one_time: bool,
    pub monthly_dollars: f64,
    pub privacy_level: PrivacyLevel,
    pub tier_name: String,
    pub created_at: DateTime<Utc>,
}

impl Sponsorship {
    /// Whether the record carries the inactive sentinel.
    pub fn is_lapsed(&self) -> bool {
        self.monthly_dollars < 0.0
    }
}

/// One historical sponsorship event in sponsee mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoringRecord {
    pub sponsorable: Sponsor,
    pub monthly_dollars: i64,
    pub monthly_cents: i64,
    pub tier_name: String,
    pub is_one_time: bool,
    pub privacy_level: PrivacyLevel,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    /// Source node, kept for traceability
    pub raw: RawSponsorship,
}

// =============================================================================
// Configuration inputs
// =============================================================================

/// Entry in the account owner's priced tier catalog.
///
/// Only entries with a positive `monthly_dollars` take part in proration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub monthly_dollars: i64,
    #[serde(default)]
    pub is_one_time: bool,
}

impl Tier {
    pub fn new(name: impl Into<String>, monthly_dollars: i64) -> Self {
        Self {
            name: name.into(),
            monthly_dollars,
            is_one_time: false,
        }
    }

    /// Mark the tier as one-time.
    pub fn one_time(mut self) -> Self {
        self.is_one_time = true;
        self
    }
}

/// Filter for the lifetime total-amount query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalAmountFilter {
    /// Only count sponsorships from this instant on.
    pub since: Option<DateTime<Utc>>,
    /// Only count sponsorships up to this instant.
    pub until: Option<DateTime<Utc>>,
    /// Only count these sponsorables (empty = all).
    pub sponsorable_logins: Vec<String>,
}

impl TotalAmountFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Restrict the total to one more sponsorable.
    pub fn sponsorable(mut self, login: impl Into<String>) -> Self {
        self.sponsorable_logins.push(login.into());
        self
    }
}
