//! GitHub Sponsors GraphQL client
//!
//! Fetches sponsorship relationships for a user or organization and
//! normalizes them into one record shape for downstream reporting.
//!
//! Two directions are supported:
//!
//! - **Sponsors** (maintainer mode): who sponsors this account. Lapsed
//!   one-time sponsorships can be prorated against a tier catalog to
//!   recover the level they still fund.
//! - **Sponsees** (reverse mode): whom this account sponsors. The full
//!   history is collapsed into one entry per sponsorable, ranked by the
//!   lifetime amount given.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_sponsors::{AccountType, GitHubSponsors, SponsorsConfig, Tier};
//!
//! let client = GitHubSponsors::new(std::env::var("GITHUB_TOKEN")?)?;
//!
//! let config = SponsorsConfig::new()
//!     .with_past_sponsors(true)
//!     .with_prorate_onetime(true)
//!     .with_tiers([Tier::new("Backer", 5), Tier::new("Sponsor", 25)]);
//!
//! let sponsors = client.fetch("antfu", AccountType::User, &config).await?;
//! for sponsorship in &sponsors {
//!     println!("{} ${}", sponsorship.sponsor.login, sponsorship.monthly_dollars);
//! }
//! ```
//!
//! # Testing
//!
//! ```rust,ignore
//! use github_sponsors::testing::{sponsorship_page, MockNode, MockTransport};
//!
//! let transport = MockTransport::new().with_response(sponsorship_page(
//!     AccountType::User,
//!     Direction::AsMaintainer,
//!     vec![MockNode::user("octocat").to_json(Direction::AsMaintainer)],
//!     None,
//! ));
//! let client = GitHubSponsors::with_transport("ghp_test", transport)?;
//! ```

pub mod aggregate;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod query;
pub mod testing;
pub mod tiers;
pub mod transport;
pub mod types;

pub use aggregate::SponsoringSummary;
pub use client::{validate_login, GitHubSponsors, GITHUB_GRAPHQL_ENDPOINT};
pub use config::SponsorsConfig;
pub use credentials::GitHubToken;
pub use error::{Result, SponsorsError};
pub use tiers::{current_tier_dollars, ProrationTiers};
pub use transport::{GraphQLError, HttpTransport, Transport};
pub use types::*;
