//! GitHub Sponsors client.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::aggregate::{group_by_sponsorable, merge_lifetime_totals};
use crate::config::SponsorsConfig;
use crate::credentials::GitHubToken;
use crate::error::{Result, SponsorsError};
use crate::normalize::{normalize_sponsoring, MaintainerNormalizer};
use crate::pagination::{fetch_all_sponsorships, PageRequest};
use crate::query::{total_amount_query, TOTAL_AMOUNT_FIELD};
use crate::tiers::ProrationTiers;
use crate::transport::{decode_response, extract, HttpTransport, Transport};
use crate::types::{
    AccountType, Direction, PrivacyLevel, SponsoringRecord, Sponsorship, SponsorsMode,
    TotalAmountFilter,
};

/// GitHub's GraphQL endpoint.
pub const GITHUB_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// GitHub Sponsors API client.
pub struct GitHubSponsors<T = HttpTransport> {
    transport: T,
    token: GitHubToken,
    endpoint: String,
}

impl GitHubSponsors<HttpTransport> {
    /// Create a client that talks to GitHub over HTTPS.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_transport(token, HttpTransport::new()?)
    }
}

impl<T: Transport> GitHubSponsors<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(token: impl Into<String>, transport: T) -> Result<Self> {
        Ok(Self {
            transport,
            token: GitHubToken::new(token)?,
            endpoint: GITHUB_GRAPHQL_ENDPOINT.to_string(),
        })
    }

    /// Set a custom endpoint (GitHub Enterprise, proxies, etc.).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch in the configured mode, drop private entries unless
    /// `include_private`, and rank by `monthly_dollars` descending.
    pub async fn fetch(
        &self,
        login: &str,
        account_type: AccountType,
        config: &SponsorsConfig,
    ) -> Result<Vec<Sponsorship>> {
        self.fetch_at(login, account_type, config, Utc::now()).await
    }

    /// [`fetch`](Self::fetch) with an explicit "now" for proration.
    pub async fn fetch_at(
        &self,
        login: &str,
        account_type: AccountType,
        config: &SponsorsConfig,
        now: DateTime<Utc>,
    ) -> Result<Vec<Sponsorship>> {
        let mut sponsorships = match config.mode {
            SponsorsMode::Sponsors => {
                self.fetch_sponsors_at(login, account_type, config, now)
                    .await?
            }
            SponsorsMode::Sponsees => self.fetch_sponsoring(login, account_type, config).await?,
        };

        if !config.include_private {
            sponsorships.retain(|s| s.privacy_level != PrivacyLevel::Private);
        }
        sponsorships.sort_by(|a, b| b.monthly_dollars.total_cmp(&a.monthly_dollars));

        Ok(sponsorships)
    }

    /// Accounts sponsoring `login` (maintainer mode).
    pub async fn fetch_sponsors(
        &self,
        login: &str,
        account_type: AccountType,
        config: &SponsorsConfig,
    ) -> Result<Vec<Sponsorship>> {
        self.fetch_sponsors_at(login, account_type, config, Utc::now())
            .await
    }

    /// [`fetch_sponsors`](Self::fetch_sponsors) with an explicit "now" for proration.
    pub async fn fetch_sponsors_at(
        &self,
        login: &str,
        account_type: AccountType,
        config: &SponsorsConfig,
        now: DateTime<Utc>,
    ) -> Result<Vec<Sponsorship>> {
        validate_login(login)?;

        let raw = fetch_all_sponsorships(
            &self.transport,
            &self.endpoint,
            &self.token,
            PageRequest {
                login,
                account_type,
                direction: Direction::AsMaintainer,
                active_only: config.active_only(),
            },
        )
        .await?;

        let tiers = ProrationTiers::from_catalog(&config.tiers);
        let normalizer = MaintainerNormalizer {
            tiers: &tiers,
            prorate_onetime: config.prorate_onetime,
            now,
        };
        let sponsors: Vec<Sponsorship> = raw
            .iter()
            .filter_map(|node| normalizer.normalize(node))
            .collect();

        info!(
            login,
            fetched = raw.len(),
            kept = sponsors.len(),
            "Fetched sponsors"
        );
        Ok(sponsors)
    }

    /// Every historical sponsorship `login` has made, one record per event.
    pub async fn fetch_sponsoring_records(
        &self,
        login: &str,
        account_type: AccountType,
    ) -> Result<Vec<SponsoringRecord>> {
        validate_login(login)?;

        let raw = fetch_all_sponsorships(
            &self.transport,
            &self.endpoint,
            &self.token,
            PageRequest {
                login,
                account_type,
                direction: Direction::AsSponsor,
                active_only: false,
            },
        )
        .await?;

        Ok(raw.iter().filter_map(normalize_sponsoring).collect())
    }

    /// Accounts `login` sponsors (sponsee mode), one entry per sponsorable.
    ///
    /// `monthly_dollars` carries the lifetime total given to each sponsorable.
    pub async fn fetch_sponsoring(
        &self,
        login: &str,
        account_type: AccountType,
        config: &SponsorsConfig,
    ) -> Result<Vec<Sponsorship>> {
        let records = self.fetch_sponsoring_records(login, account_type).await?;
        let record_count = records.len();
        let groups = group_by_sponsorable(records);

        let sponsorables: Vec<String> = groups.keys().cloned().collect();
        let totals = self
            .fetch_lifetime_totals(login, account_type, sponsorables, config.total_concurrency)
            .await?;

        let sponsoring = merge_lifetime_totals(groups, &totals);
        info!(
            login,
            records = record_count,
            sponsorables = sponsoring.len(),
            "Fetched sponsoring"
        );
        Ok(sponsoring)
    }

    /// Lifetime amount `login` has given as a sponsor, in cents.
    pub async fn fetch_total_amount(
        &self,
        login: &str,
        account_type: AccountType,
        filter: &TotalAmountFilter,
    ) -> Result<i64> {
        validate_login(login)?;
        for sponsorable in &filter.sponsorable_logins {
            validate_login(sponsorable)?;
        }

        let query = total_amount_query(login, account_type, filter);
        let body = self
            .transport
            .execute(&self.endpoint, &query, &self.token)
            .await?;
        let data = decode_response(&self.endpoint, body)?;

        extract(&data, &[account_type.as_field(), TOTAL_AMOUNT_FIELD])
    }

    /// One total-amount query per sponsorable, issued concurrently.
    async fn fetch_lifetime_totals(
        &self,
        login: &str,
        account_type: AccountType,
        sponsorables: Vec<String>,
        concurrency: Option<usize>,
    ) -> Result<HashMap<String, i64>> {
        let limit = concurrency.unwrap_or(sponsorables.len()).max(1);
        debug!(
            login,
            sponsorables = sponsorables.len(),
            limit,
            "Fetching lifetime totals"
        );

        stream::iter(sponsorables)
            .map(|sponsorable| async move {
                let filter = TotalAmountFilter::new().sponsorable(sponsorable.as_str());
                let cents = self
                    .fetch_total_amount(login, account_type, &filter)
                    .await?;
                debug!(login, sponsorable = %sponsorable, cents, "Fetched lifetime total");
                Ok::<_, SponsorsError>((sponsorable, cents))
            })
            .buffer_unordered(limit)
            .try_collect()
            .await
    }
}

/// Reject logins that cannot be safely interpolated into a query.
///
/// GitHub logins are ASCII alphanumerics and hyphens.
pub fn validate_login(login: &str) -> Result<()> {
    if login.is_empty() {
        return Err(SponsorsError::Config("login is empty".into()));
    }
    if !login.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(SponsorsError::Config(format!(
            "invalid GitHub login `{login}`"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    #[test]
    fn test_client_builder() {
        let client = GitHubSponsors::with_transport("ghp_test", MockTransport::new())
            .unwrap()
            .with_endpoint("https://github.example.com/api/graphql");

        assert_eq!(client.endpoint(), "https://github.example.com/api/graphql");
    }

    #[test]
    fn test_blank_token_rejected() {
        let result = GitHubSponsors::with_transport("", MockTransport::new());
        assert!(matches!(result, Err(SponsorsError::Config(_))));
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("antfu").is_ok());
        assert!(validate_login("some-org-42").is_ok());
        assert!(validate_login("").is_err());
        assert!(validate_login("bad\"login").is_err());
        assert!(validate_login("with space").is_err());
    }

    #[test]
    fn test_invalid_login_sends_nothing() {
        let client = GitHubSponsors::with_transport("ghp_test", MockTransport::new()).unwrap();

        let result = tokio_test::block_on(client.fetch_sponsors(
            "",
            AccountType::User,
            &SponsorsConfig::default(),
        ));

        assert!(matches!(result, Err(SponsorsError::Config(_))));
        assert_eq!(client.transport().call_count(), 0);
    }
}
