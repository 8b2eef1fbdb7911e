//! Fetch configuration.

use serde::{Deserialize, Serialize};

use crate::types::{SponsorsMode, Tier};

/// Configuration for a sponsorship fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SponsorsConfig {
    /// Sponsors of this account, or accounts this account sponsors.
    ///
    /// Default: `sponsors`.
    pub mode: SponsorsMode,

    /// Priced tier catalog used to prorate lapsed one-time sponsorships.
    pub tiers: Vec<Tier>,

    /// Include sponsorships that are no longer active.
    ///
    /// Maintainer mode only; sponsee mode always reads the full history.
    /// Default: false.
    pub include_past_sponsors: bool,

    /// Reconstruct a current level for lapsed one-time sponsorships from `tiers`.
    ///
    /// When false, every inactive sponsorship gets the `-1` sentinel.
    /// Default: false.
    pub prorate_onetime: bool,

    /// Keep `PRIVATE` sponsorships in [`fetch`](crate::GitHubSponsors::fetch) output.
    ///
    /// Default: false.
    pub include_private: bool,

    /// Cap on concurrent lifetime-total queries in sponsee mode.
    ///
    /// `None` issues one query per sponsorable all at once.
    pub total_concurrency: Option<usize>,
}

impl Default for SponsorsConfig {
    fn default() -> Self {
        Self {
            mode: SponsorsMode::Sponsors,
            tiers: vec![],
            include_past_sponsors: false,
            prorate_onetime: false,
            include_private: false,
            total_concurrency: None,
        }
    }
}

impl SponsorsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: SponsorsMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tiers(mut self, tiers: impl IntoIterator<Item = Tier>) -> Self {
        self.tiers = tiers.into_iter().collect();
        self
    }

    pub fn with_past_sponsors(mut self, include: bool) -> Self {
        self.include_past_sponsors = include;
        self
    }

    pub fn with_prorate_onetime(mut self, prorate: bool) -> Self {
        self.prorate_onetime = prorate;
        self
    }

    pub fn with_private(mut self, include: bool) -> Self {
        self.include_private = include;
        self
    }

    pub fn with_total_concurrency(mut self, limit: usize) -> Self {
        self.total_concurrency = Some(limit);
        self
    }

    /// `activeOnly` argument for the maintainer connection.
    pub fn active_only(&self) -> bool {
        !self.include_past_sponsors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_partial_config() {
        let config: SponsorsConfig = serde_json::from_value(json!({
            "mode": "sponsees",
            "includePastSponsors": true,
            "tiers": [
                { "name": "Backer", "monthlyDollars": 5 },
                { "name": "Past Sponsors", "monthlyDollars": -1 }
            ]
        }))
        .unwrap();

        assert_eq!(config.mode, SponsorsMode::Sponsees);
        assert!(!config.active_only());
        assert!(!config.prorate_onetime);
        assert_eq!(config.tiers.len(), 2);
        assert_eq!(config.tiers[0].monthly_dollars, 5);
        assert_eq!(config.total_concurrency, None);
    }

    #[test]
    fn test_defaults() {
        let config = SponsorsConfig::new();
        assert_eq!(config.mode, SponsorsMode::Sponsors);
        assert!(config.active_only());
        assert!(!config.include_private);
    }
}
