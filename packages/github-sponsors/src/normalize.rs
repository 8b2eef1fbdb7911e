//! Raw node → canonical record conversion.
//!
//! All functions here are pure: the same node always yields the same record.

use chrono::{DateTime, Utc};
use tracing::warn;
use url::Url;

use crate::tiers::{current_tier_dollars, ProrationTiers};
use crate::types::{
    RawEntity, RawSponsorship, Sponsor, SponsoringRecord, Sponsorship, INACTIVE_MONTHLY_DOLLARS,
};

const GITHUB_URL: &str = "https://github.com";

/// Profile URL for a login.
pub fn link_url(login: &str) -> String {
    format!("{GITHUB_URL}/{login}")
}

/// Normalize a user-entered website URL.
///
/// Blank → `None`. Missing scheme → `https://` prefixed. Anything that
/// still does not parse is dropped.
pub fn normalize_url(url: Option<&str>) -> Option<String> {
    let trimmed = url?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(_) => Some(candidate),
        Err(e) => {
            warn!(url = trimmed, error = %e, "Dropping unparseable website URL");
            None
        }
    }
}

/// Resolve the `__typename` union into a normalized account.
pub fn normalize_entity(entity: &RawEntity) -> Sponsor {
    let profile = entity.profile();
    Sponsor {
        entity_type: entity.entity_type(),
        login: profile.login.clone(),
        name: profile.name.clone(),
        avatar_url: profile.avatar_url.clone(),
        website_url: normalize_url(profile.website_url.as_deref()),
        link_url: link_url(&profile.login),
    }
}

/// Maintainer-mode normalization settings.
#[derive(Debug, Clone)]
pub struct MaintainerNormalizer<'a> {
    pub tiers: &'a ProrationTiers,
    pub prorate_onetime: bool,
    pub now: DateTime<Utc>,
}

impl MaintainerNormalizer<'_> {
    /// Normalize one `sponsorshipsAsMaintainer` node.
    ///
    /// Nodes without a tier or sponsor entity yield `None`.
    pub fn normalize(&self, raw: &RawSponsorship) -> Option<Sponsorship> {
        let tier = raw.tier.as_ref()?;
        let entity = raw.sponsor_entity.as_ref()?;

        let monthly_dollars = if raw.is_active {
            tier.monthly_price_in_dollars
        } else if tier.is_one_time && self.prorate_onetime {
            current_tier_dollars(
                self.now,
                raw.created_at,
                self.tiers,
                tier.monthly_price_in_dollars,
            )
        } else {
            INACTIVE_MONTHLY_DOLLARS
        };

        Some(Sponsorship {
            sponsor: normalize_entity(entity),
            is_one_time: tier.is_one_time,
            monthly_dollars: monthly_dollars as f64,
            privacy_level: raw.privacy_level,
            tier_name: tier.name.clone(),
            created_at: raw.created_at,
        })
    }
}

/// Normalize one `sponsorshipsAsSponsor` node.
///
/// Nodes without a tier or sponsorable yield `None`.
pub fn normalize_sponsoring(raw: &RawSponsorship) -> Option<SponsoringRecord> {
    let tier = raw.tier.as_ref()?;
    let sponsorable = raw.sponsorable.as_ref()?;

    Some(SponsoringRecord {
        sponsorable: normalize_entity(sponsorable),
        monthly_dollars: tier.monthly_price_in_dollars,
        monthly_cents: tier.monthly_price_in_cents,
        tier_name: tier.name.clone(),
        is_one_time: tier.is_one_time,
        privacy_level: raw.privacy_level,
        created_at: raw.created_at,
        is_active: raw.is_active,
        raw: raw.clone(),
    })
}
