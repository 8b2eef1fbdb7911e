//! Tier-month proration for lapsed one-time sponsorships.
//!
//! A one-time payment is treated as a budget spent month by month on the
//! account owner's tier catalog, most expensive tier first. Whatever tier
//! the current month falls in is the sponsorship's effective level.

use chrono::{DateTime, Datelike, Utc};

use crate::types::{Tier, INACTIVE_MONTHLY_DOLLARS};

/// Tier catalog restricted to positive prices, sorted by price descending.
///
/// The allocator relies on this ordering, so the only way to build one is
/// from a catalog that gets filtered and sorted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProrationTiers(Vec<Tier>);

impl ProrationTiers {
    pub fn from_catalog(catalog: &[Tier]) -> Self {
        let mut tiers: Vec<Tier> = catalog
            .iter()
            .filter(|tier| tier.monthly_dollars > 0)
            .cloned()
            .collect();
        tiers.sort_by(|a, b| b.monthly_dollars.cmp(&a.monthly_dollars));
        Self(tiers)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.0.iter()
    }
}

/// Calendar months between two instants; day-of-month is ignored.
pub fn month_difference(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let years = i64::from(end.year()) - i64::from(start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    years * 12 + months
}

/// Monthly level a one-time sponsorship still funds at `now`.
///
/// Walks the tiers most expensive first, spending whole months of
/// `monthly_dollars` at each. Returns the price of the tier whose funded
/// window covers the elapsed months, or [`INACTIVE_MONTHLY_DOLLARS`] once
/// the budget is exhausted before reaching the current month.
pub fn current_tier_dollars(
    now: DateTime<Utc>,
    sponsored_at: DateTime<Utc>,
    tiers: &ProrationTiers,
    monthly_dollars: i64,
) -> i64 {
    let elapsed = month_difference(sponsored_at, now);
    let mut budget = monthly_dollars;
    let mut accounted = 0i64;

    for tier in tiers.iter() {
        let price = tier.monthly_dollars;
        let months_at_tier = budget.div_euclid(price);
        if months_at_tier == 0 {
            continue;
        }
        if accounted + months_at_tier > elapsed {
            return price;
        }
        budget -= months_at_tier * price;
        accounted += months_at_tier;
    }

    INACTIVE_MONTHLY_DOLLARS
}
