//! Sponsee-mode aggregation.
//!
//! Collapses a sponsor's full sponsorship history into one entry per
//! sponsorable, ranked by the lifetime amount given to it.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::warn;

use crate::types::{SponsoringRecord, Sponsorship};

/// Everything known about one sponsorable across its history.
#[derive(Debug, Clone, PartialEq)]
pub struct SponsoringSummary {
    /// Most recent record by `created_at`; the first one seen wins ties.
    pub latest: SponsoringRecord,
    /// Earliest `created_at` across all records.
    pub first_created_at: DateTime<Utc>,
    /// True only when every record was one-time.
    pub is_one_time: bool,
    pub records: Vec<SponsoringRecord>,
}

impl SponsoringSummary {
    fn new(record: SponsoringRecord) -> Self {
        Self {
            latest: record.clone(),
            first_created_at: record.created_at,
            is_one_time: record.is_one_time,
            records: vec![record],
        }
    }

    fn absorb(&mut self, record: SponsoringRecord) {
        if record.created_at > self.latest.created_at {
            self.latest = record.clone();
        }
        if record.created_at < self.first_created_at {
            self.first_created_at = record.created_at;
        }
        self.is_one_time &= record.is_one_time;
        self.records.push(record);
    }
}

/// Group records by sponsorable login, keeping first-seen group order.
pub fn group_by_sponsorable(
    records: impl IntoIterator<Item = SponsoringRecord>,
) -> IndexMap<String, SponsoringSummary> {
    let mut groups: IndexMap<String, SponsoringSummary> = IndexMap::new();

    for record in records {
        match groups.get_mut(&record.sponsorable.login) {
            Some(summary) => summary.absorb(record),
            None => {
                groups.insert(
                    record.sponsorable.login.clone(),
                    SponsoringSummary::new(record),
                );
            }
        }
    }

    groups
}

/// Convert cents to dollars.
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Emit one sponsorship per group, carrying its lifetime total as `monthly_dollars`.
///
/// Identity, tier name and privacy come from the latest record; `created_at`
/// is the first time this account sponsored the sponsorable.
pub fn merge_lifetime_totals(
    groups: IndexMap<String, SponsoringSummary>,
    totals_in_cents: &HashMap<String, i64>,
) -> Vec<Sponsorship> {
    groups
        .into_iter()
        .map(|(login, summary)| {
            let cents = totals_in_cents.get(&login).copied().unwrap_or_else(|| {
                warn!(sponsorable = %login, "No lifetime total for sponsorable, using 0");
                0
            });
            let latest = summary.latest;

            Sponsorship {
                sponsor: latest.sponsorable,
                is_one_time: summary.is_one_time,
                monthly_dollars: cents_to_dollars(cents),
                privacy_level: latest.privacy_level,
                tier_name: latest.tier_name,
                created_at: summary.first_created_at,
            }
        })
        .collect()
}
