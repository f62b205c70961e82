use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::{ContentItem, Platform};

/// Derived dashboard summary. Rebuilt from the current item list and the
/// session counters; never persisted.
///
/// `total_analyses` and `total_briefs` count only operations completed in
/// this session, so they under-report after a reload or across sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_content: usize,
    pub total_analyses: u64,
    pub total_briefs: u64,
    pub platform_distribution: BTreeMap<Platform, usize>,
    pub last_updated: DateTime<Utc>,
}

impl SummaryStats {
    #[must_use]
    pub fn derive(
        items: &[ContentItem],
        total_analyses: u64,
        total_briefs: u64,
        now: DateTime<Utc>,
    ) -> Self {
        let mut platform_distribution = BTreeMap::new();
        for item in items {
            *platform_distribution.entry(item.platform).or_insert(0) += 1;
        }
        Self {
            total_content: items.len(),
            total_analyses,
            total_briefs,
            platform_distribution,
            last_updated: now,
        }
    }

    /// Snapshot for an empty list with zeroed counters.
    #[must_use]
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self::derive(&[], 0, 0, now)
    }
}
