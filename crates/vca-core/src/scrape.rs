use serde::{Deserialize, Serialize};

use crate::content::Platform;

/// Smallest and largest result-count limit the scraper accepts.
pub const SCRAPE_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Body of `POST /scrape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub platforms: Vec<Platform>,
    pub keywords: Vec<String>,
    pub limit: u32,
    /// Community to scrape when the forum platform is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reddit_subreddit: Option<String>,
    /// Look-back window such as `"24h"`; the scraper defaults it when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
}

/// Successful `POST /scrape` response. Only the count is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScrapeResponse {
    pub content_count: u64,
}
