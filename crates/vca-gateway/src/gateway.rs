use async_trait::async_trait;
use vca_core::{
    AnalysisResult, ContentBrief, ContentItem, Platform, PlatformFilter, ScrapeRequest,
    ScrapeResponse,
};

use crate::error::GatewayError;

/// Accepted range for `GET /content/top`.
pub const TOP_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Filter for `GET /content`. The gateway is authoritative: results are not
/// re-filtered client-side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentQuery {
    pub platform: PlatformFilter,
    pub min_viral_score: f64,
}

impl ContentQuery {
    /// Query-string pairs for the list endpoint. `platform` is omitted when
    /// unfiltered and `min_viral_score` is omitted when not positive.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(platform) = self.platform.platform() {
            pairs.push(("platform", platform.as_str().to_owned()));
        }
        if self.min_viral_score > 0.0 {
            pairs.push(("min_viral_score", self.min_viral_score.to_string()));
        }
        pairs
    }

    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform: PlatformFilter::Only(platform),
            min_viral_score: 0.0,
        }
    }
}

/// Request/response boundary to the remote content store, scraper and AI
/// services. Implemented over HTTP by [`crate::HttpGateway`]; tests plug in
/// scripted fakes.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// `GET /content` with optional platform and minimum-score filters.
    async fn list_content(&self, query: &ContentQuery) -> Result<Vec<ContentItem>, GatewayError>;

    /// `GET /content/search?q=`.
    async fn search_content(&self, query: &str) -> Result<Vec<ContentItem>, GatewayError>;

    /// `GET /content/top?limit=`: highest viral scores first.
    async fn top_content(&self, limit: u32) -> Result<Vec<ContentItem>, GatewayError>;

    /// `POST /scrape`.
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, GatewayError>;

    /// `POST /analyze/{id}`.
    async fn analyze(&self, id: &str) -> Result<AnalysisResult, GatewayError>;

    /// `POST /generate-brief/{id}`.
    async fn generate_brief(&self, id: &str) -> Result<ContentBrief, GatewayError>;

    /// `GET /health`. Returns the reported status string.
    async fn health(&self) -> Result<String, GatewayError>;
}
