//! HTTP implementation of [`ContentGateway`].
//!
//! Wraps `reqwest` with typed response decoding. Non-success statuses are
//! surfaced as [`GatewayError::Rejected`] carrying the server's `detail`
//! message only when the body provides one. Requests are never retried; every
//! retry is user-initiated.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use vca_core::{AnalysisResult, ContentBrief, ContentItem, ScrapeRequest, ScrapeResponse};

use crate::error::GatewayError;
use crate::gateway::{ContentGateway, ContentQuery, TOP_LIMIT_RANGE};

const DEFAULT_USER_AGENT: &str = "vca/0.1 (content-dashboard)";

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for the content service's REST API.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Creates a gateway client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GatewayError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so endpoint segments are
        // appended below any path prefix instead of replacing its last part.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| GatewayError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "expected an absolute http(s) URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Creates a gateway with default timeout and user agent (for tests
    /// against a mock server).
    ///
    /// # Errors
    ///
    /// See [`HttpGateway::new`].
    pub fn with_base_url(base_url: &str) -> Result<Self, GatewayError> {
        Self::new(base_url, 30, DEFAULT_USER_AGENT)
    }

    /// Builds an endpoint URL. Each entry of `segments` becomes exactly one
    /// percent-encoded path segment, so ids containing `/` or `?` cannot
    /// escape their position.
    fn build_url(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends the request, maps non-success statuses to
    /// [`GatewayError::Rejected`], and decodes the body as `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = extract_detail(&body);
            tracing::debug!(
                status = status.as_u16(),
                context,
                detail = detail.as_deref().unwrap_or_default(),
                "gateway rejected request"
            );
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Pulls the human-readable message out of an error body. Accepts
/// `{"detail": "..."}`; structured details are rendered as compact JSON.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl ContentGateway for HttpGateway {
    async fn list_content(&self, query: &ContentQuery) -> Result<Vec<ContentItem>, GatewayError> {
        let url = self.build_url(&["content"], &query.query_pairs());
        tracing::debug!(%url, "listing content");
        self.send_json(self.client.get(url), "GET /content").await
    }

    async fn search_content(&self, query: &str) -> Result<Vec<ContentItem>, GatewayError> {
        let url = self.build_url(&["content", "search"], &[("q", query.to_owned())]);
        tracing::debug!(%url, "searching content");
        self.send_json(self.client.get(url), "GET /content/search")
            .await
    }

    async fn top_content(&self, limit: u32) -> Result<Vec<ContentItem>, GatewayError> {
        if !TOP_LIMIT_RANGE.contains(&limit) {
            return Err(GatewayError::InvalidLimit { limit });
        }
        let url = self.build_url(&["content", "top"], &[("limit", limit.to_string())]);
        self.send_json(self.client.get(url), "GET /content/top")
            .await
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, GatewayError> {
        let url = self.build_url(&["scrape"], &[]);
        tracing::debug!(
            platforms = ?request.platforms,
            keywords = request.keywords.len(),
            limit = request.limit,
            "submitting scrape"
        );
        self.send_json(self.client.post(url).json(request), "POST /scrape")
            .await
    }

    async fn analyze(&self, id: &str) -> Result<AnalysisResult, GatewayError> {
        let url = self.build_url(&["analyze", id], &[]);
        let context = format!("POST /analyze/{id}");
        let value: serde_json::Value = self.send_json(self.client.post(url), &context).await?;
        AnalysisResult::from_value(value).ok_or(GatewayError::EmptyPayload { context })
    }

    async fn generate_brief(&self, id: &str) -> Result<ContentBrief, GatewayError> {
        let url = self.build_url(&["generate-brief", id], &[]);
        let context = format!("POST /generate-brief/{id}");
        let value: serde_json::Value = self.send_json(self.client.post(url), &context).await?;
        ContentBrief::from_value(value).ok_or(GatewayError::EmptyPayload { context })
    }

    async fn health(&self) -> Result<String, GatewayError> {
        let url = self.build_url(&["health"], &[]);
        let body: HealthResponse = self.send_json(self.client.get(url), "GET /health").await?;
        Ok(body.status)
    }
}
