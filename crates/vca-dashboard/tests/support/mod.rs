//! Scripted in-process gateway for orchestration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use vca_core::{
    AnalysisResult, ContentBrief, ContentItem, ContentType, EngagementMetrics, Platform,
    ScrapeRequest, ScrapeResponse,
};
use vca_gateway::{ContentGateway, ContentQuery, GatewayError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ContentQuery),
    Search(String),
    Top(u32),
    Scrape(ScrapeRequest),
    Analyze(String),
    Brief(String),
    Health,
}

pub fn item(id: &str, platform: Platform) -> ContentItem {
    ContentItem {
        id: id.to_owned(),
        platform,
        title: format!("Item {id}"),
        content_text: None,
        url: format!("https://example.com/{id}"),
        author: None,
        published_date: None,
        scraped_date: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        engagement_metrics: EngagementMetrics::default(),
        viral_score: 50.0,
        content_type: ContentType::Post,
        tags: vec!["growth".to_owned()],
        thumbnail_url: None,
    }
}

pub fn rejected(status: u16, detail: &str) -> GatewayError {
    GatewayError::Rejected {
        status,
        detail: Some(detail.to_owned()),
    }
}

/// A failure without a server-provided detail.
pub fn transport_like() -> GatewayError {
    GatewayError::Deserialize {
        context: "test".to_owned(),
        source: serde_json::from_str::<()>("garbage").unwrap_err(),
    }
}

#[derive(Default)]
pub struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    list_items: Mutex<Vec<ContentItem>>,
    search_items: Mutex<Vec<ContentItem>>,
    list_fails: AtomicBool,
    list_delay: Mutex<Duration>,
    search_delay: Mutex<Duration>,
    scrape_delay: Mutex<Duration>,
    scrape_result: Mutex<Option<Result<u64, GatewayError>>>,
    analyze_script: Mutex<VecDeque<(Duration, bool)>>,
    brief_script: Mutex<VecDeque<(Duration, bool)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<ContentItem>) -> Self {
        let gw = Self::default();
        *gw.list_items.lock().unwrap() = items;
        gw
    }

    pub fn set_list_items(&self, items: Vec<ContentItem>) {
        *self.list_items.lock().unwrap() = items;
    }

    pub fn set_search_items(&self, items: Vec<ContentItem>) {
        *self.search_items.lock().unwrap() = items;
    }

    pub fn fail_list(&self, fail: bool) {
        self.list_fails.store(fail, Ordering::SeqCst);
    }

    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = delay;
    }

    pub fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.lock().unwrap() = delay;
    }

    pub fn set_scrape_delay(&self, delay: Duration) {
        *self.scrape_delay.lock().unwrap() = delay;
    }

    pub fn set_scrape_result(&self, result: Result<u64, GatewayError>) {
        *self.scrape_result.lock().unwrap() = Some(result);
    }

    /// Queues the behaviour of the next analyze call: delay, then success
    /// when `ok`.
    pub fn script_analyze(&self, delay: Duration, ok: bool) {
        self.analyze_script.lock().unwrap().push_back((delay, ok));
    }

    pub fn script_brief(&self, delay: Duration, ok: bool) {
        self.brief_script.lock().unwrap().push_back((delay, ok));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ContentGateway for FakeGateway {
    async fn list_content(&self, query: &ContentQuery) -> Result<Vec<ContentItem>, GatewayError> {
        self.record(Call::List(*query));
        let delay = *self.list_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        if self.list_fails.load(Ordering::SeqCst) {
            return Err(rejected(500, "store unavailable"));
        }
        Ok(self.list_items.lock().unwrap().clone())
    }

    async fn search_content(&self, query: &str) -> Result<Vec<ContentItem>, GatewayError> {
        self.record(Call::Search(query.to_owned()));
        let delay = *self.search_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        Ok(self.search_items.lock().unwrap().clone())
    }

    async fn top_content(&self, limit: u32) -> Result<Vec<ContentItem>, GatewayError> {
        self.record(Call::Top(limit));
        Ok(self.list_items.lock().unwrap().clone())
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, GatewayError> {
        self.record(Call::Scrape(request.clone()));
        let delay = *self.scrape_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        match self.scrape_result.lock().unwrap().take() {
            Some(Ok(content_count)) => Ok(ScrapeResponse { content_count }),
            Some(Err(e)) => Err(e),
            None => Ok(ScrapeResponse { content_count: 0 }),
        }
    }

    async fn analyze(&self, id: &str) -> Result<AnalysisResult, GatewayError> {
        self.record(Call::Analyze(id.to_owned()));
        let (delay, ok) = self
            .analyze_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, true));
        tokio::time::sleep(delay).await;
        if !ok {
            return Err(rejected(500, "Analysis failed"));
        }
        Ok(AnalysisResult::from_value(serde_json::json!({
            "content_id": id,
            "key_insights": ["insight"]
        }))
        .unwrap())
    }

    async fn generate_brief(&self, id: &str) -> Result<ContentBrief, GatewayError> {
        self.record(Call::Brief(id.to_owned()));
        let (delay, ok) = self
            .brief_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((Duration::ZERO, true));
        tokio::time::sleep(delay).await;
        if !ok {
            return Err(rejected(500, "Brief generation failed"));
        }
        Ok(ContentBrief::from_value(serde_json::json!({
            "original_content_id": id,
            "hook_suggestions": ["hook"]
        }))
        .unwrap())
    }

    async fn health(&self) -> Result<String, GatewayError> {
        self.record(Call::Health);
        Ok("healthy".to_owned())
    }
}
