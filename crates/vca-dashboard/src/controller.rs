//! Query/Filter Controller.
//!
//! Composes the platform and minimum-score filters into list requests, runs
//! free-text searches, and owns the resulting item list together with the
//! derived [`SummaryStats`].

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use vca_core::{ContentItem, SummaryStats};
use vca_gateway::{ContentGateway, ContentQuery, GatewayError};

use crate::notice::{Notice, Notifier};

/// Loading indicator for joined operations.
///
/// Counts entered sections, so overlapping reloads keep the indicator on
/// until the last of them has finished.
#[derive(Debug, Default)]
pub struct LoadingFlag {
    active: AtomicUsize,
}

impl LoadingFlag {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }

    /// Runs `a` and `b` concurrently and stays loading until both have
    /// completed, whatever order they finish in.
    pub async fn run_joined<A, B>(&self, a: A, b: B) -> (A::Output, B::Output)
    where
        A: Future,
        B: Future,
    {
        let _section = LoadingSection::enter(self);
        tokio::join!(a, b)
    }
}

struct LoadingSection<'a>(&'a LoadingFlag);

impl<'a> LoadingSection<'a> {
    fn enter(flag: &'a LoadingFlag) -> Self {
        flag.active.fetch_add(1, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingSection<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

struct ControllerState {
    filter: ContentQuery,
    items: Vec<ContentItem>,
    stats: SummaryStats,
    analyses: u64,
    briefs: u64,
    /// Bumped whenever a list or search request is issued. A response is
    /// applied only if no newer request was issued after it.
    generation: u64,
}

impl ControllerState {
    fn rebuild_stats(&mut self) {
        self.stats = SummaryStats::derive(&self.items, self.analyses, self.briefs, Utc::now());
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

pub struct QueryController {
    gateway: Arc<dyn ContentGateway>,
    notifier: Notifier,
    loading: LoadingFlag,
    state: Mutex<ControllerState>,
}

impl QueryController {
    pub fn new(gateway: Arc<dyn ContentGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            loading: LoadingFlag::default(),
            state: Mutex::new(ControllerState {
                filter: ContentQuery::default(),
                items: Vec::new(),
                stats: SummaryStats::empty(Utc::now()),
                analyses: 0,
                briefs: 0,
                generation: 0,
            }),
        }
    }

    /// Fetches the list for the current filter and replaces the item list
    /// with the response verbatim. On failure the list is cleared.
    pub async fn load(&self) {
        let (query, generation) = {
            let mut state = self.lock();
            (state.filter, state.next_generation())
        };
        tracing::debug!(
            platform = ?query.platform,
            min_viral_score = query.min_viral_score,
            "loading content"
        );
        let result = self.gateway.list_content(&query).await;
        self.apply(generation, result, "list");
    }

    /// Runs a text search. A blank query falls back to [`QueryController::load`]
    /// with the current filter; otherwise platform and score filters are not
    /// applied.
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.load().await;
            return;
        }
        let generation = self.lock().next_generation();
        tracing::debug!(query, "searching content");
        let result = self.gateway.search_content(query).await;
        self.apply(generation, result, "search");
    }

    /// Recomputes the summary snapshot from the current list and the
    /// session counters.
    pub fn refresh_stats(&self) {
        self.lock().rebuild_stats();
    }

    /// Loads content and refreshes stats together under the loading flag.
    pub async fn reload(&self) {
        self.loading
            .run_joined(self.load(), async { self.refresh_stats() })
            .await;
    }

    /// Replaces the filter and reloads. A negative or non-finite minimum
    /// score is treated as zero.
    pub async fn set_filter(&self, filter: ContentQuery) {
        let min_viral_score = if filter.min_viral_score.is_finite() {
            filter.min_viral_score.max(0.0)
        } else {
            0.0
        };
        self.lock().filter = ContentQuery {
            platform: filter.platform,
            min_viral_score,
        };
        self.reload().await;
    }

    #[must_use]
    pub fn filter(&self) -> ContentQuery {
        self.lock().filter
    }

    #[must_use]
    pub fn items(&self) -> Vec<ContentItem> {
        self.lock().items.clone()
    }

    #[must_use]
    pub fn stats(&self) -> SummaryStats {
        self.lock().stats.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Counts a completed analysis for this session.
    pub fn record_analysis(&self) {
        let mut state = self.lock();
        state.analyses += 1;
        state.rebuild_stats();
    }

    /// Counts a generated brief for this session.
    pub fn record_brief(&self) {
        let mut state = self.lock();
        state.briefs += 1;
        state.rebuild_stats();
    }

    fn apply(
        &self,
        generation: u64,
        result: Result<Vec<ContentItem>, GatewayError>,
        source: &'static str,
    ) {
        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(source, "discarding superseded response");
            return;
        }

        let failure = match result {
            Ok(items) => {
                tracing::debug!(source, count = items.len(), "content list replaced");
                state.items = items;
                None
            }
            Err(e) => {
                tracing::warn!(source, error = %e, "failed to fetch content");
                state.items.clear();
                Some(e.to_string())
            }
        };
        state.rebuild_stats();
        drop(state);

        if let Some(reason) = failure {
            self.notifier.notify(Notice::ContentUnavailable { reason });
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
