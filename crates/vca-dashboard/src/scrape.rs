//! Scrape Request Builder.
//!
//! Turns the scrape form into a [`ScrapeRequest`], submits it, and schedules
//! a content refresh once the store has had time to settle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use vca_core::scrape::SCRAPE_LIMIT_RANGE;
use vca_core::{Platform, ScrapeRequest};
use vca_gateway::{ContentGateway, GatewayError};

use crate::controller::QueryController;
use crate::notice::{Notice, Notifier};

/// Keywords used when the form provides none.
pub const DEFAULT_KEYWORDS: [&str; 2] = ["viral", "trending"];

/// Community used when the subject has no suggestion list.
pub const FALLBACK_SUBREDDIT: &str = "programming";

/// Suggested communities per subject; the first entry is the default.
pub const SUBREDDITS_BY_SUBJECT: &[(&str, &[&str])] = &[
    (
        "tech",
        &[
            "programming",
            "webdev",
            "MachineLearning",
            "technology",
            "learnprogramming",
            "Python",
            "javascript",
            "reactjs",
        ],
    ),
    (
        "business",
        &[
            "entrepreneur",
            "startups",
            "business",
            "marketing",
            "investing",
            "stocks",
            "finance",
        ],
    ),
    (
        "lifestyle",
        &[
            "LifeProTips",
            "getmotivated",
            "productivity",
            "selfimprovement",
            "fitness",
            "health",
        ],
    ),
    (
        "entertainment",
        &[
            "movies",
            "television",
            "gaming",
            "music",
            "books",
            "netflix",
            "entertainment",
        ],
    ),
    (
        "science",
        &[
            "science",
            "askscience",
            "space",
            "Physics",
            "chemistry",
            "biology",
            "futurology",
        ],
    ),
    (
        "news",
        &["worldnews", "news", "politics", "UpliftingNews", "nottheonion"],
    ),
    (
        "creative",
        &[
            "Art",
            "Design",
            "photography",
            "writing",
            "DIY",
            "crafts",
            "CreativeWriting",
        ],
    ),
    (
        "travel",
        &["travel", "solotravel", "backpacking", "digitalnomad", "EarthPorn"],
    ),
    (
        "food",
        &[
            "food",
            "cooking",
            "recipes",
            "MealPrepSunday",
            "FoodPorn",
            "AskCulinary",
        ],
    ),
    (
        "beauty",
        &[
            "MakeupAddiction",
            "SkincareAddiction",
            "beauty",
            "Hair",
            "Nails",
        ],
    ),
];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no platforms selected")]
    NoPlatforms,

    #[error("limit {limit} outside accepted range 1..=100")]
    LimitOutOfRange { limit: u32 },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Raw scrape form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeForm {
    pub platforms: Vec<Platform>,
    /// Comma-separated keywords as typed.
    pub raw_keywords: String,
    pub limit: u32,
    /// Subject used to pick a default community for the forum platform.
    pub subreddit_subject: String,
    /// Explicit community; blank means "use the subject default".
    pub subreddit_override: Option<String>,
    pub time_range: Option<String>,
}

impl Default for ScrapeForm {
    fn default() -> Self {
        Self {
            platforms: vec![Platform::Reddit],
            raw_keywords: String::new(),
            limit: 20,
            subreddit_subject: "tech".to_owned(),
            subreddit_override: None,
            time_range: None,
        }
    }
}

impl ScrapeForm {
    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.platforms.is_empty() && SCRAPE_LIMIT_RANGE.contains(&self.limit)
    }
}

/// Splits comma-separated keywords, trimming each and dropping empty
/// entries. Falls back to [`DEFAULT_KEYWORDS`] when nothing remains.
#[must_use]
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let keywords: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_owned)
        .collect();
    if keywords.is_empty() {
        DEFAULT_KEYWORDS.iter().map(|k| (*k).to_owned()).collect()
    } else {
        keywords
    }
}

/// Effective forum community: the override when non-blank, otherwise the
/// first suggestion for `subject`, otherwise [`FALLBACK_SUBREDDIT`].
#[must_use]
pub fn resolve_subreddit(subject: &str, override_name: Option<&str>) -> String {
    if let Some(name) = override_name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_owned();
    }
    SUBREDDITS_BY_SUBJECT
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(subject.trim()))
        .and_then(|(_, subs)| subs.first())
        .copied()
        .unwrap_or(FALLBACK_SUBREDDIT)
        .to_owned()
}

/// Outcome of an accepted scrape.
#[derive(Debug)]
pub struct ScrapeReceipt {
    pub content_count: u64,
    /// Delayed reload of the controller. Detached if dropped.
    pub refresh: JoinHandle<()>,
}

pub struct ScrapeBuilder {
    gateway: Arc<dyn ContentGateway>,
    controller: Arc<QueryController>,
    notifier: Notifier,
    refresh_delay: Duration,
    submitting: AtomicUsize,
}

impl ScrapeBuilder {
    pub fn new(
        gateway: Arc<dyn ContentGateway>,
        controller: Arc<QueryController>,
        notifier: Notifier,
        refresh_delay: Duration,
    ) -> Self {
        Self {
            gateway,
            controller,
            notifier,
            refresh_delay,
            submitting: AtomicUsize::new(0),
        }
    }

    /// Validates `form` and assembles the request without touching the
    /// network. Duplicate platforms are collapsed, keeping first occurrence.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::NoPlatforms`] if no platform is selected.
    /// - [`ScrapeError::LimitOutOfRange`] if the limit is outside `1..=100`.
    pub fn build_request(form: &ScrapeForm) -> Result<ScrapeRequest, ScrapeError> {
        if form.platforms.is_empty() {
            return Err(ScrapeError::NoPlatforms);
        }
        if !SCRAPE_LIMIT_RANGE.contains(&form.limit) {
            return Err(ScrapeError::LimitOutOfRange { limit: form.limit });
        }

        let mut platforms = Vec::with_capacity(form.platforms.len());
        for p in &form.platforms {
            if !platforms.contains(p) {
                platforms.push(*p);
            }
        }

        let reddit_subreddit = if platforms.iter().any(|p| p.is_forum()) {
            let override_name = form.subreddit_override.as_deref();
            Some(resolve_subreddit(&form.subreddit_subject, override_name))
        } else {
            None
        };

        Ok(ScrapeRequest {
            platforms,
            keywords: parse_keywords(&form.raw_keywords),
            limit: form.limit,
            reddit_subreddit,
            time_range: form
                .time_range
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
        })
    }

    /// Builds and submits the scrape. On success reports the count and
    /// schedules a reload after the settle delay. On failure reports the
    /// server's detail verbatim. Never retries.
    ///
    /// [`ScrapeBuilder::is_submitting`] stays `true` until the gateway call
    /// returns or this future is dropped.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`ScrapeBuilder::build_request`]
    /// (nothing is sent), or [`ScrapeError::Gateway`] if the submission
    /// failed.
    pub async fn build_and_submit(&self, form: &ScrapeForm) -> Result<ScrapeReceipt, ScrapeError> {
        let request = Self::build_request(form).inspect_err(|e| {
            tracing::debug!(error = %e, "scrape form rejected locally");
        })?;

        let result = {
            let _submitting = Submitting::enter(&self.submitting);
            self.gateway.scrape(&request).await
        };

        match result {
            Ok(response) => {
                tracing::info!(
                    content_count = response.content_count,
                    platforms = ?request.platforms,
                    "scrape completed"
                );
                self.notifier.notify(Notice::ScrapeCompleted {
                    content_count: response.content_count,
                });
                let refresh = self.schedule_refresh();
                Ok(ScrapeReceipt {
                    content_count: response.content_count,
                    refresh,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "scrape failed");
                self.notifier.notify(Notice::ScrapeFailed {
                    detail: e.detail().map(str::to_owned),
                });
                Err(e.into())
            }
        }
    }

    /// `true` while a submission is awaiting the gateway.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst) > 0
    }

    fn schedule_refresh(&self) -> JoinHandle<()> {
        let controller = Arc::clone(&self.controller);
        let delay = self.refresh_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.reload().await;
        })
    }
}

/// Holds one count in the submit counter until dropped.
struct Submitting<'a>(&'a AtomicUsize);

impl<'a> Submitting<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
