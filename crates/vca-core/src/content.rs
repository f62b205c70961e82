use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Number of tags shown next to an item before the list is truncated.
pub const DISPLAY_TAG_LIMIT: usize = 3;

/// Source platform an item was scraped from.
///
/// `Reddit` is the forum platform, `Youtube` the video platform, and
/// `Google`/`Bing` are the search-engine variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    Youtube,
    Google,
    Bing,
}

impl Platform {
    /// Wire name used in query strings and request bodies.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Reddit => "reddit",
            Platform::Youtube => "youtube",
            Platform::Google => "google",
            Platform::Bing => "bing",
        }
    }

    /// Returns `true` for the forum platform, which is scoped by community
    /// rather than by keyword.
    #[must_use]
    pub fn is_forum(self) -> bool {
        matches!(self, Platform::Reddit)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reddit" => Ok(Platform::Reddit),
            "youtube" => Ok(Platform::Youtube),
            "google" => Ok(Platform::Google),
            "bing" => Ok(Platform::Bing),
            _ => Err(CoreError::UnknownPlatform(s.to_owned())),
        }
    }
}

/// Platform part of a list filter: either every platform or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    /// The platform to send to the gateway, or `None` when unfiltered.
    #[must_use]
    pub fn platform(self) -> Option<Platform> {
        match self {
            PlatformFilter::All => None,
            PlatformFilter::Only(p) => Some(p),
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PlatformFilter::All);
        }
        s.parse().map(PlatformFilter::Only)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Video,
    Article,
    Tweet,
}

/// Platform-dependent engagement counters. Every field is optional because
/// each platform only reports a subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub comments: Option<u64>,
    #[serde(default)]
    pub shares: Option<u64>,
    #[serde(default)]
    pub upvotes: Option<u64>,
    #[serde(default)]
    pub downvotes: Option<u64>,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
}

impl EngagementMetrics {
    /// One-line engagement summary with the counters that matter for
    /// `platform`: upvotes and comments for the forum, views/likes/comments
    /// for video, views for search results.
    #[must_use]
    pub fn summary(&self, platform: Platform) -> String {
        let n = |v: Option<u64>| v.unwrap_or(0);
        match platform {
            Platform::Reddit => format!(
                "{} upvotes | {} comments",
                n(self.upvotes),
                n(self.comments)
            ),
            Platform::Youtube => format!(
                "{} views | {} likes | {} comments",
                n(self.views),
                n(self.likes),
                n(self.comments)
            ),
            Platform::Google | Platform::Bing => format!("{} views", n(self.views)),
        }
    }
}

/// A single scraped item as returned by the content store.
///
/// Items are never mutated client-side; the dashboard only filters and
/// stores whole items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub platform: Platform,
    pub title: String,
    #[serde(default)]
    pub content_text: Option<String>,
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, with = "crate::timestamp::optional")]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(with = "crate::timestamp")]
    pub scraped_date: DateTime<Utc>,
    #[serde(default)]
    pub engagement_metrics: EngagementMetrics,
    /// Viral score in `[0, 100]`.
    #[serde(default)]
    pub viral_score: f64,
    pub content_type: ContentType,
    /// Free-form tags. Order is significant for truncated display.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl ContentItem {
    /// The leading tags shown in compact listings.
    #[must_use]
    pub fn display_tags(&self) -> &[String] {
        let end = self.tags.len().min(DISPLAY_TAG_LIMIT);
        &self.tags[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_json() -> serde_json::Value {
        serde_json::json!({
            "id": "abc",
            "platform": "youtube",
            "title": "How I built it",
            "content_text": "",
            "url": "https://youtube.com/watch?v=abc",
            "author": "someone",
            "published_date": null,
            "scraped_date": "2025-03-01T10:15:30.123456",
            "engagement_metrics": { "views": 1200, "likes": 80, "comments": 5 },
            "viral_score": 72.5,
            "content_type": "video",
            "tags": ["a", "b", "c", "d"],
            "thumbnail_url": ""
        })
    }

    #[test]
    fn deserializes_backend_item_with_naive_timestamp() {
        let item: ContentItem = serde_json::from_value(item_json()).unwrap();
        assert_eq!(item.platform, Platform::Youtube);
        assert_eq!(item.content_type, ContentType::Video);
        assert!(item.published_date.is_none());
        assert_eq!(
            item.scraped_date.to_rfc3339(),
            "2025-03-01T10:15:30.123456+00:00"
        );
        assert_eq!(item.engagement_metrics.views, Some(1200));
        assert_eq!(item.engagement_metrics.upvotes, None);
    }

    #[test]
    fn display_tags_truncates_to_three_in_order() {
        let item: ContentItem = serde_json::from_value(item_json()).unwrap();
        assert_eq!(item.display_tags(), ["a", "b", "c"]);
    }

    #[test]
    fn display_tags_handles_short_lists() {
        let mut item: ContentItem = serde_json::from_value(item_json()).unwrap();
        item.tags.truncate(1);
        assert_eq!(item.display_tags(), ["a"]);
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("Reddit".parse::<Platform>().unwrap(), Platform::Reddit);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_filter_parses_all() {
        assert_eq!(
            "all".parse::<PlatformFilter>().unwrap(),
            PlatformFilter::All
        );
        assert_eq!(
            "bing".parse::<PlatformFilter>().unwrap(),
            PlatformFilter::Only(Platform::Bing)
        );
    }

    #[test]
    fn engagement_summary_depends_on_platform() {
        let metrics = EngagementMetrics {
            views: Some(10),
            likes: Some(2),
            comments: Some(3),
            upvotes: Some(40),
            ..EngagementMetrics::default()
        };
        assert_eq!(metrics.summary(Platform::Reddit), "40 upvotes | 3 comments");
        assert_eq!(
            metrics.summary(Platform::Youtube),
            "10 views | 2 likes | 3 comments"
        );
        assert_eq!(metrics.summary(Platform::Bing), "10 views");
    }
}
