pub mod app_config;
pub mod config;
pub mod content;
pub mod insight;
pub mod scrape;
pub mod stats;
mod timestamp;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{ContentItem, ContentType, EngagementMetrics, Platform, PlatformFilter};
pub use insight::{AnalysisResult, ContentBrief};
pub use scrape::{ScrapeRequest, ScrapeResponse};
pub use stats::SummaryStats;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}
