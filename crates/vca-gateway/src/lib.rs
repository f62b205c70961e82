//! Remote content gateway: the request/response boundary to the content
//! store, scraper and AI services.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::HttpGateway;
pub use error::GatewayError;
pub use gateway::{ContentGateway, ContentQuery, TOP_LIMIT_RANGE};
