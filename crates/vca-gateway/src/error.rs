use thiserror::Error;

/// Errors returned by the content gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status. `detail` is the
    /// server-provided message from a `{"detail": ...}` body, and `None` when
    /// the body carried none.
    #[error(
        "gateway rejected request ({status}): {}",
        .detail.as_deref().unwrap_or("no detail provided")
    )]
    Rejected {
        status: u16,
        detail: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// An AI endpoint answered successfully but without a usable payload.
    #[error("empty payload from {context}")]
    EmptyPayload { context: String },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("limit {limit} outside accepted range 1..=100")]
    InvalidLimit { limit: u32 },
}

impl GatewayError {
    /// Server-provided detail for a rejected request, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
