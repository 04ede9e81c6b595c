use std::time::Duration;

use thiserror::Error;

/// Anything that can go wrong inside one provider adapter. Never leaves the
/// adapter: it is rendered into `SourceResult::Error`.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("API rate limit exceeded")]
    RateLimited,
    #[error("Max retries exceeded for rate limit")]
    RetriesExhausted,
    #[error("{0}")]
    Api(String),
    #[error("Unexpected response format")]
    UnexpectedFormat,
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid symbol format. Expected format: EURUSD")]
    InvalidSymbol(String),
    #[error("Pair {0} not available")]
    UnsupportedPair(String),
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),
}

impl ProviderError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited)
            || matches!(self, Self::Status { status: 429 | 418, .. })
    }
}
