use async_trait::async_trait;

use crate::models::{Provider, SourceResult};

/// The trait every provider adapter implements.
///
/// `fetch` must not fail past its own boundary: network, parsing and
/// rate-limit problems come back as `SourceResult::Error`.
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Which provider this adapter speaks for.
    fn provider(&self) -> Provider;

    async fn fetch(&self, symbol: &str, interval: &str) -> SourceResult;
}
