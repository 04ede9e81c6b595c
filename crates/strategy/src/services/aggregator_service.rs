use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::models::{AggregatedResponse, NormalizedSignal, Provider, SourceResult};
use common::sources::SignalSource;
use futures_util::future::join_all;
use tokio::time;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::consensus::calculate_consensus;
use crate::extractor::extract_signal;
use crate::summary::render_summary;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(20);

/// Fans a request out to every source, then reduces the results into one
/// `AggregatedResponse`. Provider failures, timeouts and panics are folded
/// into that provider's `SourceResult::Error`; `aggregate` itself never fails.
pub struct AggregatorService {
    provider_timeout: Duration,
}

impl AggregatorService {
    pub fn new(provider_timeout: Duration) -> Self {
        Self { provider_timeout }
    }

    pub async fn aggregate(
        &self,
        symbol: &str,
        interval: &str,
        sources: &[Arc<dyn SignalSource>],
    ) -> AggregatedResponse {
        let request_id = Uuid::new_v4();
        info!(
            "[{}] Aggregating {} @ {} across {} sources",
            request_id,
            symbol,
            interval,
            sources.len()
        );

        let (providers, handles): (Vec<_>, Vec<_>) = sources
            .iter()
            .map(|source| {
                let provider = source.provider();
                let source = Arc::clone(source);
                let symbol = symbol.to_string();
                let interval = interval.to_string();
                let timeout = self.provider_timeout;

                let handle = tokio::spawn(async move {
                    match time::timeout(timeout, source.fetch(&symbol, &interval)).await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!("[{}] {} timed out after {:?}", request_id, provider, timeout);
                            SourceResult::error(
                                provider,
                                &symbol,
                                format!("Request timed out after {:?}", timeout),
                            )
                        }
                    }
                });

                (provider, handle)
            })
            .unzip();

        let mut results = BTreeMap::new();
        for (provider, outcome) in providers.into_iter().zip(join_all(handles).await) {
            let result = outcome.unwrap_or_else(|e| {
                error!("[{}] {} task failed: {}", request_id, provider, e);
                SourceResult::error(provider, symbol, format!("Provider task failed: {}", e))
            });
            if let Some(message) = result.error_message() {
                debug!("[{}] {} error: {}", request_id, provider, message);
            }
            results.insert(provider, result);
        }

        let response = Self::assemble(symbol, interval, results);
        info!(
            "[{}] {} consensus: {} ({}, {} sources)",
            request_id,
            response.symbol,
            response.consensus.overall_recommendation,
            response.consensus.agreement_level,
            response.consensus.total_sources
        );

        response
    }

    /// Extract, vote and render over completed results. Synchronous and pure
    /// apart from the response timestamp.
    pub fn assemble(
        symbol: &str,
        interval: &str,
        sources: BTreeMap<Provider, SourceResult>,
    ) -> AggregatedResponse {
        let signals: Vec<NormalizedSignal> = Provider::ALL
            .iter()
            .filter_map(|provider| {
                sources
                    .get(provider)
                    .and_then(|result| extract_signal(*provider, result))
            })
            .collect();

        let consensus = calculate_consensus(&signals);
        let summary = render_summary(&sources, &consensus);

        AggregatedResponse {
            symbol: symbol.to_uppercase(),
            timestamp: Utc::now(),
            interval: interval.to_string(),
            sources,
            consensus,
            summary,
        }
    }
}

impl Default for AggregatorService {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use common::models::{AgreementLevel, Recommendation};

    use super::*;

    #[test]
    fn all_failed_sources_yield_no_data() {
        let sources: BTreeMap<Provider, SourceResult> = Provider::ALL
            .iter()
            .map(|p| (*p, SourceResult::error(*p, "eurusd", "Request failed")))
            .collect();

        let response = AggregatorService::assemble("eurusd", "15min", sources);

        assert_eq!(response.symbol, "EURUSD");
        assert_eq!(response.interval, "15min");
        assert_eq!(response.sources.len(), 4);
        assert_eq!(response.consensus.agreement_level, AgreementLevel::NoData);
        assert_eq!(response.consensus.overall_recommendation, Recommendation::Neutral);
        assert!(response.summary.starts_with("Consensus Recommendation: NEUTRAL"));
    }

    #[tokio::test]
    async fn no_sources_still_produce_a_response() {
        let response = AggregatorService::default().aggregate("GBPUSD", "1hour", &[]).await;

        assert!(response.sources.is_empty());
        assert_eq!(response.consensus.total_sources, 0);
    }
}
