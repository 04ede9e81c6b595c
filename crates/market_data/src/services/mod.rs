pub mod alphavantage_service;
pub mod tradingview_service;
pub mod truefx_service;
pub mod twelvedata_service;

use std::sync::Arc;

use common::config::AppConfig;
use common::sources::SignalSource;

pub use alphavantage_service::{AlphaVantageService, ExchangeRateSignal};
pub use tradingview_service::TradingViewService;
pub use truefx_service::TrueFxService;
pub use twelvedata_service::{QuoteSignal, TwelveDataService};

use crate::error::ProviderError;
use crate::remote::HttpClient;

/// Every adapter wired from config, in provider order. They share one
/// connection pool.
pub fn default_sources(config: &AppConfig) -> Result<Vec<Arc<dyn SignalSource>>, ProviderError> {
    Ok(sources_with_client(config, &HttpClient::new()?))
}

/// Same as `default_sources`, over a pool the caller also uses elsewhere.
pub fn sources_with_client(config: &AppConfig, http: &HttpClient) -> Vec<Arc<dyn SignalSource>> {
    vec![
        Arc::new(TradingViewService::new(
            http.clone(),
            config.tradingview_scan_url.clone(),
        )),
        Arc::new(AlphaVantageService::new(
            http.clone(),
            config.alpha_vantage_url.clone(),
            config.alpha_vantage_api_key.clone(),
        )),
        Arc::new(TwelveDataService::new(
            http.clone(),
            config.twelve_data_url.clone(),
            config.twelve_data_api_key.clone(),
        )),
        Arc::new(TrueFxService::new()),
    ]
}

#[cfg(test)]
mod tests {
    use common::models::Provider;

    use super::*;

    #[test]
    fn sources_follow_provider_order() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let sources = default_sources(&config).unwrap();

        let providers: Vec<Provider> = sources.iter().map(|s| s.provider()).collect();
        assert_eq!(providers, Provider::ALL.to_vec());
    }

    #[test]
    fn shared_client_wires_every_source() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let http = HttpClient::new().unwrap();

        let sources = sources_with_client(&config, &http);
        let providers: Vec<Provider> = sources.iter().map(|s| s.provider()).collect();
        assert_eq!(providers, Provider::ALL.to_vec());
    }
}
