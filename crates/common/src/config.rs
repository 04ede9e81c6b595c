use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_TWELVE_DATA_URL: &str = "https://api.twelvedata.com";
pub const DEFAULT_TRADINGVIEW_SCAN_URL: &str = "https://scanner.tradingview.com/forex/scan";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 20;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

/// Runtime settings, read from the process environment (and `.env` via dotenvy
/// in the binary).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub alpha_vantage_api_key: String,
    pub twelve_data_api_key: String,
    pub alpha_vantage_url: Url,
    pub twelve_data_url: Url,
    pub tradingview_scan_url: Url,
    pub provider_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |key: &'static str, default: &str| -> Result<Url, ConfigError> {
            let raw = lookup(key).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { key, source })
        };

        let provider_timeout = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        key: "PROVIDER_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        };

        Ok(Self {
            alpha_vantage_api_key: lookup("ALPHA_VANTAGE_API_KEY")
                .unwrap_or_else(|| "demo".to_string()),
            twelve_data_api_key: lookup("TWELVE_DATA_API_KEY")
                .unwrap_or_else(|| "demo".to_string()),
            alpha_vantage_url: url("ALPHA_VANTAGE_BASE_URL", DEFAULT_ALPHA_VANTAGE_URL)?,
            twelve_data_url: url("TWELVE_DATA_BASE_URL", DEFAULT_TWELVE_DATA_URL)?,
            tradingview_scan_url: url("TRADINGVIEW_SCAN_URL", DEFAULT_TRADINGVIEW_SCAN_URL)?,
            provider_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(cfg.alpha_vantage_api_key, "demo");
        assert_eq!(cfg.twelve_data_url.as_str(), "https://api.twelvedata.com/");
        assert_eq!(cfg.provider_timeout, Duration::from_secs(20));
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("TWELVE_DATA_API_KEY", "abc123"),
            ("PROVIDER_TIMEOUT_SECS", "5"),
            ("ALPHA_VANTAGE_BASE_URL", "http://localhost:8080/query"),
        ]))
        .unwrap();

        assert_eq!(cfg.twelve_data_api_key, "abc123");
        assert_eq!(cfg.provider_timeout, Duration::from_secs(5));
        assert_eq!(cfg.alpha_vantage_url.host_str(), Some("localhost"));
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PROVIDER_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("TRADINGVIEW_SCAN_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { key: "TRADINGVIEW_SCAN_URL", .. }));
    }
}
