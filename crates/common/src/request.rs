use thiserror::Error;

pub const DEFAULT_INTERVAL: &str = "15min";

pub const SUPPORTED_INTERVALS: [&str; 7] =
    ["1min", "5min", "15min", "30min", "1hour", "4hour", "1day"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Symbol must not be empty")]
    EmptySymbol,
    #[error("Invalid symbol '{0}': expected 3-12 letters or digits, e.g. EURUSD or EUR/USD")]
    InvalidSymbol(String),
    #[error("Unsupported interval '{0}': expected one of 1min, 5min, 15min, 30min, 1hour, 4hour, 1day")]
    UnsupportedInterval(String),
}

/// A validated aggregation request. The aggregation core is only ever
/// reached with one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRequest {
    pub symbol: String,
    pub interval: String,
}

impl SignalRequest {
    pub fn new(symbol: &str, interval: Option<&str>) -> Result<Self, ValidationError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let letters = symbol.chars().filter(|c| *c != '/').count();
        let slashes = symbol.len() - letters;
        let well_formed = symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '/')
            && slashes <= 1
            && !symbol.starts_with('/')
            && !symbol.ends_with('/')
            && (3..=12).contains(&letters);
        if !well_formed {
            return Err(ValidationError::InvalidSymbol(symbol));
        }

        let interval = interval
            .map(|i| i.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_INTERVAL.to_string());
        if !SUPPORTED_INTERVALS.contains(&interval.as_str()) {
            return Err(ValidationError::UnsupportedInterval(interval));
        }

        Ok(Self { symbol, interval })
    }
}
