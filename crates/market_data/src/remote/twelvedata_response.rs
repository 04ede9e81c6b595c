use std::collections::BTreeMap;

use common::models::PricePoint;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::traits::RemoteResponse;

#[derive(Deserialize, Debug)]
pub struct TimeSeriesResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub code: Option<u16>,
    pub meta: Option<TimeSeriesMeta>,
    pub values: Option<Vec<TimeSeriesValue>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TimeSeriesMeta {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub currency_base: String,
    #[serde(default)]
    pub currency_quote: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(rename(deserialize = "type"), default)]
    pub kind: String,
}

#[derive(Deserialize, Debug)]
pub struct TimeSeriesValue {
    pub datetime: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: Option<String>,
}

/// `/quote` body. Numeric fields arrive as strings.
#[derive(Deserialize, Debug)]
pub struct QuoteResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub code: Option<u16>,
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub close: String,
    #[serde(default)]
    pub previous_close: String,
    #[serde(default)]
    pub change: String,
    #[serde(default)]
    pub percent_change: String,
}

/// Parsed `/quote` prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub datetime: String,
    pub close: f64,
    pub previous_close: f64,
    pub change: f64,
    pub percent_change: f64,
}

impl QuoteResponse {
    pub fn check_errors(&self) -> Result<(), ProviderError> {
        if self.status.as_deref() == Some("error") {
            if self.code == Some(429) {
                return Err(ProviderError::RateLimited);
            }
            return Err(ProviderError::Api(
                self.message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(())
    }
}

impl RemoteResponse<Quote> for QuoteResponse {
    fn to_normalized(&self) -> Result<Quote, ProviderError> {
        let symbol = self.symbol.clone().ok_or(ProviderError::UnexpectedFormat)?;

        Ok(Quote {
            symbol,
            name: self.name.clone(),
            datetime: self.datetime.clone(),
            close: Self::parse_price(&self.close)?,
            previous_close: Self::parse_price(&self.previous_close)?,
            change: Self::parse_price(&self.change)?,
            percent_change: Self::parse_price(&self.percent_change)?,
        })
    }
}

impl TimeSeriesResponse {
    pub fn check_errors(&self) -> Result<(), ProviderError> {
        if self.status.as_deref() == Some("error") {
            if self.code == Some(429) {
                return Err(ProviderError::RateLimited);
            }
            let msg = self
                .message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ProviderError::Api(msg));
        }
        Ok(())
    }

    pub fn metadata(&self) -> BTreeMap<String, String> {
        let Some(meta) = &self.meta else {
            return BTreeMap::new();
        };

        BTreeMap::from([
            ("symbol".to_string(), meta.symbol.clone()),
            ("interval".to_string(), meta.interval.clone()),
            ("currency_base".to_string(), meta.currency_base.clone()),
            ("currency_quote".to_string(), meta.currency_quote.clone()),
            ("exchange".to_string(), meta.exchange.clone()),
            ("type".to_string(), meta.kind.clone()),
        ])
    }
}

impl RemoteResponse<Vec<PricePoint>> for TimeSeriesResponse {
    /// Twelve Data already returns values newest first.
    fn to_normalized(&self) -> Result<Vec<PricePoint>, ProviderError> {
        let values = self.values.as_ref().ok_or(ProviderError::UnexpectedFormat)?;

        values
            .iter()
            .map(|v| {
                Ok(PricePoint {
                    datetime: v.datetime.clone(),
                    open: Self::parse_price(&v.open)?,
                    high: Self::parse_price(&v.high)?,
                    low: Self::parse_price(&v.low)?,
                    close: Self::parse_price(&v.close)?,
                    volume: v.volume.as_deref().and_then(|s| s.trim().parse::<u64>().ok()),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_parsed_in_order() {
        let body = r#"{
            "meta": {"symbol": "EUR/USD", "interval": "15min", "currency_base": "Euro",
                     "currency_quote": "US Dollar", "type": "Physical Currency"},
            "values": [
                {"datetime": "2024-01-15 10:45:00", "open": "1.0852", "high": "1.0860", "low": "1.0850", "close": "1.0858"},
                {"datetime": "2024-01-15 10:30:00", "open": "1.0849", "high": "1.0853", "low": "1.0845", "close": "1.0852"}
            ],
            "status": "ok"
        }"#;
        let resp: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        resp.check_errors().unwrap();

        let points = resp.to_normalized().unwrap();
        assert_eq!(points[0].datetime, "2024-01-15 10:45:00");
        assert_eq!(points[1].close, 1.0852);
        assert_eq!(points[0].volume, None);
        assert_eq!(resp.metadata()["type"], "Physical Currency");
    }

    #[test]
    fn quote_is_parsed() {
        let body = r#"{"symbol": "EUR/USD", "name": "Euro / US Dollar", "exchange": "Forex",
                       "datetime": "2024-01-15", "close": "1.08520", "previous_close": "1.08410",
                       "change": "0.00110", "percent_change": "0.10147"}"#;
        let resp: QuoteResponse = serde_json::from_str(body).unwrap();
        resp.check_errors().unwrap();

        let quote = resp.to_normalized().unwrap();
        assert_eq!(quote.symbol, "EUR/USD");
        assert_eq!(quote.percent_change, 0.10147);
    }

    #[test]
    fn malformed_prices_are_rejected() {
        let body = r#"{
            "values": [
                {"datetime": "2024-01-15 10:45:00", "open": "1.0852", "high": "1.0860", "low": "1.0850", "close": "-"}
            ],
            "status": "ok"
        }"#;
        let resp: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(resp.to_normalized(), Err(ProviderError::UnexpectedFormat)));

        let resp: QuoteResponse = serde_json::from_str(
            r#"{"symbol": "EUR/USD", "close": "1.08520", "percent_change": "n/a"}"#,
        )
        .unwrap();
        assert!(matches!(resp.to_normalized(), Err(ProviderError::UnexpectedFormat)));
    }

    #[test]
    fn absent_quote_fields_count_as_zero() {
        let resp: QuoteResponse =
            serde_json::from_str(r#"{"symbol": "EUR/USD", "close": "1.08520"}"#).unwrap();

        let quote = resp.to_normalized().unwrap();
        assert_eq!(quote.close, 1.0852);
        assert_eq!(quote.previous_close, 0.0);
    }

    #[test]
    fn error_status_is_surfaced() {
        let resp: TimeSeriesResponse = serde_json::from_str(
            r#"{"code": 400, "message": "**symbol** not found: ABC/DEF", "status": "error"}"#,
        )
        .unwrap();
        assert!(matches!(resp.check_errors(), Err(ProviderError::Api(m)) if m.contains("not found")));

        let resp: TimeSeriesResponse = serde_json::from_str(
            r#"{"code": 429, "message": "You have run out of API credits", "status": "error"}"#,
        )
        .unwrap();
        assert!(matches!(resp.check_errors(), Err(ProviderError::RateLimited)));
    }
}
