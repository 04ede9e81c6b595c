use std::collections::BTreeMap;

use common::models::PricePoint;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::traits::RemoteResponse;

/// `FX_INTRADAY` body. The series lives under a key that embeds the interval
/// (`Time Series FX (5min)`), so everything else is kept as raw JSON until
/// `for_interval` says which key to read.
#[derive(Deserialize, Debug)]
pub struct IntradayResponse {
    #[serde(rename(deserialize = "Error Message"))]
    pub error_message: Option<String>,
    #[serde(rename(deserialize = "Note"))]
    pub note: Option<String>,
    #[serde(rename(deserialize = "Information"))]
    pub information: Option<String>,
    #[serde(rename(deserialize = "Meta Data"), default)]
    pub meta: BTreeMap<String, String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
    #[serde(skip)]
    pub interval: String,
}

#[derive(Deserialize, Debug)]
pub struct IntradayCandle {
    #[serde(rename(deserialize = "1. open"), default)]
    pub open: String,
    #[serde(rename(deserialize = "2. high"), default)]
    pub high: String,
    #[serde(rename(deserialize = "3. low"), default)]
    pub low: String,
    #[serde(rename(deserialize = "4. close"), default)]
    pub close: String,
}

impl IntradayResponse {
    /// Binds the body to the Alpha Vantage interval it was requested with.
    pub fn for_interval(mut self, interval: &str) -> Self {
        self.interval = interval.to_string();
        self
    }

    fn series_key(&self) -> String {
        format!("Time Series FX ({})", self.interval)
    }

    pub fn check_errors(&self) -> Result<(), ProviderError> {
        if let Some(msg) = &self.error_message {
            return Err(ProviderError::Api(msg.clone()));
        }
        if self.note.is_some() {
            return Err(ProviderError::RateLimited);
        }
        if let Some(info) = &self.information {
            return Err(ProviderError::Api(info.clone()));
        }
        Ok(())
    }

    /// Meta data with the numbered prefixes stripped (`2. From Symbol` -> `from_symbol`).
    pub fn metadata(&self) -> BTreeMap<String, String> {
        self.meta
            .iter()
            .map(|(k, v)| {
                let name = k.split_once(". ").map(|(_, n)| n).unwrap_or(k);
                (name.to_lowercase().replace(' ', "_"), v.clone())
            })
            .collect()
    }
}

impl RemoteResponse<Vec<PricePoint>> for IntradayResponse {
    /// Newest candle first.
    fn to_normalized(&self) -> Result<Vec<PricePoint>, ProviderError> {
        let series = self
            .rest
            .get(&self.series_key())
            .ok_or(ProviderError::UnexpectedFormat)?;

        let candles: BTreeMap<String, IntradayCandle> = serde_json::from_value(series.clone())?;

        let mut points = candles
            .into_iter()
            .map(|(datetime, c)| {
                Ok(PricePoint {
                    datetime,
                    open: Self::parse_price(&c.open)?,
                    high: Self::parse_price(&c.high)?,
                    low: Self::parse_price(&c.low)?,
                    close: Self::parse_price(&c.close)?,
                    volume: None,
                })
            })
            .collect::<Result<Vec<PricePoint>, ProviderError>>()?;

        points.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        Ok(points)
    }
}

/// `CURRENCY_EXCHANGE_RATE` body.
#[derive(Deserialize, Debug)]
pub struct ExchangeRateResponse {
    #[serde(rename(deserialize = "Error Message"))]
    pub error_message: Option<String>,
    #[serde(rename(deserialize = "Note"))]
    pub note: Option<String>,
    #[serde(rename(deserialize = "Information"))]
    pub information: Option<String>,
    #[serde(rename(deserialize = "Realtime Currency Exchange Rate"))]
    pub rate: Option<ExchangeRateBody>,
}

#[derive(Deserialize, Debug)]
pub struct ExchangeRateBody {
    #[serde(rename(deserialize = "1. From_Currency Code"), default)]
    pub from_currency: String,
    #[serde(rename(deserialize = "3. To_Currency Code"), default)]
    pub to_currency: String,
    #[serde(rename(deserialize = "5. Exchange Rate"), default)]
    pub exchange_rate: String,
    #[serde(rename(deserialize = "6. Last Refreshed"), default)]
    pub last_refreshed: String,
    #[serde(rename(deserialize = "7. Time Zone"), default)]
    pub timezone: String,
}

/// Parsed spot rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub exchange_rate: f64,
    pub last_refreshed: String,
    pub timezone: String,
}

impl ExchangeRateResponse {
    pub fn check_errors(&self) -> Result<(), ProviderError> {
        if let Some(msg) = &self.error_message {
            return Err(ProviderError::Api(msg.clone()));
        }
        if self.note.is_some() {
            return Err(ProviderError::RateLimited);
        }
        if let Some(info) = &self.information {
            return Err(ProviderError::Api(info.clone()));
        }
        Ok(())
    }
}

impl RemoteResponse<ExchangeRate> for ExchangeRateResponse {
    fn to_normalized(&self) -> Result<ExchangeRate, ProviderError> {
        let rate = self.rate.as_ref().ok_or(ProviderError::UnexpectedFormat)?;

        Ok(ExchangeRate {
            from_currency: rate.from_currency.clone(),
            to_currency: rate.to_currency.clone(),
            exchange_rate: Self::parse_price(&rate.exchange_rate)?,
            last_refreshed: rate.last_refreshed.clone(),
            timezone: rate.timezone.clone(),
        })
    }
}
