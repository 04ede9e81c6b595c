pub mod alphavantage_response;
pub mod http_client;
pub mod tradingview_response;
pub mod twelvedata_response;

pub use alphavantage_response::{ExchangeRate, ExchangeRateResponse, IntradayResponse};
pub use http_client::HttpClient;
pub use tradingview_response::{ScanRequest, ScanResponse, ScanRow};
pub use twelvedata_response::{Quote, QuoteResponse, TimeSeriesResponse};

/// Splits `EURUSD` into `EUR/USD`; symbols that already carry a separator or
/// are not six characters long are returned uppercased as-is.
pub fn slash_symbol(symbol: &str) -> String {
    let symbol = symbol.to_uppercase().replace(' ', "");
    if symbol.contains('/') || symbol.len() != 6 || !symbol.is_ascii() {
        return symbol;
    }
    format!("{}/{}", &symbol[..3], &symbol[3..])
}

/// `EUR/USD` -> `EURUSD`.
pub fn compact_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replace(['/', ' '], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_reformatted() {
        assert_eq!(slash_symbol("eurusd"), "EUR/USD");
        assert_eq!(slash_symbol("GBP/JPY"), "GBP/JPY");
        assert_eq!(slash_symbol("BTCUSDT"), "BTCUSDT");
        assert_eq!(compact_symbol("eur/usd"), "EURUSD");
    }
}
