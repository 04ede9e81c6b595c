use crate::error::ProviderError;

/// A decoded provider body that can be turned into our own representation.
pub trait RemoteResponse<T> {
    fn to_normalized(&self) -> Result<T, ProviderError>;

    /// Provider prices arrive as strings. An absent (empty) field counts as
    /// zero; anything else that is not a number rejects the whole body.
    fn parse_price(raw: &str) -> Result<f64, ProviderError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(0_f64);
        }
        raw.parse::<f64>().map_err(|_| ProviderError::UnexpectedFormat)
    }
}
