use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::error::ProviderError;

const USER_AGENT: &str = "fx_signal_consensus/0.1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;

/// Shared HTTP plumbing for the provider adapters: one pooled client,
/// JSON decoding, and exponential backoff when a provider answers 429.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        self.with_backoff(url, || self.client.get(url.clone()).query(query))
            .await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<T, ProviderError> {
        self.with_backoff(url, || self.client.post(url.clone()).json(body))
            .await
    }

    async fn with_backoff<T, F>(&self, url: &Url, build: F) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut retry_count = 0;

        loop {
            match self.send(build()).await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_rate_limit() => {
                    retry_count += 1;
                    if retry_count > self.max_retries {
                        return Err(ProviderError::RetriesExhausted);
                    }

                    let backoff_seconds = 2_u64.pow(retry_count);
                    warn!(
                        "Rate limited by {}, backing off for {} seconds (attempt {}/{})",
                        url.host_str().unwrap_or("provider"),
                        backoff_seconds,
                        retry_count,
                        self.max_retries
                    );
                    sleep(Duration::from_secs(backoff_seconds)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let response = request.send().await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        debug!("Received {} bytes", body.len());

        Ok(serde_json::from_str::<T>(&body)?)
    }

    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
