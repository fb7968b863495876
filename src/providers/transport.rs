use log::{debug, error};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::ProviderError;

/// JSON-over-HTTP transport shared by the model server clients.
///
/// Transient failures (connection errors, 5xx) are retried with exponential
/// backoff, client errors fail immediately.
#[derive(Debug, Clone)]
pub struct JsonTransport {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl JsonTransport {
    /// Create a transport for `endpoint` with a per-request timeout
    pub fn new(
        endpoint: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and decode the JSON answer, retrying transient failures
    pub async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ProviderError>
    where
        Req: Serialize + ?Sized + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.url(path);
        let mut attempt = 0;

        loop {
            let result = self.post_once(&url, body).await;
            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    error!("Request to {} failed: {} - attempt {}/{}", url, e, attempt, self.max_retries + 1);
                    let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_once<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp, ProviderError>
    where
        Req: Serialize + ?Sized + Sync,
        Resp: DeserializeOwned,
    {
        debug!("POST {}", url);
        let response = self.client.post(url)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let text = response.text().await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: truncate(&text, 500),
            });
        }

        serde_json::from_str::<Resp>(&text).map_err(|e| {
            ProviderError::ParseError(format!("{} (body: {})", e, truncate(&text, 200)))
        })
    }

    /// GET a path and succeed on any 2xx status
    pub async fn get_ok(&self, path: &str) -> Result<(), ProviderError> {
        let url = self.url(path);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: truncate(&message, 500),
            })
        }
    }
}

fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_connect() || e.is_timeout() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        text.chars().take(max_chars).collect()
    } else {
        text.to_string()
    }
}
