//! HTTP fetch of monitored endpoints

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;

/// Bound on each rate-limit probe; a hung endpoint cannot stall the pass
/// beyond this.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw material for extraction: response headers plus the decoded body when
/// the response declared a JSON content type.
#[derive(Debug)]
pub struct FetchOutcome {
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

/// HTTP client for rate-limit probes
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// GET `endpoint` with the target's configured request headers.
    ///
    /// Non-2xx responses are failures. The body is decoded only when the
    /// `Content-Type` indicates JSON; otherwise extraction sees headers only.
    pub async fn fetch(
        &self,
        endpoint: &str,
        headers: &HashMap<String, String>,
    ) -> Result<FetchOutcome, FetchError> {
        let mut request = self.client.get(endpoint);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let headers = response.headers().clone();
        let body = if is_json(&headers) {
            Some(
                response
                    .json()
                    .await
                    .map_err(|e| FetchError::Body(e.to_string()))?,
            )
        } else {
            None
        };

        Ok(FetchOutcome { headers, body })
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

/// Fetch errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected status: {0}")]
    Status(StatusCode),

    #[error("Invalid JSON body: {0}")]
    Body(String),
}
