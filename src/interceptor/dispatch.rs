//! Upstream dispatch: sending a (possibly rewritten) payload to the gateway

use crate::error::{AppError, AppResult, DispatchError};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Buffered upstream response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// JSON response with the given status
    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: Bytes::from(value.to_string()),
        }
    }

    /// Short description for logs and error messages
    pub fn summary(&self) -> String {
        format!("HTTP {}", self.status.as_u16())
    }
}

/// Sends one chat-completion payload upstream
///
/// Any HTTP response, including error statuses, is `Ok`. Only a failure to
/// obtain a response at all (connection error, timeout) is an `Err`.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, body: &Value) -> Result<UpstreamResponse, DispatchError>;
}

/// Dispatcher posting to `{base_url}/chat/completions` over HTTP
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpDispatcher {
    /// # Errors
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to build upstream HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(&self, body: &Value) -> Result<UpstreamResponse, DispatchError> {
        let mut request = self.client.post(&self.url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DispatchError::Timeout {
                    timeout_seconds: self.timeout.as_secs(),
                }
            } else {
                DispatchError::Transport(e.to_string())
            }
        })?;

        // reqwest re-exports the same `http` crate axum uses
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                DispatchError::Timeout {
                    timeout_seconds: self.timeout.as_secs(),
                }
            } else {
                DispatchError::Transport(format!("failed reading response body: {}", e))
            }
        })?;

        tracing::debug!(
            url = %self.url,
            status = %status,
            body_bytes = body.len(),
            "Upstream responded"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
