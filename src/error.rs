//! Error types for model-roulette
//!
//! The selection core never fails; everything here belongs to the host
//! collaborators (configuration, catalog, upstream dispatch, HTTP handlers).
//! All application errors implement `IntoResponse` for Axum handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("No models selected for randomization")]
    NoModelsSelected,

    #[error("Failed to fetch model catalog from {url}: {reason}")]
    CatalogFetch { url: String, reason: String },

    #[error("Upstream request timed out after {timeout_seconds} seconds")]
    UpstreamTimeout { timeout_seconds: u64 },

    #[error("Upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    #[error("All {attempts} attempts failed, last error: {last_error}")]
    RetriesExhausted { attempts: usize, last_error: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NoModelsSelected => StatusCode::SERVICE_UNAVAILABLE,
            Self::CatalogFetch { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::RetriesExhausted { .. } => StatusCode::BAD_GATEWAY,
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Failure to get any HTTP response out of the upstream
///
/// An HTTP error status is not a `DispatchError`: the dispatcher returns it
/// as a normal response and the interceptor decides whether to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("request timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Timeout { timeout_seconds } => AppError::UpstreamTimeout { timeout_seconds },
            DispatchError::Transport(reason) => AppError::UpstreamUnavailable { reason },
        }
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
