//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Whether requests are currently randomized
    pub randomization_enabled: bool,
    /// Size of the pool the next request will randomize over
    pub active_models: usize,
}

/// Health check handler
///
/// Always 200 OK while the process is serving. An empty active pool is not
/// unhealthy: requests are then forwarded unmodified.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let active_models = match state.store().active_pool().await {
        Ok(pool) => pool.len(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read active pool for health check");
            0
        }
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            randomization_enabled: state.interceptor().settings().enabled,
            active_models,
        }),
    )
}
