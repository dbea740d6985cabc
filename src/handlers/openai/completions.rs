//! OpenAI-compatible chat completions handler
//!
//! Handles POST /v1/chat/completions. The payload is treated as opaque JSON:
//! only its `model` field is rewritten before it is forwarded upstream.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::interceptor::Interception;
use crate::middleware::RequestId;
use axum::{
    Extension,
    body::Body,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use super::extractor::OpenAiJson;

/// Header carrying the model that actually served the request
pub const MODEL_HEADER: &str = "x-model-roulette-model";
/// Header carrying the number of upstream attempts made
pub const ATTEMPTS_HEADER: &str = "x-model-roulette-attempts";

/// POST /v1/chat/completions handler
///
/// Snapshots the active pool, lets the interceptor pick a model (retrying
/// with other models on failure) and relays the upstream status and body.
///
/// # Errors
/// - 502 when every attempted model failed
/// - 504 when an unmodified pass-through timed out
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    OpenAiJson(body): OpenAiJson<Value>,
) -> Result<Response, AppError> {
    let requested = body
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_string);
    let stream = body.get("stream").and_then(Value::as_bool).unwrap_or(false);

    tracing::debug!(
        request_id = %request_id,
        requested_model = requested.as_deref().unwrap_or("<none>"),
        stream = stream,
        "Received chat completions request"
    );

    let pool = state.store().active_pool().await?;
    let interception = state.interceptor().intercept(body, &pool).await?;

    tracing::info!(
        request_id = %request_id,
        model = interception
            .model
            .as_ref()
            .map(|m| m.as_str())
            .unwrap_or("<unmodified>"),
        attempts = interception.attempts,
        status = %interception.response.status,
        "Chat completion relayed"
    );

    Ok(relay(interception))
}

/// Turn an interception into the HTTP response sent back to the client
fn relay(interception: Interception) -> Response {
    let Interception {
        response: upstream,
        model,
        attempts,
    } = interception;

    let mut response = (upstream.status, Body::from(upstream.body)).into_response();
    let headers = response.headers_mut();

    if let Some(content_type) = upstream
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        headers.insert(header::CONTENT_TYPE, content_type);
    }
    if let Some(model) = model.and_then(|m| HeaderValue::from_str(m.as_str()).ok()) {
        headers.insert(MODEL_HEADER, model);
    }
    headers.insert(ATTEMPTS_HEADER, HeaderValue::from(attempts));

    response
}
