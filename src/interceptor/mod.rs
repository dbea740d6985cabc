//! Request interception: model substitution and retry-on-failure
//!
//! Before a chat-completion payload goes upstream, the interceptor asks the
//! selector for a pick and writes it into the payload's `model` field. When
//! the attempt fails (no response, or a status listed in `retry_on_status`)
//! it walks the selector's retry sequence, one attempt at a time, and finally
//! tries the configured fallback model if there is one.

pub mod dispatch;

pub use dispatch::{Dispatcher, HttpDispatcher, UpstreamResponse};

use crate::config::RandomizerConfig;
use crate::error::{AppError, AppResult};
use crate::metrics::{AttemptResult, Metrics, PickOutcome};
use crate::models::{ExclusionSet, ModelId, ModelSelector, Pool};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

/// Retry policy applied by the interceptor
#[derive(Debug, Clone)]
pub struct InterceptorSettings {
    pub enabled: bool,
    pub max_retry_attempts: usize,
    pub fallback_model: Option<ModelId>,
    pub retry_on_status: Vec<u16>,
}

impl From<&RandomizerConfig> for InterceptorSettings {
    fn from(config: &RandomizerConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_retry_attempts: config.max_retry_attempts,
            fallback_model: config.fallback_model.clone(),
            retry_on_status: config.retry_on_status.clone(),
        }
    }
}

impl Default for InterceptorSettings {
    fn default() -> Self {
        Self::from(&RandomizerConfig::default())
    }
}

/// Outcome of an intercepted request
#[derive(Debug, Clone)]
pub struct Interception {
    /// Response to hand back to the caller
    pub response: UpstreamResponse,
    /// Model written into the payload, `None` if forwarded unmodified
    pub model: Option<ModelId>,
    /// Number of upstream dispatches made
    pub attempts: usize,
}

/// How a single attempt ended
enum Attempt {
    /// Final response, hand it to the caller
    Done(UpstreamResponse),
    /// Try another model; carries the reason for logs
    Failed(String),
}

/// Rewrites outgoing payloads with a random model and retries on failure
pub struct RequestInterceptor {
    selector: ModelSelector,
    dispatcher: Arc<dyn Dispatcher>,
    settings: InterceptorSettings,
    metrics: Arc<Metrics>,
}

impl RequestInterceptor {
    pub fn new(
        dispatcher: Arc<dyn Dispatcher>,
        settings: InterceptorSettings,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            selector: ModelSelector::new(),
            dispatcher,
            settings,
            metrics,
        }
    }

    pub fn settings(&self) -> &InterceptorSettings {
        &self.settings
    }

    /// True if an upstream status should be treated as a failed attempt
    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.settings.retry_on_status.contains(&status.as_u16())
    }

    /// Send `body` upstream, substituting a model picked from `pool`
    ///
    /// Attempts are strictly sequential: at most one upstream call is in
    /// flight per request, and no model is tried twice.
    ///
    /// # Errors
    /// - `AppError::RetriesExhausted` if every attempted model failed
    /// - `AppError::UpstreamTimeout` if an unmodified pass-through timed out
    /// - `AppError::UpstreamUnavailable` if an unmodified pass-through got no response
    pub async fn intercept(&self, mut body: Value, pool: &Pool) -> AppResult<Interception> {
        if !self.settings.enabled {
            self.metrics.record_pick(PickOutcome::Disabled);
            tracing::debug!("Randomization disabled, forwarding request unmodified");
            return self.passthrough(&body).await;
        }

        if !body.is_object() {
            self.metrics.record_pick(PickOutcome::Skipped);
            tracing::debug!("Payload is not a JSON object, forwarding request unmodified");
            return self.passthrough(&body).await;
        }

        let Some(first) = self.selector.pick(pool) else {
            self.metrics.record_pick(PickOutcome::PoolEmpty);
            tracing::warn!("No models selected for randomization, forwarding request unmodified");
            return self.passthrough(&body).await;
        };
        self.metrics.record_pick(PickOutcome::Picked);

        let original_model = body.get("model").and_then(Value::as_str).map(str::to_string);
        tracing::info!(
            original_model = original_model.as_deref().unwrap_or("<none>"),
            model = %first,
            pool_size = pool.len(),
            "Model randomized"
        );

        let mut tried = ExclusionSet::new();
        let mut attempts = 0;

        let mut last_error = match self.attempt(&mut body, first, &mut attempts).await {
            Attempt::Done(response) => {
                return Ok(Interception {
                    response,
                    model: Some(first.clone()),
                    attempts,
                });
            }
            Attempt::Failed(reason) => reason,
        };
        tried.insert(first.clone());

        for model in self
            .selector
            .retry_sequence(pool, first, self.settings.max_retry_attempts)
        {
            self.metrics.record_retry();
            tracing::warn!(
                failed_attempts = attempts,
                max_retries = self.settings.max_retry_attempts,
                model = %model,
                last_error = %last_error,
                "Retrying with a different model"
            );

            match self.attempt(&mut body, model, &mut attempts).await {
                Attempt::Done(response) => {
                    return Ok(Interception {
                        response,
                        model: Some(model.clone()),
                        attempts,
                    });
                }
                Attempt::Failed(reason) => last_error = reason,
            }
            tried.insert(model.clone());
        }

        if let Some(fallback) = &self.settings.fallback_model {
            if !tried.contains(fallback) {
                self.metrics.record_fallback();
                tracing::warn!(
                    failed_attempts = attempts,
                    model = %fallback,
                    last_error = %last_error,
                    "Retries exhausted, trying fallback model"
                );

                match self.attempt(&mut body, fallback, &mut attempts).await {
                    Attempt::Done(response) => {
                        return Ok(Interception {
                            response,
                            model: Some(fallback.clone()),
                            attempts,
                        });
                    }
                    Attempt::Failed(reason) => last_error = reason,
                }
            }
        }

        self.metrics.record_exhausted();
        tracing::error!(
            attempts = attempts,
            tried_models = tried.len(),
            last_error = %last_error,
            "All attempts failed"
        );

        Err(AppError::RetriesExhausted {
            attempts,
            last_error,
        })
    }

    /// Substitute `model` and dispatch once
    async fn attempt(&self, body: &mut Value, model: &ModelId, attempts: &mut usize) -> Attempt {
        substitute_model(body, model);
        *attempts += 1;

        match self.dispatcher.dispatch(body).await {
            Ok(response) if self.is_retryable(response.status) => {
                self.metrics.record_attempt(AttemptResult::RetryableStatus);
                tracing::debug!(
                    model = %model,
                    attempt = *attempts,
                    status = %response.status,
                    "Upstream returned retryable status"
                );
                Attempt::Failed(format!("{} from {}", response.summary(), model))
            }
            Ok(response) => {
                self.metrics.record_attempt(AttemptResult::Success);
                tracing::debug!(
                    model = %model,
                    attempt = *attempts,
                    status = %response.status,
                    "Upstream request completed"
                );
                Attempt::Done(response)
            }
            Err(e) => {
                self.metrics.record_attempt(AttemptResult::TransportError);
                tracing::debug!(
                    model = %model,
                    attempt = *attempts,
                    error = %e,
                    "Upstream request failed"
                );
                Attempt::Failed(format!("{} ({})", e, model))
            }
        }
    }

    /// Forward without substitution or retries
    async fn passthrough(&self, body: &Value) -> AppResult<Interception> {
        let result = self.dispatcher.dispatch(body).await;
        let result_label = match &result {
            Ok(_) => AttemptResult::Success,
            Err(_) => AttemptResult::TransportError,
        };
        self.metrics.record_attempt(result_label);

        let response = result.map_err(AppError::from)?;

        Ok(Interception {
            response,
            model: None,
            attempts: 1,
        })
    }
}

/// Write `model` into the payload's `model` field
///
/// Non-object payloads are left untouched.
pub fn substitute_model(body: &mut Value, model: &ModelId) {
    if let Some(object) = body.as_object_mut() {
        object.insert("model".to_string(), Value::String(model.to_string()));
    }
}
