//! HTTP request handlers for the model-roulette proxy

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::interceptor::{Dispatcher, HttpDispatcher, InterceptorSettings, RequestInterceptor};
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use crate::models::{InMemorySelectionStore, ModelSelector, SelectionStore};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod health;
pub mod metrics;
pub mod openai;
pub mod selection;

/// Application state shared across all handlers
///
/// The catalog provider, selection store and dispatcher are injected here
/// rather than reached through globals. All fields are Arc'd for cheap
/// cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn SelectionStore>,
    interceptor: Arc<RequestInterceptor>,
    selector: ModelSelector,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create an AppState with explicit collaborators
    ///
    /// # Errors
    /// Returns `AppError::Internal` if metrics registration fails.
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn SelectionStore>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> AppResult<Self> {
        let metrics = Arc::new(Metrics::new().map_err(|e| {
            AppError::Internal(format!("Failed to register metrics: {}", e))
        })?);

        let interceptor = Arc::new(RequestInterceptor::new(
            dispatcher,
            InterceptorSettings::from(&config.randomizer),
            metrics.clone(),
        ));

        Ok(Self {
            config,
            store,
            interceptor,
            selector: ModelSelector::new(),
            metrics,
        })
    }

    /// Create an AppState that dispatches to the configured upstream over HTTP
    /// and keeps the selection in memory
    pub fn from_config(config: Arc<Config>) -> AppResult<Self> {
        let dispatcher = Arc::new(HttpDispatcher::new(
            &config.upstream.base_url,
            config.upstream.api_key(),
            config.upstream.request_timeout(),
        )?);
        let store = Arc::new(InMemorySelectionStore::new());
        Self::new(config, store, dispatcher)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &dyn SelectionStore {
        self.store.as_ref()
    }

    pub fn interceptor(&self) -> &RequestInterceptor {
        &self.interceptor
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the full HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .route(
            "/v1/chat/completions",
            post(openai::completions::handler),
        )
        .route("/v1/models", get(openai::models::handler))
        .route(
            "/roulette/selection",
            get(selection::get_handler).put(selection::put_handler),
        )
        .route("/roulette/pick", get(selection::pick_handler))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Shared test helper: state with a scripted dispatcher and in-memory store
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::DispatchError;
    use crate::interceptor::UpstreamResponse;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::Value;
    use std::str::FromStr;

    /// Dispatcher that echoes the requested model back as the response body
    pub(crate) struct EchoDispatcher;

    #[async_trait]
    impl Dispatcher for EchoDispatcher {
        async fn dispatch(&self, body: &Value) -> Result<UpstreamResponse, DispatchError> {
            let model = body.get("model").cloned().unwrap_or(Value::Null);
            Ok(UpstreamResponse::json(
                StatusCode::OK,
                &serde_json::json!({ "model": model }),
            ))
        }
    }

    pub(crate) fn test_config() -> Config {
        Config::from_str(
            r#"
[server]
host = "127.0.0.1"
port = 3000

[catalog]
fetch_on_startup = false
"#,
        )
        .expect("should parse test config")
    }

    pub(crate) fn state_with_selection(models: &[&str]) -> AppState {
        let store = Arc::new(InMemorySelectionStore::with_selection(
            models.iter().copied(),
        ));
        AppState::new(Arc::new(test_config()), store, Arc::new(EchoDispatcher))
            .expect("should create AppState")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_appstate_new_exposes_components() {
        let state = state_with_selection(&["a", "b"]);

        assert_eq!(state.config().server.port, 3000);
        assert_eq!(state.store().selected().await.unwrap().len(), 2);
        assert!(state.interceptor().settings().enabled);
    }

    #[tokio::test]
    async fn test_appstate_is_clonable_and_shares_store() {
        let state = state_with_selection(&[]);
        let clone = state.clone();

        clone
            .store()
            .replace_selected(vec!["x".into()])
            .await
            .unwrap();

        assert_eq!(state.store().selected().await.unwrap().to_strings(), vec!["x"]);
    }

    #[test]
    fn test_appstate_from_config_builds_http_dispatcher() {
        let state = AppState::from_config(Arc::new(test_config()));
        assert!(state.is_ok());
    }
}
