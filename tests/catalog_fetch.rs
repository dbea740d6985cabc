//! Integration tests for fetching the model catalog
//!
//! Uses a wiremock server in place of the OpenRouter `/models` endpoint.

use model_roulette::error::AppError;
use model_roulette::models::{
    CatalogProvider, CostTier, InMemorySelectionStore, ModelId, OpenRouterCatalog,
    SelectionStore, StaticCatalog, refresh_catalog,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog_body() -> serde_json::Value {
    json!({
        "data": [
            {
                "id": "qwen/qwq-32b",
                "name": "Qwen: QwQ 32B",
                "context_length": 32768,
                "pricing": { "prompt": "0", "completion": "0" }
            },
            {
                "id": "openai/gpt-4o",
                "name": "OpenAI: GPT-4o",
                "context_length": 128000,
                "pricing": { "prompt": "0.0000025", "completion": "0.00001" }
            },
            { "id": "mystery/model" }
        ]
    })
}

#[tokio::test]
async fn test_fetch_sends_bearer_key_and_parses_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = OpenRouterCatalog::new(
        &server.uri(),
        Some("sk-test".to_string()),
        Duration::from_secs(5),
    )
    .expect("should build catalog client");

    let models = catalog.fetch_models().await.expect("fetch should succeed");

    assert_eq!(models.len(), 3);
    assert_eq!(models[0].id, ModelId::from("qwen/qwq-32b"));
    assert_eq!(models[0].context_length, Some(32768));
    assert_eq!(models[0].cost_tier(), CostTier::Free);
    assert_eq!(models[1].cost_tier(), CostTier::Standard);
    assert_eq!(models[1].cost_label(), "400k t/$");
    assert_eq!(models[2].cost_tier(), CostTier::Unknown);
    assert_eq!(models[2].display_name(), "mystery/model");
}

#[tokio::test]
async fn test_fetch_without_key_is_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = OpenRouterCatalog::new(&server.uri(), None, Duration::from_secs(5))
        .expect("should build catalog client");

    let models = catalog.fetch_models().await.expect("fetch should succeed");
    assert!(models.is_empty());

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_fetch_error_status_is_catalog_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let catalog = OpenRouterCatalog::new(&server.uri(), None, Duration::from_secs(5))
        .expect("should build catalog client");

    let err = catalog.fetch_models().await.expect_err("401 should fail");
    match err {
        AppError::CatalogFetch { url, reason } => {
            assert!(url.ends_with("/models"));
            assert!(reason.contains("401"), "reason: {}", reason);
        }
        other => panic!("expected CatalogFetch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_invalid_body_is_catalog_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let catalog = OpenRouterCatalog::new(&server.uri(), None, Duration::from_secs(5))
        .expect("should build catalog client");

    assert!(matches!(
        catalog.fetch_models().await,
        Err(AppError::CatalogFetch { .. })
    ));
}

#[tokio::test]
async fn test_refresh_from_http_catalog_seeds_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .mount(&server)
        .await;

    let catalog = OpenRouterCatalog::new(&server.uri(), None, Duration::from_secs(5))
        .expect("should build catalog client");
    let store = InMemorySelectionStore::new();
    let defaults = vec![ModelId::from("qwen/qwq-32b"), ModelId::from("not/listed")];

    let known = refresh_catalog(&store, &catalog, &defaults)
        .await
        .expect("refresh should succeed");

    assert_eq!(known, 3);
    assert_eq!(
        store.selected().await.unwrap().to_strings(),
        vec!["qwen/qwq-32b"]
    );
}

#[test]
fn test_static_catalog_refresh_blocking() {
    let store = InMemorySelectionStore::new();
    let catalog = StaticCatalog::from_ids(["z/last", "a/first"]);

    let known = tokio_test::block_on(refresh_catalog(&store, &catalog, &[]))
        .expect("static catalog never fails");

    assert_eq!(known, 2);
    let active = tokio_test::block_on(store.active_pool()).unwrap();
    assert_eq!(active.to_strings(), vec!["a/first", "z/last"]);
}
