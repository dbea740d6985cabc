//! Model catalog: the full list of models the upstream gateway offers
//!
//! The catalog is fetched from the upstream `/models` endpoint
//! (OpenRouter-compatible `{ "data": [...] }` shape) and is used as the
//! known-model set when the user has not selected anything.

use crate::error::{AppError, AppResult};
use crate::models::model_id::ModelId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prompt tokens per dollar above which a model counts as cheap
const CHEAP_TOKENS_PER_DOLLAR: f64 = 1_000_000.0;

/// Prompt tokens per dollar below which a model counts as expensive
const EXPENSIVE_TOKENS_PER_DOLLAR: f64 = 100_000.0;

/// Per-token pricing as reported by the catalog (decimal strings, USD)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Pricing {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub completion: Option<String>,
}

impl Pricing {
    fn prompt_cost(&self) -> Option<f64> {
        parse_price(self.prompt.as_deref())
    }

    fn completion_cost(&self) -> Option<f64> {
        parse_price(self.completion.as_deref())
    }
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Single catalog entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogModel {
    pub id: ModelId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
}

/// Relative cost bucket derived from prompt pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Free,
    Cheap,
    Standard,
    Expensive,
    Unknown,
}

impl CostTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostTier::Free => "free",
            CostTier::Cheap => "cheap",
            CostTier::Standard => "standard",
            CostTier::Expensive => "expensive",
            CostTier::Unknown => "unknown",
        }
    }
}

impl CatalogModel {
    /// Create a bare entry with only an identifier
    pub fn new(id: impl Into<ModelId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            context_length: None,
            pricing: None,
        }
    }

    /// Human-readable name, falling back to the identifier
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Prompt tokens one dollar buys, if the prompt price is positive
    fn tokens_per_dollar(&self) -> Option<f64> {
        self.pricing
            .as_ref()
            .and_then(Pricing::prompt_cost)
            .filter(|cost| *cost > 0.0)
            .map(|cost| (1.0 / cost).round())
    }

    pub fn cost_tier(&self) -> CostTier {
        let Some(prompt) = self.pricing.as_ref().and_then(Pricing::prompt_cost) else {
            return CostTier::Unknown;
        };

        if prompt == 0.0 {
            return CostTier::Free;
        }

        match self.tokens_per_dollar() {
            Some(tpd) if tpd > CHEAP_TOKENS_PER_DOLLAR => CostTier::Cheap,
            Some(tpd) if tpd < EXPENSIVE_TOKENS_PER_DOLLAR => CostTier::Expensive,
            Some(_) => CostTier::Standard,
            None => CostTier::Unknown,
        }
    }

    /// Short cost summary: `Free`, `{k}k t/$`, or `Cost varies`
    pub fn cost_label(&self) -> String {
        let Some(pricing) = &self.pricing else {
            return "Cost varies".to_string();
        };

        if pricing.prompt_cost() == Some(0.0) && pricing.completion_cost() == Some(0.0) {
            return "Free".to_string();
        }

        match self.tokens_per_dollar() {
            Some(tpd) => format!("{}k t/$", (tpd / 1000.0).round() as u64),
            None => "Cost varies".to_string(),
        }
    }
}

/// Sort catalog entries by display name
pub fn sort_catalog(models: &mut [CatalogModel]) {
    models.sort_by(|a, b| a.display_name().cmp(b.display_name()));
}

/// Source of the full list of available models
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_models(&self) -> AppResult<Vec<CatalogModel>>;
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    data: Vec<CatalogModel>,
}

/// Catalog backed by an OpenRouter-compatible `GET /models` endpoint
#[derive(Debug, Clone)]
pub struct OpenRouterCatalog {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl OpenRouterCatalog {
    /// Create a catalog client for `{base_url}/models`
    ///
    /// # Errors
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build catalog HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/models", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogProvider for OpenRouterCatalog {
    async fn fetch_models(&self) -> AppResult<Vec<CatalogModel>> {
        let mut request = self.client.get(&self.url);
        match &self.api_key {
            Some(key) => request = request.bearer_auth(key),
            None => tracing::warn!(
                url = %self.url,
                "No API key configured, fetching model catalog unauthenticated"
            ),
        }

        let response = request.send().await.map_err(|e| AppError::CatalogFetch {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::CatalogFetch {
                url: self.url.clone(),
                reason: format!("HTTP {}", status),
            });
        }

        let body: CatalogResponse = response.json().await.map_err(|e| AppError::CatalogFetch {
            url: self.url.clone(),
            reason: format!("invalid catalog body: {}", e),
        })?;

        tracing::info!(
            url = %self.url,
            model_count = body.data.len(),
            "Fetched model catalog"
        );

        Ok(body.data)
    }
}

/// Fixed catalog, for offline operation and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    models: Vec<CatalogModel>,
}

impl StaticCatalog {
    pub fn new(models: Vec<CatalogModel>) -> Self {
        Self { models }
    }

    /// Build a catalog of bare entries from identifiers
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ModelId>,
    {
        Self::new(ids.into_iter().map(CatalogModel::new).collect())
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn fetch_models(&self) -> AppResult<Vec<CatalogModel>> {
        Ok(self.models.clone())
    }
}
