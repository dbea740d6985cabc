//! Selection store: the user-curated pool and the known catalog
//!
//! The store owns two pools. `selected` is what the user chose; `known` is
//! the full catalog. The active pool used for randomization is the selection,
//! or the catalog when nothing is selected.

use crate::error::AppResult;
use crate::models::catalog::{CatalogModel, CatalogProvider, sort_catalog};
use crate::models::model_id::ModelId;
use crate::models::pool::Pool;
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Models selected on first run when the user has not chosen any (free models)
pub const DEFAULT_SELECTED_MODELS: &[&str] = &[
    "deepseek/deepseek-v3",
    "deepseek/deepseek-v3-0324",
    "deepseek/deepseek-r1",
    "deepseek/deepseek-r1-0528",
    "deepseek/deepseek-r1-distill-llama-70b",
    "mistralai/mistral-nemo",
    "mistralai/mistral-small-3.2-24b",
    "qwen/qwen2.5-vl-72b-instruct",
    "qwen/qwen3-32b",
    "qwen/qwq-32b",
    "qwen/qwen2.5-72b-instruct",
    "tencent/hunyuan-a13b-instruct",
    "tng/deepseek-r1t2-chimera",
    "venice/venice-uncensored",
];

/// Persists and retrieves the user-curated pool and the known catalog
#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// The user's current selection (may be empty)
    async fn selected(&self) -> AppResult<Pool>;

    /// Replace the selection; duplicates are dropped
    async fn replace_selected(&self, models: Vec<ModelId>) -> AppResult<Pool>;

    /// Every model the catalog reported on its last refresh
    async fn known(&self) -> AppResult<Pool>;

    /// Replace the known catalog; duplicates are dropped
    async fn replace_known(&self, models: Vec<ModelId>) -> AppResult<Pool>;

    /// Pool to randomize over: the selection, or the full catalog if nothing is selected
    async fn active_pool(&self) -> AppResult<Pool> {
        let selected = self.selected().await?;
        Ok(selected.or_else(self.known().await?))
    }
}

/// Store keeping both pools in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemorySelectionStore {
    selected: RwLock<Pool>,
    known: RwLock<Pool>,
}

impl InMemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with an initial selection
    pub fn with_selection<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ModelId>,
    {
        Self {
            selected: RwLock::new(models.into_iter().collect()),
            known: RwLock::new(Pool::new()),
        }
    }
}

#[async_trait]
impl SelectionStore for InMemorySelectionStore {
    async fn selected(&self) -> AppResult<Pool> {
        Ok(self.selected.read().await.clone())
    }

    async fn replace_selected(&self, models: Vec<ModelId>) -> AppResult<Pool> {
        let pool: Pool = models.into_iter().collect();
        *self.selected.write().await = pool.clone();
        tracing::debug!(selected = pool.len(), "Selection replaced");
        Ok(pool)
    }

    async fn known(&self) -> AppResult<Pool> {
        Ok(self.known.read().await.clone())
    }

    async fn replace_known(&self, models: Vec<ModelId>) -> AppResult<Pool> {
        let pool: Pool = models.into_iter().collect();
        *self.known.write().await = pool.clone();
        tracing::debug!(known = pool.len(), "Known catalog replaced");
        Ok(pool)
    }
}

/// Record a fetched catalog in the store and seed the first-run selection
///
/// The catalog (sorted by display name) becomes the known set. If nothing is
/// selected yet, the subset of `defaults` present in the catalog is selected,
/// in catalog order. Returns the number of known models.
pub async fn apply_catalog(
    store: &dyn SelectionStore,
    mut catalog: Vec<CatalogModel>,
    defaults: &[ModelId],
) -> AppResult<usize> {
    sort_catalog(&mut catalog);
    let ids: Vec<ModelId> = catalog.into_iter().map(|m| m.id).collect();
    let known = store.replace_known(ids).await?;

    if store.selected().await?.is_empty() {
        let wanted: HashSet<&ModelId> = defaults.iter().collect();
        let seeded: Vec<ModelId> = known
            .iter()
            .filter(|id| wanted.contains(id))
            .cloned()
            .collect();

        if seeded.is_empty() {
            tracing::warn!(
                known = known.len(),
                defaults = defaults.len(),
                "No default models found in catalog, randomizing over the full catalog"
            );
        } else {
            tracing::info!(
                selected = seeded.len(),
                "No models selected yet, seeding selection from defaults"
            );
            store.replace_selected(seeded).await?;
        }
    }

    Ok(known.len())
}

/// Fetch the catalog from `provider` and record it via [`apply_catalog`]
pub async fn refresh_catalog(
    store: &dyn SelectionStore,
    provider: &dyn CatalogProvider,
    defaults: &[ModelId],
) -> AppResult<usize> {
    let catalog = provider.fetch_models().await?;
    apply_catalog(store, catalog, defaults).await
}

/// Establish the selection at startup
///
/// With a provider, the catalog is fetched and applied via [`apply_catalog`].
/// Without one, or when the fetch fails, `defaults` become the selection
/// as-is (only if nothing is selected yet). A fetch failure is logged and
/// never fatal. Returns the number of known models.
pub async fn seed_selection(
    store: &dyn SelectionStore,
    provider: Option<&dyn CatalogProvider>,
    defaults: &[ModelId],
) -> AppResult<usize> {
    if let Some(provider) = provider {
        match refresh_catalog(store, provider, defaults).await {
            Ok(known) => {
                tracing::info!(known_models = known, "Model catalog loaded");
                return Ok(known);
            }
            Err(e) => tracing::warn!(
                error = %e,
                defaults = defaults.len(),
                "Failed to load model catalog, using the default selection as-is"
            ),
        }
    }

    if store.selected().await?.is_empty() {
        store.replace_selected(defaults.to_vec()).await?;
    }
    Ok(store.known().await?.len())
}
