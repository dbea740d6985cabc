//! Model identifiers, pools and random selection
//!
//! Provides the pure selector core plus the catalog and selection store
//! that feed it.

pub mod catalog;
pub mod model_id;
pub mod pool;
pub mod selector;
pub mod store;

pub use catalog::{
    CatalogModel, CatalogProvider, CostTier, OpenRouterCatalog, Pricing, StaticCatalog,
    sort_catalog,
};
pub use model_id::{ExclusionSet, ModelId};
pub use pool::Pool;
pub use selector::{ModelSelector, RetrySequence};
pub use store::{
    DEFAULT_SELECTED_MODELS, InMemorySelectionStore, SelectionStore, apply_catalog,
    refresh_catalog, seed_selection,
};
