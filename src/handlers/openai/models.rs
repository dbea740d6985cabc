//! OpenAI-compatible models list handler
//!
//! Handles GET /v1/models requests.

use crate::error::AppResult;
use crate::handlers::AppState;
use axum::{Json, extract::State};

use super::types::{ModelObject, ModelsListResponse};

/// GET /v1/models handler
///
/// Lists the active pool: the user's selection, or the full known catalog
/// when nothing is selected. Clients that pick a model from this list will
/// still have it replaced by a random pick on the way upstream.
pub async fn handler(State(state): State<AppState>) -> AppResult<Json<ModelsListResponse>> {
    let pool = state.store().active_pool().await?;
    let models = pool.iter().map(ModelObject::from_model_id).collect();

    Ok(Json(ModelsListResponse::new(models)))
}
