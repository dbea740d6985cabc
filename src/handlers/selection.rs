//! Selection management endpoints
//!
//! - `GET /roulette/selection` - current selection, catalog size and active pool
//! - `PUT /roulette/selection` - replace the selection
//! - `GET /roulette/pick` - one random pick from the active pool

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::models::{ModelId, Pool};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// Snapshot of the selection state
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selected: Pool,
    pub known_count: usize,
    /// Pool the next request will randomize over
    pub active: Pool,
}

#[derive(Debug, Deserialize)]
pub struct SelectionUpdate {
    pub models: Vec<ModelId>,
}

#[derive(Debug, Serialize)]
pub struct PickResponse {
    pub model: ModelId,
    pub pool_size: usize,
}

async fn snapshot(state: &AppState) -> AppResult<SelectionResponse> {
    let store = state.store();
    Ok(SelectionResponse {
        selected: store.selected().await?,
        known_count: store.known().await?.len(),
        active: store.active_pool().await?,
    })
}

/// GET /roulette/selection
pub async fn get_handler(State(state): State<AppState>) -> AppResult<Json<SelectionResponse>> {
    Ok(Json(snapshot(&state).await?))
}

/// PUT /roulette/selection
///
/// An empty list is accepted and means "randomize over the full catalog".
/// Duplicates are dropped, first occurrence wins.
///
/// # Errors
/// `AppError::Validation` (400) if any id is blank.
pub async fn put_handler(
    State(state): State<AppState>,
    Json(update): Json<SelectionUpdate>,
) -> AppResult<Json<SelectionResponse>> {
    if let Some(index) = update.models.iter().position(ModelId::is_blank) {
        return Err(AppError::Validation(format!(
            "models[{}] must not be blank",
            index
        )));
    }

    let requested = update.models.len();
    let pool = state.store().replace_selected(update.models).await?;
    tracing::info!(
        requested = requested,
        selected = pool.len(),
        "Selection updated"
    );

    Ok(Json(snapshot(&state).await?))
}

/// GET /roulette/pick
///
/// # Errors
/// `AppError::NoModelsSelected` (503) when the active pool is empty.
pub async fn pick_handler(State(state): State<AppState>) -> AppResult<Json<PickResponse>> {
    let pool = state.store().active_pool().await?;
    let model = state
        .selector()
        .pick(&pool)
        .cloned()
        .ok_or(AppError::NoModelsSelected)?;

    Ok(Json(PickResponse {
        model,
        pool_size: pool.len(),
    }))
}
