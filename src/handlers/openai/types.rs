//! OpenAI-compatible response types for the model list

use crate::models::ModelId;
use serde::{Deserialize, Serialize};

/// Object type for list responses
pub const OBJECT_LIST: &str = "list";
/// Object type for individual model entries
pub const OBJECT_MODEL: &str = "model";

/// Model entry in GET /v1/models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelObject {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

impl ModelObject {
    /// The owner is the provider prefix of the id (`"openai"` for
    /// `"openai/gpt-4o"`), or `"unknown"` for unprefixed ids
    pub fn from_model_id(id: &ModelId) -> Self {
        let owned_by = id
            .as_str()
            .split_once('/')
            .map(|(owner, _)| owner)
            .filter(|owner| !owner.is_empty())
            .unwrap_or("unknown");

        Self {
            id: id.to_string(),
            object: OBJECT_MODEL.to_string(),
            created: 0,
            owned_by: owned_by.to_string(),
        }
    }
}

/// Response for GET /v1/models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsListResponse {
    pub object: String,
    pub data: Vec<ModelObject>,
}

impl ModelsListResponse {
    pub fn new(models: Vec<ModelObject>) -> Self {
        Self {
            object: OBJECT_LIST.to_string(),
            data: models,
        }
    }
}
