//! OpenAI-compatible API handlers
//!
//! - `POST /v1/chat/completions` - intercepted, randomized and forwarded upstream
//! - `GET /v1/models` - the active pool

pub mod completions;
pub mod extractor;
pub mod models;
pub mod types;
