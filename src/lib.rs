//! model-roulette - random model selection for OpenAI-compatible gateways
//!
//! The core is [`models::ModelSelector`]: uniform random picks from a pool of
//! model identifiers, exclusion-aware picks and bounded retry sequences. The
//! rest of the crate is a small proxy hosting it: a catalog of upstream
//! models, a selection store, a request interceptor that rewrites and
//! retries chat completions, and the HTTP surface around them.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod interceptor;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod telemetry;
