//! Command-line interface for model-roulette
//!
//! Provides argument parsing and the output helpers used by each subcommand.

use crate::models::{CatalogModel, ModelId, ModelSelector, Pool};
use clap::{Parser, Subcommand};
use rand::Rng;

/// Model-randomizing proxy for OpenAI-compatible gateways
#[derive(Parser)]
#[command(name = "model-roulette")]
#[command(version)]
#[command(about = "Model-randomizing proxy for OpenAI-compatible gateways")]
#[command(
    long_about = "model-roulette sits in front of an OpenAI-compatible gateway such as \
    OpenRouter, replaces the model of every chat completion with a random pick from \
    a curated pool, and retries with other models when a request fails."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the proxy server (default)
    Serve,

    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Fetch and list the upstream model catalog
    Models,

    /// Pick random models without starting the server
    Pick {
        /// Number of picks to make
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Models to pick from (defaults to the configured default selection)
        models: Vec<String>,
    },
}

/// One line of `models` output: `id | context | cost | tier`
pub fn format_catalog_line(model: &CatalogModel) -> String {
    let context = model
        .context_length
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{} | {} | {} | {}",
        model.id,
        context,
        model.cost_label(),
        model.cost_tier().as_str()
    )
}

/// Make `count` independent picks from `pool`
///
/// Returns an empty list if the pool is empty.
pub fn pick_many<R: Rng + ?Sized>(
    selector: &ModelSelector,
    pool: &Pool,
    count: usize,
    rng: &mut R,
) -> Vec<ModelId> {
    (0..count)
        .map_while(|_| selector.pick_with(pool, rng).cloned())
        .collect()
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# model-roulette Configuration
# ============================
#
# Every section except [server] is optional; the values below are the defaults.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "127.0.0.1"

# Port to listen on
port = 3000

# ─────────────────────────────────────────────────────────────────────────────
# UPSTREAM GATEWAY
# ─────────────────────────────────────────────────────────────────────────────

[upstream]
# OpenAI-compatible base URL; chat completions go to {base_url}/chat/completions
base_url = "https://openrouter.ai/api/v1"

# Environment variable holding the API key (sent as a bearer token)
api_key_env = "OPENROUTER_API_KEY"

# Per-attempt timeout in seconds (1-300)
request_timeout_seconds = 60

# ─────────────────────────────────────────────────────────────────────────────
# MODEL CATALOG
# ─────────────────────────────────────────────────────────────────────────────

[catalog]
# Fetch {base_url}/models at startup to learn the known models
fetch_on_startup = true

# Catalog fetch timeout in seconds (1-300)
timeout_seconds = 10

# ─────────────────────────────────────────────────────────────────────────────
# RANDOMIZER
# ─────────────────────────────────────────────────────────────────────────────

[randomizer]
# When false, requests are forwarded with the model the client asked for
enabled = true

# Additional models to try after the first pick fails (0-10)
max_retry_attempts = 3

# Last-resort model tried once after every retry failed (optional)
# fallback_model = "openai/gpt-4o-mini"

# Upstream statuses that count as a failed attempt
retry_on_status = [408, 429, 500, 502, 503, 504]

# Models selected on first run when they exist in the catalog.
# Leave out to use the built-in list of free models.
# default_selection = ["deepseek/deepseek-r1", "qwen/qwq-32b"]

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
# RUST_LOG overrides this when set
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}
