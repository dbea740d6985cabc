//! Configuration management for model-roulette
//!
//! Parses TOML configuration files and provides typed access to settings.

use crate::error::{AppError, AppResult};
use crate::models::ModelId;
use crate::models::store::DEFAULT_SELECTED_MODELS;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound for any timeout, in seconds
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Upper bound for `randomizer.max_retry_attempts`
const MAX_RETRY_ATTEMPTS: usize = 10;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub randomizer: RandomizerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// IP address to bind; hostnames are rejected at load time
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Address the proxy listens on
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip = self.host.parse::<IpAddr>().map_err(|_| {
            AppError::Config(format!(
                "server.host '{}' must be an IP address (e.g. 127.0.0.1 or 0.0.0.0)",
                self.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Upstream OpenAI-compatible gateway (OpenRouter by default)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Timeout for a single dispatch attempt (each retry gets its own budget)
    #[serde(default = "default_upstream_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            api_key_env: default_api_key_env(),
            request_timeout_seconds: default_upstream_timeout(),
        }
    }
}

impl UpstreamConfig {
    /// Read the API key from the configured environment variable
    ///
    /// Returns `None` if the variable is unset or blank.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn default_upstream_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_upstream_timeout() -> u64 {
    60
}

/// Catalog fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Fetch the catalog from the upstream when the server starts
    #[serde(default = "default_true")]
    pub fetch_on_startup: bool,
    #[serde(default = "default_catalog_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fetch_on_startup: true,
            timeout_seconds: default_catalog_timeout(),
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_catalog_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

/// Random selection and retry policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RandomizerConfig {
    /// When false, requests are forwarded with the caller's model untouched
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Replacement models tried after the first pick fails
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: usize,
    /// Last-resort model tried once after every retry failed
    #[serde(default)]
    pub fallback_model: Option<ModelId>,
    /// Upstream statuses that count as a failed attempt
    #[serde(default = "default_retry_on_status")]
    pub retry_on_status: Vec<u16>,
    /// Models selected on first run, filtered to what the catalog offers
    #[serde(default = "default_selection")]
    pub default_selection: Vec<ModelId>,
}

impl Default for RandomizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retry_attempts: default_max_retry_attempts(),
            fallback_model: None,
            retry_on_status: default_retry_on_status(),
            default_selection: default_selection(),
        }
    }
}

fn default_max_retry_attempts() -> usize {
    3
}

fn default_retry_on_status() -> Vec<u16> {
    vec![408, 429, 500, 502, 503, 504]
}

fn default_selection() -> Vec<ModelId> {
    DEFAULT_SELECTED_MODELS
        .iter()
        .map(|id| ModelId::from(*id))
        .collect()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        let config: Self = toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display.clone(),
            source,
        })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()` and `from_str()`, but can
    /// also be called explicitly when constructing Config via other means.
    pub fn validate(&self) -> AppResult<()> {
        self.server.socket_addr()?;

        // Upstream
        let base_url = &self.upstream.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "upstream.base_url '{}' must start with 'http://' or 'https://'",
                base_url
            )));
        }

        if self.upstream.api_key_env.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.api_key_env must name an environment variable".to_string(),
            ));
        }

        for (field, timeout) in [
            (
                "upstream.request_timeout_seconds",
                self.upstream.request_timeout_seconds,
            ),
            ("catalog.timeout_seconds", self.catalog.timeout_seconds),
        ] {
            if timeout == 0 {
                return Err(AppError::Config(format!(
                    "{} must be greater than 0",
                    field
                )));
            }
            if timeout > MAX_TIMEOUT_SECONDS {
                return Err(AppError::Config(format!(
                    "{} cannot exceed {} seconds, got {}",
                    field, MAX_TIMEOUT_SECONDS, timeout
                )));
            }
        }

        // Randomizer
        let randomizer = &self.randomizer;
        if randomizer.max_retry_attempts > MAX_RETRY_ATTEMPTS {
            return Err(AppError::Config(format!(
                "randomizer.max_retry_attempts cannot exceed {}, got {}",
                MAX_RETRY_ATTEMPTS, randomizer.max_retry_attempts
            )));
        }

        if let Some(fallback) = &randomizer.fallback_model {
            if fallback.is_blank() {
                return Err(AppError::Config(
                    "randomizer.fallback_model must not be blank (omit it to disable the fallback)"
                        .to_string(),
                ));
            }
        }

        for status in &randomizer.retry_on_status {
            if !(400..=599).contains(status) {
                return Err(AppError::Config(format!(
                    "randomizer.retry_on_status entry {} is not an HTTP error status (400-599)",
                    status
                )));
            }
        }

        if randomizer.default_selection.iter().any(ModelId::is_blank) {
            return Err(AppError::Config(
                "randomizer.default_selection must not contain blank model ids".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
