//! Prometheus metrics collection for model-roulette
//!
//! This module provides metrics instrumentation for tracking:
//! - Pick outcomes (picked, pool empty, disabled, skipped payloads)
//! - Upstream dispatch attempts by result
//! - Retries, fallback attempts and requests that exhausted every attempt
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Outcome of asking the selector for a model, for type-safe metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// A model was picked and substituted into the payload
    Picked,
    /// The active pool was empty, request forwarded unmodified
    PoolEmpty,
    /// Randomization is switched off, request forwarded unmodified
    Disabled,
    /// Payload is not a JSON object, request forwarded unmodified
    Skipped,
}

impl PickOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickOutcome::Picked => "picked",
            PickOutcome::PoolEmpty => "pool_empty",
            PickOutcome::Disabled => "disabled",
            PickOutcome::Skipped => "skipped",
        }
    }
}

/// Result of one upstream dispatch attempt, for type-safe metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    /// Upstream answered with a status that ends the request (2xx or non-retryable)
    Success,
    /// Upstream answered with a status listed in `retry_on_status`
    RetryableStatus,
    /// No response at all (connection failure, timeout)
    TransportError,
}

impl AttemptResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptResult::Success => "success",
            AttemptResult::RetryableStatus => "retryable_status",
            AttemptResult::TransportError => "transport_error",
        }
    }
}

/// Metrics collector for model-roulette
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    picks_total: IntCounterVec,
    attempts_total: IntCounterVec,
    retries_total: IntCounter,
    fallback_attempts_total: IntCounter,
    exhausted_total: IntCounter,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 4 outcomes
        let picks_total = IntCounterVec::new(
            Opts::new(
                "model_roulette_picks_total",
                "Total number of model picks by outcome",
            ),
            &["outcome"],
        )?;

        // Cardinality: 3 results
        let attempts_total = IntCounterVec::new(
            Opts::new(
                "model_roulette_dispatch_attempts_total",
                "Total number of upstream dispatch attempts by result",
            ),
            &["result"],
        )?;

        let retries_total = IntCounter::with_opts(Opts::new(
            "model_roulette_retries_total",
            "Total number of retry attempts with a replacement model",
        ))?;

        let fallback_attempts_total = IntCounter::with_opts(Opts::new(
            "model_roulette_fallback_attempts_total",
            "Total number of last-resort attempts with the configured fallback model",
        ))?;

        let exhausted_total = IntCounter::with_opts(Opts::new(
            "model_roulette_retries_exhausted_total",
            "Total number of requests that failed on every attempted model",
        ))?;

        registry.register(Box::new(picks_total.clone()))?;
        registry.register(Box::new(attempts_total.clone()))?;
        registry.register(Box::new(retries_total.clone()))?;
        registry.register(Box::new(fallback_attempts_total.clone()))?;
        registry.register(Box::new(exhausted_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            picks_total,
            attempts_total,
            retries_total,
            fallback_attempts_total,
            exhausted_total,
        })
    }

    pub fn record_pick(&self, outcome: PickOutcome) {
        self.picks_total.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn record_attempt(&self, result: AttemptResult) {
        self.attempts_total.with_label_values(&[result.as_str()]).inc();
    }

    pub fn record_retry(&self) {
        self.retries_total.inc();
    }

    pub fn record_fallback(&self) {
        self.fallback_attempts_total.inc();
    }

    pub fn record_exhausted(&self) {
        self.exhausted_total.inc();
    }

    pub fn picks_count(&self, outcome: PickOutcome) -> u64 {
        self.picks_total.with_label_values(&[outcome.as_str()]).get()
    }

    pub fn attempts_count(&self, result: AttemptResult) -> u64 {
        self.attempts_total.with_label_values(&[result.as_str()]).get()
    }

    pub fn retries_count(&self) -> u64 {
        self.retries_total.get()
    }

    pub fn fallback_count(&self) -> u64 {
        self.fallback_attempts_total.get()
    }

    pub fn exhausted_count(&self) -> u64 {
        self.exhausted_total.get()
    }

    /// Gather all metrics in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or produces invalid UTF-8.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Metrics output is not valid UTF-8: {}", e))
        })
    }
}
