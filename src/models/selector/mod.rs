//! Uniform random model selection with exclusion support
//!
//! The selector is a pure function over its inputs plus a source of
//! randomness. It keeps no state between calls and never mutates the pool.
//!
//! Production code is in this file and `retry.rs`, tests are organized in sibling modules:
//! - tests_pick: Basic selection, empty pools, uniformity
//! - tests_exclusion: Exclusion set handling
//! - tests_retry: Retry sequence bounds and distinctness

mod retry;

pub use retry::RetrySequence;

use crate::models::model_id::{ExclusionSet, ModelId};
use crate::models::pool::Pool;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Picks model identifiers uniformly at random from a pool
///
/// Every operation has a `*_with` variant taking an explicit random source, so
/// tests can inject a seeded generator. Absence of candidates is always
/// reported as `None`; the selector itself never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelSelector;

impl ModelSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick a uniformly random element of `pool`
    ///
    /// Returns `None` if the pool is empty.
    pub fn pick<'a>(&self, pool: &'a Pool) -> Option<&'a ModelId> {
        self.pick_with(pool, &mut rand::rng())
    }

    /// Same as [`pick`](Self::pick) with an explicit random source
    pub fn pick_with<'a, R>(&self, pool: &'a Pool, rng: &mut R) -> Option<&'a ModelId>
    where
        R: Rng + ?Sized,
    {
        let picked = pool.as_slice().choose(rng);
        match picked {
            Some(id) => tracing::debug!(
                model = %id,
                pool_size = pool.len(),
                "Picked model from pool"
            ),
            None => tracing::debug!("Pool is empty, nothing to pick"),
        }
        picked
    }

    /// Pick a uniformly random element of `pool - excluded`
    ///
    /// Returns `None` if every pool member is excluded (or the pool is empty).
    pub fn pick_excluding<'a>(
        &self,
        pool: &'a Pool,
        excluded: &ExclusionSet,
    ) -> Option<&'a ModelId> {
        self.pick_excluding_with(pool, excluded, &mut rand::rng())
    }

    /// Same as [`pick_excluding`](Self::pick_excluding) with an explicit random source
    pub fn pick_excluding_with<'a, R>(
        &self,
        pool: &'a Pool,
        excluded: &ExclusionSet,
        rng: &mut R,
    ) -> Option<&'a ModelId>
    where
        R: Rng + ?Sized,
    {
        let candidates = pool.without(excluded);

        if candidates.is_empty() {
            tracing::debug!(
                pool_size = pool.len(),
                excluded_count = excluded.len(),
                "No candidates left after exclusion"
            );
            return None;
        }

        let picked = candidates.choose(rng).copied();
        if let Some(id) = picked {
            tracing::debug!(
                model = %id,
                pool_size = pool.len(),
                excluded_count = excluded.len(),
                candidates = candidates.len(),
                "Picked model from pool excluding already-tried models"
            );
        }
        picked
    }

    /// Lazily produce up to `max_attempts` replacement picks after `failed`
    ///
    /// Each yielded identifier excludes `failed` and everything yielded
    /// before it. The sequence ends early once candidates run out. It is
    /// seeded from the OS so it can be held across `.await` points.
    pub fn retry_sequence<'a>(
        &self,
        pool: &'a Pool,
        failed: &ModelId,
        max_attempts: usize,
    ) -> RetrySequence<'a, StdRng> {
        self.retry_sequence_with(pool, failed, max_attempts, StdRng::from_os_rng())
    }

    /// Same as [`retry_sequence`](Self::retry_sequence) with an explicit random source
    pub fn retry_sequence_with<'a, R: Rng>(
        &self,
        pool: &'a Pool,
        failed: &ModelId,
        max_attempts: usize,
        rng: R,
    ) -> RetrySequence<'a, R> {
        let mut excluded = ExclusionSet::new();
        excluded.insert(failed.clone());
        RetrySequence::new(pool.without(&excluded), max_attempts, rng)
    }
}

// Test modules
#[cfg(test)]
mod tests_exclusion;
#[cfg(test)]
mod tests_pick;
#[cfg(test)]
mod tests_retry;

/// Shared test helper: build a pool from string literals
#[cfg(test)]
pub(crate) fn pool_of(ids: &[&str]) -> Pool {
    ids.iter().copied().collect()
}

/// Shared test helper: deterministic generator for reproducible tests
#[cfg(test)]
pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
