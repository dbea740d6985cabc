//! Bounded, lazy sequence of replacement picks for retry-on-failure

use crate::models::model_id::ModelId;
use rand::Rng;
use std::iter::FusedIterator;

/// Lazy sequence of distinct replacement models
///
/// Created by [`ModelSelector::retry_sequence`](super::ModelSelector::retry_sequence).
/// Each call to `next` draws uniformly from the candidates not yet yielded,
/// so no identifier is produced twice. The sequence is finite: it stops after
/// `max_attempts` items or when candidates are exhausted, whichever comes
/// first. It cannot be restarted; ask the selector for a new one instead.
#[derive(Debug)]
pub struct RetrySequence<'a, R> {
    candidates: Vec<&'a ModelId>,
    remaining: usize,
    rng: R,
}

impl<'a, R: Rng> RetrySequence<'a, R> {
    pub(super) fn new(candidates: Vec<&'a ModelId>, max_attempts: usize, rng: R) -> Self {
        Self {
            candidates,
            remaining: max_attempts,
            rng,
        }
    }
}

impl<'a, R: Rng> Iterator for RetrySequence<'a, R> {
    type Item = &'a ModelId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.candidates.is_empty() {
            return None;
        }

        // swap_remove keeps the draw O(1); order of the leftovers is irrelevant
        let index = self.rng.random_range(0..self.candidates.len());
        let picked = self.candidates.swap_remove(index);
        self.remaining -= 1;

        tracing::debug!(
            model = %picked,
            attempts_left = self.remaining,
            candidates_left = self.candidates.len(),
            "Retry sequence yielded replacement model"
        );

        Some(picked)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining.min(self.candidates.len());
        (len, Some(len))
    }
}

impl<R: Rng> ExactSizeIterator for RetrySequence<'_, R> {}

impl<R: Rng> FusedIterator for RetrySequence<'_, R> {}
