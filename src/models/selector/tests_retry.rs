//! Retry sequence tests
//!
//! Tests the lazy retry sequence: attempt bounds, distinctness, exclusion of
//! the failed model and early termination.

use super::*;
use std::collections::HashSet;

#[test]
fn test_retry_sequence_yields_distinct_models_without_failed() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c", "d"]);
    let failed = ModelId::from("a");

    let retries: Vec<&ModelId> = selector.retry_sequence(&pool, &failed, 3).collect();

    assert_eq!(retries.len(), 3);
    let unique: HashSet<&str> = retries.iter().map(|id| id.as_str()).collect();
    assert_eq!(unique.len(), 3, "retries must be distinct: {:?}", retries);
    assert!(!unique.contains("a"), "failed model must never be retried");
    assert!(unique.is_subset(&HashSet::from(["b", "c", "d"])));
}

#[test]
fn test_retry_sequence_stops_when_candidates_exhausted() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c"]);

    let retries: Vec<&ModelId> = selector
        .retry_sequence(&pool, &ModelId::from("b"), 10)
        .collect();

    assert_eq!(retries.len(), 2);
}

#[test]
fn test_retry_sequence_respects_max_attempts() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c", "d", "e", "f"]);

    let retries = selector.retry_sequence(&pool, &ModelId::from("a"), 2);
    assert_eq!(retries.len(), 2);
    assert_eq!(retries.count(), 2);
}

#[test]
fn test_retry_sequence_zero_attempts_is_empty() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b"]);

    assert_eq!(selector.retry_sequence(&pool, &ModelId::from("a"), 0).count(), 0);
}

#[test]
fn test_retry_sequence_single_model_pool_is_empty() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a"]);

    assert_eq!(selector.retry_sequence(&pool, &ModelId::from("a"), 3).count(), 0);
}

#[test]
fn test_retry_sequence_failed_outside_pool_uses_whole_pool() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b"]);

    let retries: HashSet<&str> = selector
        .retry_sequence(&pool, &ModelId::from("gone"), 5)
        .map(ModelId::as_str)
        .collect();

    assert_eq!(retries, HashSet::from(["a", "b"]));
}

#[test]
fn test_retry_sequence_is_fused() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b"]);
    let mut retries = selector.retry_sequence_with(&pool, &ModelId::from("a"), 5, seeded_rng(5));

    assert_eq!(retries.next().map(ModelId::as_str), Some("b"));
    assert!(retries.next().is_none());
    assert!(retries.next().is_none());
}

#[test]
fn test_each_call_starts_fresh_exclusion_set() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c"]);
    let failed = ModelId::from("a");

    let first: HashSet<&str> = selector
        .retry_sequence(&pool, &failed, 2)
        .map(ModelId::as_str)
        .collect();
    let second: HashSet<&str> = selector
        .retry_sequence(&pool, &failed, 2)
        .map(ModelId::as_str)
        .collect();

    // A second sequence is not affected by what the first one yielded
    assert_eq!(first, HashSet::from(["b", "c"]));
    assert_eq!(second, HashSet::from(["b", "c"]));
}
