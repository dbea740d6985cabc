//! Basic selection tests
//!
//! Tests plain picks: membership, empty pools, single-element pools and
//! rough uniformity over a fixed seed.

use super::*;
use std::collections::HashMap;

#[test]
fn test_pick_returns_member_of_pool() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c"]);

    for _ in 0..100 {
        let picked = selector.pick(&pool).expect("non-empty pool should yield a pick");
        assert!(pool.contains(picked), "picked {} is not in the pool", picked);
    }
}

#[test]
fn test_pick_empty_pool_returns_none() {
    let selector = ModelSelector::new();
    assert!(selector.pick(&Pool::new()).is_none());
}

#[test]
fn test_pick_single_model_pool_always_returns_it() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["only"]);
    let mut rng = seeded_rng(7);

    for _ in 0..20 {
        assert_eq!(
            selector.pick_with(&pool, &mut rng).map(ModelId::as_str),
            Some("only")
        );
    }
}

#[test]
fn test_pick_does_not_mutate_pool() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c"]);
    let before = pool.clone();

    let _ = selector.pick(&pool);
    let _ = selector.pick_excluding(&pool, &ExclusionSet::new());
    let _ = selector.retry_sequence(&pool, &ModelId::from("a"), 3).count();

    assert_eq!(pool, before);
}

#[test]
fn test_pick_with_seeded_rng_is_reproducible() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c", "d", "e"]);

    let first: Vec<&ModelId> = {
        let mut rng = seeded_rng(42);
        (0..10).filter_map(|_| selector.pick_with(&pool, &mut rng)).collect()
    };
    let second: Vec<&ModelId> = {
        let mut rng = seeded_rng(42);
        (0..10).filter_map(|_| selector.pick_with(&pool, &mut rng)).collect()
    };

    assert_eq!(first, second);
}

#[test]
fn test_pick_covers_every_member_eventually() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c"]);
    let mut rng = seeded_rng(1234);
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for _ in 0..3000 {
        let picked = selector.pick_with(&pool, &mut rng).expect("should pick");
        *counts.entry(picked.as_str()).or_insert(0) += 1;
    }

    // Each model should land near 1000/3000; allow a wide margin
    for id in ["a", "b", "c"] {
        let count = counts.get(id).copied().unwrap_or(0);
        assert!(
            (800..=1200).contains(&count),
            "{} picked {} times out of 3000",
            id,
            count
        );
    }
}
