//! Exclusion set tests
//!
//! Tests exclusion set handling for retry logic: filtering out failed models,
//! behavior when all models are excluded, and exclusions outside the pool.

use super::*;

fn excluded(ids: &[&str]) -> ExclusionSet {
    ids.iter().map(|id| ModelId::from(*id)).collect()
}

#[test]
fn test_exclusion_filters_models() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c"]);
    let exclude = excluded(&["a", "c"]);

    for _ in 0..50 {
        let picked = selector
            .pick_excluding(&pool, &exclude)
            .expect("one candidate remains");
        assert_eq!(picked.as_str(), "b");
    }
}

#[test]
fn test_exclusion_of_all_models_returns_none() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b"]);

    assert!(selector.pick_excluding(&pool, &excluded(&["a", "b"])).is_none());
}

#[test]
fn test_exclusion_on_empty_pool_returns_none() {
    let selector = ModelSelector::new();
    assert!(
        selector
            .pick_excluding(&Pool::new(), &ExclusionSet::new())
            .is_none()
    );
}

#[test]
fn test_empty_exclusion_behaves_like_pick() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b", "c"]);
    let mut rng = seeded_rng(99);

    for _ in 0..50 {
        let picked = selector
            .pick_excluding_with(&pool, &ExclusionSet::new(), &mut rng)
            .expect("should pick");
        assert!(pool.contains(picked));
    }
}

#[test]
fn test_exclusions_outside_pool_are_ignored() {
    let selector = ModelSelector::new();
    let pool = pool_of(&["a", "b"]);
    let exclude = excluded(&["x", "y", "z"]);
    let mut rng = seeded_rng(3);

    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        let picked = selector
            .pick_excluding_with(&pool, &exclude, &mut rng)
            .expect("pool members are not excluded");
        seen.insert(picked.as_str());
    }
    assert_eq!(seen.len(), 2, "both pool members should be reachable");
}
