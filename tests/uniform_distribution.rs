//! Statistical tests for uniform selection
//!
//! Seeded generators keep these deterministic; the tolerances are wide
//! enough that any fair generator passes and a biased one does not.

use model_roulette::models::{ExclusionSet, ModelId, ModelSelector, Pool};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;

const DRAWS: usize = 10_000;

fn count_picks<'a>(
    draws: usize,
    mut pick: impl FnMut() -> Option<&'a ModelId>,
) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for _ in 0..draws {
        let model = pick().expect("pool is non-empty");
        *counts.entry(model.as_str()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_pick_three_models_is_roughly_uniform() {
    let pool: Pool = ["a", "b", "c"].into_iter().collect();
    let selector = ModelSelector::new();
    let mut rng = StdRng::seed_from_u64(2024);

    let counts = count_picks(DRAWS, || selector.pick_with(&pool, &mut rng));

    assert_eq!(counts.len(), 3);
    for (model, count) in &counts {
        // Expected 3333; 6 standard deviations is about 280
        assert!(
            (3000..=3700).contains(count),
            "{} picked {} times out of {}",
            model,
            count,
            DRAWS
        );
    }
}

#[test]
fn test_pick_with_thread_rng_covers_every_model() {
    let pool: Pool = ["a", "b", "c"].into_iter().collect();
    let selector = ModelSelector::new();

    let counts = count_picks(DRAWS, || selector.pick(&pool));

    assert_eq!(counts.len(), 3, "every model should be picked: {:?}", counts);
}

#[test]
fn test_pick_excluding_is_uniform_over_remaining_candidates() {
    let pool: Pool = ["a", "b", "c", "d"].into_iter().collect();
    let excluded: ExclusionSet = [ModelId::from("b")].into_iter().collect();
    let selector = ModelSelector::new();
    let mut rng = StdRng::seed_from_u64(99);

    let counts = count_picks(DRAWS, || {
        selector.pick_excluding_with(&pool, &excluded, &mut rng)
    });

    assert!(!counts.contains_key("b"));
    assert_eq!(counts.len(), 3);
    for (model, count) in &counts {
        assert!(
            (3000..=3700).contains(count),
            "{} picked {} times out of {}",
            model,
            count,
            DRAWS
        );
    }
}

#[test]
fn test_first_retry_is_uniform_over_other_models() {
    let pool: Pool = ["a", "b", "c"].into_iter().collect();
    let failed = ModelId::from("a");
    let selector = ModelSelector::new();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for seed in 0..DRAWS as u64 {
        let first = selector
            .retry_sequence_with(&pool, &failed, 1, StdRng::seed_from_u64(seed))
            .next()
            .expect("two candidates remain");
        *counts.entry(first.as_str()).or_insert(0) += 1;
    }

    assert!(!counts.contains_key("a"));
    for (model, count) in &counts {
        // Expected 5000
        assert!(
            (4600..=5400).contains(count),
            "{} was the first retry {} times out of {}",
            model,
            count,
            DRAWS
        );
    }
}
