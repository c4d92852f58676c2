//! Property tests for the exploration invariants.

mod common;

use banditify::explore::{Bagging, Cover, Exploration, ORACLE_OFFSET};
use banditify::{Config, Example, Mode, Reduction};
use common::RecordingLearner;
use proptest::prelude::*;
use rand::SeedableRng;

fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop_oneof![
        (0u64..20).prop_map(|tau| Mode::TauFirst { tau }),
        (0.0f64..=1.0).prop_map(|epsilon| Mode::EpsilonGreedy { epsilon }),
        (1usize..6).prop_map(|bags| Mode::Bag { bags }),
        (1usize..6, 0.01f64..=1.0).prop_map(|(bags, epsilon)| Mode::Cover { bags, epsilon }),
    ]
}

/// Folds arbitrary class ids into `[1, k]`
fn fold_classes(raw: &[u32], k: u32) -> Vec<u32> {
    raw.iter().map(|c| c % k + 1).collect()
}

proptest! {
    /// Every decision is a valid class, its loss is the zero-one loss, and
    /// every bandit record carries a probability in (0, 1].
    #[test]
    fn decisions_and_records_are_well_formed(
        k in 2u32..8,
        mode in mode_strategy(),
        raw in prop::collection::vec(any::<u32>(), 8),
        labels in prop::collection::vec(any::<u32>(), 1..30),
        seed in any::<u64>(),
    ) {
        let config = Config::new(k, mode).unwrap();
        let classes = fold_classes(&raw, k);
        let base = RecordingLearner::per_offset(0, &classes);
        let oracle = RecordingLearner::per_offset(0, &classes);
        let mut reduction = Reduction::new(config, base, Some(oracle)).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        for label in fold_classes(&labels, k) {
            let mut ex = Example::new(vec![], label);
            let decision = reduction.learn(&mut ex, &mut rng).unwrap();

            prop_assert!((1..=k).contains(&decision.action));
            prop_assert_eq!(ex.prediction, decision.action);
            let expected = if decision.action == label { 0.0 } else { 1.0 };
            prop_assert_eq!(decision.loss, expected);
        }

        for (_, record) in reduction.base().bandit_records() {
            prop_assert!((1..=k).contains(&record.action));
            prop_assert!(record.probability > 0.0 && record.probability <= 1.0 + 1e-9,
                "probability {} outside (0, 1]", record.probability);
        }
    }

    /// Prediction never trains, whatever the mode.
    #[test]
    fn prediction_has_no_training_side_effect(
        k in 2u32..8,
        mode in mode_strategy(),
        raw in prop::collection::vec(any::<u32>(), 8),
        seed in any::<u64>(),
    ) {
        let config = Config::new(k, mode).unwrap();
        let classes = fold_classes(&raw, k);
        let base = RecordingLearner::per_offset(0, &classes);
        let oracle = RecordingLearner::per_offset(0, &classes);
        let mut reduction = Reduction::new(config, base, Some(oracle)).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        for label in 1..=k {
            let mut ex = Example::new(vec![], label);
            reduction.predict(&mut ex, &mut rng).unwrap();
        }
        prop_assert!(reduction.base().learned.is_empty());
        if let Some(oracle) = reduction.oracle() {
            prop_assert!(oracle.learned.is_empty());
        }
    }

    /// Bag votes always total the ensemble size.
    #[test]
    fn bag_votes_sum_to_bag_count(
        k in 2u32..8,
        bags in 1usize..10,
        raw in prop::collection::vec(any::<u32>(), 10),
        seed in any::<u64>(),
    ) {
        let mut policy = Bagging::new(k, bags).unwrap();
        let mut base = RecordingLearner::per_offset(0, &fold_classes(&raw, k));
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        let mut ex = Example::new(vec![], 1);
        let decision = policy.learn(&mut base, &mut ex, &mut rng).unwrap();
        prop_assert_eq!(policy.votes().iter().sum::<u32>() as usize, bags);
        prop_assert!(policy.votes()[decision.action as usize - 1] > 0);
    }

    /// The cover mixture is a distribution with the uniform floor everywhere.
    #[test]
    fn cover_mixture_is_a_distribution(
        k in 2u32..8,
        bags in 1usize..6,
        epsilon in 0.01f64..=1.0,
        raw in prop::collection::vec(any::<u32>(), 6),
        rounds in 1usize..20,
        seed in any::<u64>(),
    ) {
        let oracle = RecordingLearner::per_offset(ORACLE_OFFSET, &fold_classes(&raw, k));
        let mut policy = Cover::new(k, bags, epsilon, oracle).unwrap();
        let mut base = RecordingLearner::constant(1);
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

        for _ in 0..rounds {
            let mut ex = Example::new(vec![], k);
            policy.learn(&mut base, &mut ex, &mut rng).unwrap();

            let total: f64 = policy.distribution().iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9, "mixture sums to {}", total);
            let floor = policy.round_epsilon() / f64::from(k);
            prop_assert!(policy.distribution().iter().all(|p| *p >= floor - 1e-12));
        }
        prop_assert_eq!(policy.rounds(), rounds as u64);
    }
}
