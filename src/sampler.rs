//! Action sampling from an external uniform source.
//!
//! Every draw goes through `rng.random::<f64>()` so that exactly one uniform
//! value in `[0, 1)` is consumed per decision.

use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Draws a class uniformly from `[1, k]`.
///
/// Maps `u` to `ceil(u * k)`, clamped so that `u == 0` still yields class 1.
pub fn uniform_action(k: u32, rng: &mut dyn rand::RngCore) -> u32 {
    let u: f64 = rng.random();
    action_index(k, u)
}

fn action_index(k: u32, u: f64) -> u32 {
    ((u * f64::from(k)).ceil() as u32).clamp(1, k)
}

/// Draws an ensemble member index uniformly from `[0, members)`.
pub fn uniform_member(members: usize, rng: &mut dyn rand::RngCore) -> usize {
    let u: f64 = rng.random();
    member_index(members, u)
}

fn member_index(members: usize, u: f64) -> usize {
    ((u * members as f64).floor() as usize).min(members.saturating_sub(1))
}

/// Draws a class from a distribution over `[1, weights.len()]`.
///
/// Walks the weights accumulating mass and returns the first class whose
/// cumulative mass strictly exceeds the draw, so a zero-weight class is never
/// returned. If rounding leaves the cumulative sum at or below the draw, the
/// last class with positive weight is returned instead; class 1 is the answer
/// only when every weight is zero.
pub fn sample_categorical(weights: &[f64], rng: &mut dyn rand::RngCore) -> u32 {
    let u: f64 = rng.random();
    categorical_index(weights, u)
}

fn categorical_index(weights: &[f64], u: f64) -> u32 {
    let mut cumulative = 0.0;
    for (class, &weight) in (1u32..).zip(weights) {
        cumulative += weight;
        if weight > 0.0 && u < cumulative {
            return class;
        }
    }

    (1u32..)
        .zip(weights)
        .filter(|(_, weight)| **weight > 0.0)
        .map(|(class, _)| class)
        .last()
        .unwrap_or(1)
}

/// Source of bootstrap replication counts for bagging.
///
/// Any generator of non-negative counts with mean 1 preserves the bootstrap
/// semantics: a replica that draws 0 skips the example, one that draws 3 trains
/// on it three times.
pub trait Bootstrap {
    /// Number of times one replica should train on the current example
    fn replication_count(&mut self, rng: &mut dyn rand::RngCore) -> u32;
}

/// Online bootstrap with Poisson(1) replication counts.
#[derive(Clone, Debug)]
pub struct PoissonBootstrap {
    dist: Option<Poisson<f64>>,
}

impl PoissonBootstrap {
    pub fn new() -> Self {
        Self {
            dist: Poisson::new(1.0).ok(),
        }
    }
}

impl Default for PoissonBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrap for PoissonBootstrap {
    fn replication_count(&mut self, rng: &mut dyn rand::RngCore) -> u32 {
        match &self.dist {
            Some(dist) => {
                let count: f64 = dist.sample(rng);
                count as u32
            }
            // Fall back to the mean
            None => 1,
        }
    }
}

/// Every replica trains exactly once on every example.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unweighted;

impl Bootstrap for Unweighted {
    fn replication_count(&mut self, _rng: &mut dyn rand::RngCore) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_action_stays_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let action = uniform_action(4, &mut rng);
            assert!((1..=4).contains(&action));
        }
    }

    #[test]
    fn test_uniform_action_is_uniform() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut counts = [0usize; 5];
        let n_samples = 30_000;
        for _ in 0..n_samples {
            counts[uniform_action(5, &mut rng) as usize - 1] += 1;
        }
        for count in counts {
            let proportion = count as f64 / n_samples as f64;
            assert!((proportion - 0.2).abs() < 0.02);
        }
    }

    #[test]
    fn test_uniform_draw_edges_stay_in_range() {
        let top = 1.0 - f64::EPSILON;
        assert_eq!(action_index(4, 0.0), 1);
        assert_eq!(action_index(4, top), 4);
        assert_eq!(action_index(4, 0.25), 1);
        assert_eq!(action_index(4, 0.26), 2);

        assert_eq!(member_index(3, 0.0), 0);
        assert_eq!(member_index(3, top), 2);
        assert_eq!(member_index(1, top), 0);
    }

    #[test]
    fn test_uniform_member_stays_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..1_000 {
            let member = uniform_member(3, &mut rng);
            assert!(member < 3);
            seen[member] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_categorical_walks_cumulative_mass() {
        let weights = [0.2, 0.5, 0.3];
        assert_eq!(categorical_index(&weights, 0.0), 1);
        assert_eq!(categorical_index(&weights, 0.19), 1);
        assert_eq!(categorical_index(&weights, 0.2), 2);
        assert_eq!(categorical_index(&weights, 0.69), 2);
        assert_eq!(categorical_index(&weights, 0.75), 3);
    }

    #[test]
    fn test_categorical_never_picks_zero_weight() {
        let weights = [0.0, 0.0, 1.0];
        assert_eq!(categorical_index(&weights, 0.0), 3);
        assert_eq!(categorical_index(&weights, 0.5), 3);
    }

    #[test]
    fn test_categorical_rounding_exhaustion_falls_back_to_last_positive() {
        // Mass sums short of the draw.
        let weights = [0.3, 0.3, 0.3, 0.0];
        assert_eq!(categorical_index(&weights, 0.95), 3);

        let weights = [0.0, 0.0];
        assert_eq!(categorical_index(&weights, 0.5), 1);
    }

    #[test]
    fn test_categorical_matches_distribution() {
        let weights = [0.1, 0.6, 0.3];
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let mut counts = [0usize; 3];
        let n_samples = 20_000;
        for _ in 0..n_samples {
            counts[sample_categorical(&weights, &mut rng) as usize - 1] += 1;
        }
        for (count, weight) in counts.iter().zip(weights) {
            let proportion = *count as f64 / n_samples as f64;
            assert!((proportion - weight).abs() < 0.02);
        }
    }

    #[test]
    fn test_poisson_bootstrap_has_unit_mean() {
        let mut bootstrap = PoissonBootstrap::new();
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let n_samples = 20_000;
        let total: u64 = (0..n_samples)
            .map(|_| u64::from(bootstrap.replication_count(&mut rng)))
            .sum();
        let mean = total as f64 / n_samples as f64;
        assert!((mean - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_poisson_distribution_is_built_once() {
        let bootstrap = PoissonBootstrap::default();
        assert!(bootstrap.dist.is_some());

        let mut copy = bootstrap.clone();
        let mut rng = rand::rngs::StdRng::seed_from_u64(6);
        let draws: Vec<u32> = (0..50).map(|_| copy.replication_count(&mut rng)).collect();
        assert!(draws.iter().any(|c| *c != 1));
    }

    #[test]
    fn test_unweighted_bootstrap() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        assert_eq!(Unweighted.replication_count(&mut rng), 1);
    }
}
