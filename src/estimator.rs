//! Unbiased per-class cost estimates from a single bandit observation.

use crate::error::Result;
use crate::label::{BanditCost, CostSensitiveLabel, Example};
use crate::learner::Learner;

/// Doubly-robust cost estimate for `action`.
///
/// For the observed action the baseline is corrected by the inverse-propensity
/// residual `(observed.cost - base_cost) / observed.probability`; every other
/// action keeps its baseline. Provided `observed.probability` is the exact
/// probability the action was sampled with, the expectation over the sampling
/// equals the true expected cost of `action`.
pub fn estimate_cost(observed: &BanditCost, base_cost: f64, action: u32) -> f64 {
    debug_assert!(observed.probability > 0.0);
    if observed.action == action {
        base_cost + (observed.cost - base_cost) / observed.probability
    } else {
        base_cost
    }
}

/// Estimated costs for all `k` classes, with baselines read from `learner`.
pub fn estimated_costs<L>(
    learner: &mut L,
    example: &Example,
    observed: &BanditCost,
    k: u32,
) -> Result<CostSensitiveLabel>
where
    L: Learner + ?Sized,
{
    let costs = (1..=k)
        .map(|action| {
            let base_cost = learner.cost_prediction(example, action)?;
            Ok(estimate_cost(observed, base_cost, action))
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(CostSensitiveLabel::from_costs(costs))
}
