//! Exploration policies that turn full-information examples into bandit feedback.
//!
//! Each policy reads the example's true label, decides an action under
//! uncertainty, optionally trains the base learner on the resulting bandit
//! observation, and writes the realized action and its loss back into the
//! example.

mod bagging;
mod cover;
mod epsilon_greedy;
mod tau_first;

pub use bagging::Bagging;
pub use cover::{Cover, ORACLE_OFFSET};
pub use epsilon_greedy::EpsilonGreedy;
pub use tau_first::TauFirst;

use crate::error::{ExploreError, Result};
use crate::label::{BanditCost, Example};
use crate::learner::Learner;

/// Outcome of processing one example.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    /// Realized action in `[1, k]`
    pub action: u32,
    /// Zero-one loss of the action against the true label
    pub loss: f64,
}

/// Common interface of the exploration policies.
///
/// `predict` never trains; `learn` may issue any number of training calls
/// (including none) depending on the policy. Both always return an action.
/// `rng` is the uniform source every random decision is drawn from.
pub trait Exploration {
    /// Choose an action without any training side effect
    fn predict<L>(
        &mut self,
        base: &mut L,
        example: &mut Example,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Decision>
    where
        L: Learner + ?Sized;

    /// Choose an action and train on the resulting bandit feedback
    fn learn<L>(
        &mut self,
        base: &mut L,
        example: &mut Example,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Decision>
    where
        L: Learner + ?Sized;
}

/// Builds the bandit record for a realized action.
///
/// # Panics
/// If `probability` is not in `(0, 1]`: the importance weight of the record
/// would be undefined and every estimate built on it biased.
pub(crate) fn bandit_record(loss: f64, action: u32, probability: f64) -> BanditCost {
    assert!(
        probability > 0.0 && probability <= 1.0 + 1e-9,
        "realized action {action} has probability {probability} outside (0, 1]"
    );
    BanditCost {
        cost: loss,
        action,
        probability,
    }
}

/// Writes the decision into the example's output slots.
pub(crate) fn finish(example: &mut Example, action: u32, loss: f64) -> Decision {
    example.prediction = action;
    example.loss = loss;
    Decision { action, loss }
}

pub(crate) fn check_actions(k: u32) -> Result<()> {
    if k < 2 {
        return Err(ExploreError::invalid(format!(
            "number of actions must be at least 2, got {k}"
        )));
    }
    Ok(())
}
