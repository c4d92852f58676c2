use rand::Rng;

use super::{Decision, Exploration, bandit_record, check_actions, finish};
use crate::error::{ExploreError, Result};
use crate::label::{BanditLabel, Example, Label, checked_action, multiclass_loss};
use crate::learner::Learner;
use crate::sampler::uniform_action;

/// Epsilon-greedy policy - acts on the base learner's prediction with
/// probability `1 - epsilon`, uniformly at random otherwise
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    k: u32,
    epsilon: f64,
}

impl EpsilonGreedy {
    /// Creates an epsilon-greedy policy over `k` actions
    pub fn new(k: u32, epsilon: f64) -> Result<Self> {
        check_actions(k)?;
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(ExploreError::invalid(format!(
                "epsilon must be between 0 and 1, got {epsilon}"
            )));
        }
        tracing::debug!(k, epsilon, "epsilon-greedy exploration");
        Ok(Self { k, epsilon })
    }

    /// Gets the epsilon value
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Probability of realizing the greedy action.
    ///
    /// The exploit branch picks it with probability `1 - epsilon`, and the
    /// explore branch can land on it too, adding `epsilon / k`.
    pub fn greedy_probability(&self) -> f64 {
        1.0 - self.epsilon + self.explore_probability()
    }

    /// Probability of realizing any particular non-greedy action
    pub fn explore_probability(&self) -> f64 {
        self.epsilon / f64::from(self.k)
    }

    fn predict_or_learn<L>(
        &mut self,
        base: &mut L,
        example: &mut Example,
        rng: &mut dyn rand::RngCore,
        learn: bool,
    ) -> Result<Decision>
    where
        L: Learner + ?Sized,
    {
        let label = example.true_label(self.k)?;

        let greedy = {
            let mut scoped = example.override_label(Label::unlabeled());
            base.predict(&mut scoped, 0)?
        };
        let greedy = checked_action(greedy, self.k)?;

        let u: f64 = rng.random();
        let (action, probability) = if u < 1.0 - self.epsilon {
            (greedy, self.greedy_probability())
        } else {
            let action = uniform_action(self.k, rng);
            if action == greedy {
                (action, self.greedy_probability())
            } else {
                (action, self.explore_probability())
            }
        };
        let record = bandit_record(multiclass_loss(label, action), action, probability);

        if learn {
            let mut scoped = example.override_label(Label::Bandit(BanditLabel::observed(record)));
            base.learn(&mut scoped, 0)?;
        }

        tracing::trace!(action, greedy, probability, "epsilon-greedy");
        Ok(finish(example, action, record.cost))
    }
}

impl Exploration for EpsilonGreedy {
    fn predict<L>(
        &mut self,
        base: &mut L,
        example: &mut Example,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Decision>
    where
        L: Learner + ?Sized,
    {
        self.predict_or_learn(base, example, rng, false)
    }

    fn learn<L>(
        &mut self,
        base: &mut L,
        example: &mut Example,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Decision>
    where
        L: Learner + ?Sized,
    {
        self.predict_or_learn(base, example, rng, true)
    }
}
