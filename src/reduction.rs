use crate::config::{Config, Mode};
use crate::error::{ExploreError, Result};
use crate::explore::{Bagging, Cover, Decision, EpsilonGreedy, Exploration, TauFirst};
use crate::label::Example;
use crate::learner::Learner;

/// A multiclass-to-bandit reduction with a configured exploration policy
///
/// The `Reduction` owns the base learner and, for cover exploration, the
/// cost-sensitive oracle. Each call consumes one example, and the policy's
/// counters (the tau-first budget, the cover round counter) carry over from
/// one call to the next.
#[derive(Debug)]
pub struct Reduction<L, O = L> {
    config: Config,
    base: L,
    strategy: Strategy<O>,
}

#[derive(Debug)]
enum Strategy<O> {
    TauFirst(TauFirst),
    EpsilonGreedy(EpsilonGreedy),
    Bag(Bagging),
    Cover(Cover<O>),
}

impl<L, O> Reduction<L, O>
where
    L: Learner,
    O: Learner,
{
    /// Creates a reduction; `oracle` is required for cover and ignored otherwise
    pub fn new(config: Config, base: L, oracle: Option<O>) -> Result<Self> {
        config.validate()?;
        let k = config.actions;

        let strategy = match config.mode {
            Mode::TauFirst { tau } => Strategy::TauFirst(TauFirst::new(k, tau)?),
            Mode::EpsilonGreedy { epsilon } => {
                Strategy::EpsilonGreedy(EpsilonGreedy::new(k, epsilon)?)
            }
            Mode::Bag { bags } => Strategy::Bag(Bagging::new(k, bags)?),
            Mode::Cover { bags, epsilon } => {
                let oracle = oracle.ok_or(ExploreError::MissingOracle)?;
                Strategy::Cover(Cover::new(k, bags, epsilon, oracle)?)
            }
        };

        Ok(Self {
            config,
            base,
            strategy,
        })
    }

    /// Choose an action for the example without training
    pub fn predict(
        &mut self,
        example: &mut Example,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Decision> {
        let base = &mut self.base;
        match &mut self.strategy {
            Strategy::TauFirst(policy) => policy.predict(base, example, rng),
            Strategy::EpsilonGreedy(policy) => policy.predict(base, example, rng),
            Strategy::Bag(policy) => policy.predict(base, example, rng),
            Strategy::Cover(policy) => policy.predict(base, example, rng),
        }
    }

    /// Choose an action for the example and train on the bandit feedback
    pub fn learn(&mut self, example: &mut Example, rng: &mut dyn rand::RngCore) -> Result<Decision> {
        let base = &mut self.base;
        match &mut self.strategy {
            Strategy::TauFirst(policy) => policy.learn(base, example, rng),
            Strategy::EpsilonGreedy(policy) => policy.learn(base, example, rng),
            Strategy::Bag(policy) => policy.learn(base, example, rng),
            Strategy::Cover(policy) => policy.learn(base, example, rng),
        }
    }

    /// Gets the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets a reference to the base learner
    pub fn base(&self) -> &L {
        &self.base
    }

    /// Gets a mutable reference to the base learner
    pub fn base_mut(&mut self) -> &mut L {
        &mut self.base
    }

    /// Gets the cover oracle, if the reduction explores by cover
    pub fn oracle(&self) -> Option<&O> {
        match &self.strategy {
            Strategy::Cover(policy) => Some(policy.oracle()),
            _ => None,
        }
    }

    /// Tau-first exploration rounds left, if the reduction explores tau-first
    pub fn remaining_exploration(&self) -> Option<u64> {
        match &self.strategy {
            Strategy::TauFirst(policy) => Some(policy.remaining()),
            _ => None,
        }
    }
}

impl<L: Learner> Reduction<L> {
    /// Creates a reduction for a mode that needs no oracle
    pub fn with_base(config: Config, base: L) -> Result<Self> {
        Self::new(config, base, None)
    }
}
