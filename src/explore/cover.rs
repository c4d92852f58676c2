use super::{Decision, Exploration, bandit_record, check_actions, finish};
use crate::error::{ExploreError, Result};
use crate::estimator::estimated_costs;
use crate::label::{
    BanditCost, BanditLabel, CostSensitiveLabel, Example, Label, checked_action, multiclass_loss,
};
use crate::learner::Learner;
use crate::sampler::sample_categorical;

/// Offset of the first oracle; oracle `i` lives at `ORACLE_OFFSET + i`.
pub const ORACLE_OFFSET: usize = 2;

/// Weight of the diversity term in the oracles' adjusted costs.
const DIVERSITY_WEIGHT: f64 = 0.125;

/// Cover policy - mixes the choices of `bags` cost-sensitive oracles with a
/// decaying uniform floor, and trains each oracle to disagree with the ones
/// before it
///
/// On round `t` the mixture puts `epsilon / sqrt(t) / k` on every class plus
/// `(1 - epsilon / sqrt(t)) / bags` on each oracle's choice. The round counter
/// advances on every call, prediction or training.
#[derive(Clone, Debug)]
pub struct Cover<O> {
    k: u32,
    bags: usize,
    epsilon: f64,
    counter: u64,
    oracle: O,
    distribution: Vec<f64>,
    predictions: Vec<u32>,
}

impl<O: Learner> Cover<O> {
    /// Creates a cover policy with `bags` oracles multiplexed in `oracle`
    pub fn new(k: u32, bags: usize, epsilon: f64, oracle: O) -> Result<Self> {
        check_actions(k)?;
        if bags == 0 {
            return Err(ExploreError::invalid("cover needs at least one oracle"));
        }
        if !(epsilon > 0.0 && epsilon <= 1.0) {
            return Err(ExploreError::invalid(format!(
                "cover epsilon must be in (0, 1], got {epsilon}"
            )));
        }
        tracing::debug!(k, bags, epsilon, "cover exploration");
        Ok(Self {
            k,
            bags,
            epsilon,
            counter: 0,
            oracle,
            distribution: vec![0.0; k as usize],
            predictions: vec![0; bags],
        })
    }

    /// Rounds processed so far
    pub fn rounds(&self) -> u64 {
        self.counter
    }

    /// Exploration rate of the most recent round
    pub fn round_epsilon(&self) -> f64 {
        self.epsilon / (self.counter.max(1) as f64).sqrt()
    }

    /// Mixture the most recent action was sampled from; index 0 is class 1
    pub fn distribution(&self) -> &[f64] {
        &self.distribution
    }

    /// Each oracle's choice on the most recent example
    pub fn oracle_choices(&self) -> &[u32] {
        &self.predictions
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
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

        self.counter += 1;
        let round_epsilon = self.round_epsilon();
        let base_prob = round_epsilon / f64::from(self.k);
        let additive = (1.0 - round_epsilon) / self.bags as f64;

        self.distribution.fill(base_prob);
        {
            let mut scoped =
                example.override_label(Label::CostSensitive(CostSensitiveLabel::unknown(self.k)));
            for (i, choice) in self.predictions.iter_mut().enumerate() {
                let prediction = self.oracle.predict(&mut scoped, ORACLE_OFFSET + i)?;
                *choice = checked_action(prediction, self.k)?;
                self.distribution[*choice as usize - 1] += additive;
            }
        }
        debug_assert!((self.distribution.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let action = sample_categorical(&self.distribution, rng);
        let probability = self.distribution[action as usize - 1];
        let record = bandit_record(multiclass_loss(label, action), action, probability);

        if learn {
            self.update(base, example, record, base_prob, additive)?;
        }

        tracing::trace!(action, probability, round_epsilon, "cover");
        Ok(finish(example, action, record.cost))
    }

    /// Trains the base learner on the observation, then each oracle in
    /// ascending offset order on diversity-adjusted cost estimates.
    fn update<L>(
        &mut self,
        base: &mut L,
        example: &mut Example,
        record: BanditCost,
        base_prob: f64,
        additive: f64,
    ) -> Result<()>
    where
        L: Learner + ?Sized,
    {
        let estimates = {
            let mut scoped = example.override_label(Label::Bandit(BanditLabel::observed(record)));
            base.learn(&mut scoped, 0)?;
            estimated_costs(base, &scoped, &record, self.k)?
        };

        let oracle = &mut self.oracle;
        self.predictions.iter().enumerate().try_fold(
            MixtureMass::uniform(self.k, base_prob),
            |mut mass, (i, &choice)| -> Result<MixtureMass> {
                let adjusted = mass.adjusted_costs(&estimates, base_prob);
                let mut scoped = example.override_label(Label::CostSensitive(adjusted));
                oracle.learn(&mut scoped, ORACLE_OFFSET + i)?;
                mass.add(choice, additive);
                Ok(mass)
            },
        )?;
        Ok(())
    }
}

/// Mixture mass accumulated over the oracles processed so far.
#[derive(Clone, Debug)]
struct MixtureMass {
    mass: Vec<f64>,
    norm: f64,
}

impl MixtureMass {
    fn uniform(k: u32, base_prob: f64) -> Self {
        Self {
            mass: vec![base_prob; k as usize],
            norm: base_prob * f64::from(k),
        }
    }

    /// Estimated costs minus a bonus that grows as a class's share of the
    /// accumulated mass shrinks
    fn adjusted_costs(&self, estimates: &CostSensitiveLabel, base_prob: f64) -> CostSensitiveLabel {
        CostSensitiveLabel::from_costs(estimates.costs.iter().zip(&self.mass).map(
            |(estimate, &mass)| {
                estimate.cost - DIVERSITY_WEIGHT * (base_prob / (mass / self.norm) + 1.0)
            },
        ))
    }

    fn add(&mut self, choice: u32, additive: f64) {
        self.mass[choice as usize - 1] += additive;
        self.norm += additive;
    }
}

impl<O: Learner> Exploration for Cover<O> {
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
