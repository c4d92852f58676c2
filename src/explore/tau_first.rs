use super::{Decision, Exploration, bandit_record, check_actions, finish};
use crate::error::Result;
use crate::label::{BanditLabel, Example, Label, checked_action, multiclass_loss};
use crate::learner::Learner;
use crate::sampler::uniform_action;

/// Tau-first policy - explores uniformly for the first `tau` training rounds,
/// then acts on the base learner's prediction without further training
#[derive(Clone, Debug)]
pub struct TauFirst {
    k: u32,
    tau: u64,
}

impl TauFirst {
    /// Creates a tau-first policy over `k` actions with an exploration budget of `tau`
    pub fn new(k: u32, tau: u64) -> Result<Self> {
        check_actions(k)?;
        tracing::debug!(k, tau, "tau-first exploration");
        Ok(Self { k, tau })
    }

    /// Exploration rounds left
    pub fn remaining(&self) -> u64 {
        self.tau
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

        if learn && self.tau > 0 {
            let action = uniform_action(self.k, rng);
            let record = bandit_record(
                multiclass_loss(label, action),
                action,
                1.0 / f64::from(self.k),
            );
            self.tau -= 1;

            let mut scoped = example.override_label(Label::Bandit(BanditLabel::observed(record)));
            base.learn(&mut scoped, 0)?;
            drop(scoped);

            tracing::trace!(action, remaining = self.tau, "tau-first explore");
            return Ok(finish(example, action, record.cost));
        }

        let prediction = {
            let mut scoped = example.override_label(Label::unlabeled());
            base.predict(&mut scoped, 0)?
        };
        let action = checked_action(prediction, self.k)?;
        tracing::trace!(action, "tau-first exploit");
        Ok(finish(example, action, multiclass_loss(label, action)))
    }
}

impl Exploration for TauFirst {
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
