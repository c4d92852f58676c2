use super::{Decision, Exploration, bandit_record, check_actions, finish};
use crate::error::{ExploreError, Result};
use crate::label::{BanditLabel, Example, Label, checked_action, multiclass_loss};
use crate::learner::Learner;
use crate::sampler::{Bootstrap, PoissonBootstrap, uniform_member};

/// Bagging policy - randomizes over the predictions of `bags` bootstrapped
/// replicas of the base learner, addressed at offsets `0..bags`
///
/// One replica is drawn uniformly to act. The probability recorded for the
/// realized action is the fraction of replicas that agree with it.
#[derive(Clone, Debug)]
pub struct Bagging<B = PoissonBootstrap> {
    k: u32,
    bags: usize,
    votes: Vec<u32>,
    bootstrap: B,
}

impl Bagging {
    /// Creates a bagging policy with Poisson(1) bootstrap replication
    pub fn new(k: u32, bags: usize) -> Result<Self> {
        Self::with_bootstrap(k, bags, PoissonBootstrap::new())
    }
}

impl<B: Bootstrap> Bagging<B> {
    /// Creates a bagging policy drawing replication counts from `bootstrap`
    pub fn with_bootstrap(k: u32, bags: usize, bootstrap: B) -> Result<Self> {
        check_actions(k)?;
        if bags == 0 {
            return Err(ExploreError::invalid("bagging needs at least one bag"));
        }
        tracing::debug!(k, bags, "bagging exploration");
        Ok(Self {
            k,
            bags,
            votes: vec![0; k as usize],
            bootstrap,
        })
    }

    /// Number of replicas
    pub fn bags(&self) -> usize {
        self.bags
    }

    /// Votes per class from the most recent example; index 0 is class 1
    pub fn votes(&self) -> &[u32] {
        &self.votes
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

        self.votes.fill(0);
        let acting = uniform_member(self.bags, rng);
        let mut action = 0;
        {
            let mut scoped = example.override_label(Label::unlabeled());
            for member in 0..self.bags {
                let prediction = checked_action(base.predict(&mut scoped, member)?, self.k)?;
                self.votes[prediction as usize - 1] += 1;
                if member == acting {
                    action = prediction;
                }
            }
        }

        let votes = self.votes[action as usize - 1];
        assert!(
            votes > 0,
            "acting bag {acting} predicted {action} but the action holds no votes"
        );
        let loss = multiclass_loss(label, action);

        if learn {
            let probability = f64::from(votes) / self.bags as f64;
            let record = bandit_record(loss, action, probability);
            let mut scoped = example.override_label(Label::Bandit(BanditLabel::observed(record)));
            for member in 0..self.bags {
                let count = self.bootstrap.replication_count(rng);
                for _ in 0..count {
                    base.learn(&mut scoped, member)?;
                }
            }
        }

        tracing::trace!(action, acting, votes, "bagging");
        Ok(finish(example, action, loss))
    }
}

impl<B: Bootstrap> Exploration for Bagging<B> {
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
