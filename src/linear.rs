//! Reference linear learner for driving the exploration policies.

use std::collections::HashMap;

use crate::error::{ExploreError, Result};
use crate::label::{CostSensitiveLabel, Example, Label, multiclass_loss};
use crate::learner::Learner;
use crate::regression::OnlineRidge;

/// Cost-sensitive one-against-all learner
///
/// Keeps one ridge regression per (offset, class) predicting that class's cost
/// and predicts the class of lowest predicted cost, ties going to the lowest
/// class. It trains on every label kind the reductions produce:
///
/// - cost-sensitive labels regress each class with a known cost;
/// - bandit labels regress the inverse-propensity cost vector, where the
///   observed action gets `cost / probability` and every other class 0;
/// - multiclass labels regress zero-one costs.
///
/// Because the offset-0 regressors predict costs, `cost_prediction` makes the
/// cover policy's estimates doubly robust. The same instance can serve as base
/// learner and, at offsets `2..`, as the cover oracle.
#[derive(Debug, Clone)]
pub struct Csoaa {
    k: u32,
    num_features: usize,
    l2_lambda: f64,
    models: HashMap<(usize, u32), OnlineRidge>,
}

impl Csoaa {
    /// Creates a learner over `k` classes and `num_features` dense features
    ///
    /// # Arguments
    /// * `l2_lambda` - L2 regularization parameter (typically 1.0)
    pub fn new(k: u32, num_features: usize, l2_lambda: f64) -> Result<Self> {
        if k < 2 {
            return Err(ExploreError::invalid("csoaa needs at least 2 classes"));
        }
        if l2_lambda <= 0.0 {
            return Err(ExploreError::invalid(format!(
                "l2_lambda must be positive, got {l2_lambda}"
            )));
        }
        Ok(Self {
            k,
            num_features,
            l2_lambda,
            models: HashMap::new(),
        })
    }

    /// Predicted cost of `class` for the instance at `offset`
    pub fn predicted_cost(&self, offset: usize, class: u32, features: &[f64]) -> f64 {
        self.models
            .get(&(offset, class))
            .map_or(0.0, |model| model.predict(features))
    }

    /// Number of regressors created so far
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    fn check_features(&self, example: &Example) -> Result<()> {
        if example.features.len() != self.num_features {
            return Err(ExploreError::DimensionMismatch {
                expected: self.num_features,
                got: example.features.len(),
            });
        }
        Ok(())
    }

    fn fit(&mut self, offset: usize, class: u32, features: &[f64], cost: f64) {
        let (num_features, l2_lambda) = (self.num_features, self.l2_lambda);
        self.models
            .entry((offset, class))
            .or_insert_with(|| OnlineRidge::new(num_features, l2_lambda))
            .update(features, cost);
    }

    /// Cost targets per class for the label in the example; `None` skips a class
    fn targets(&self, label: &Label) -> Result<Vec<Option<f64>>> {
        let classes = 1..=self.k;
        let targets = match label {
            Label::CostSensitive(ld) => {
                let mut targets = vec![None; self.k as usize];
                let known = ld
                    .costs
                    .iter()
                    .filter(|c| c.cost != CostSensitiveLabel::UNKNOWN_COST);
                for c in known {
                    let index = (c.class as usize)
                        .checked_sub(1)
                        .filter(|&index| index < targets.len())
                        .ok_or(ExploreError::ActionOutOfRange {
                            action: c.class,
                            k: self.k,
                        })?;
                    targets[index] = Some(c.cost);
                }
                targets
            }
            Label::Bandit(ld) => match ld.observation() {
                Some(observed) => classes
                    .map(|class| {
                        Some(if class == observed.action {
                            observed.cost / observed.probability
                        } else {
                            0.0
                        })
                    })
                    .collect(),
                None => vec![None; self.k as usize],
            },
            Label::Multiclass(ld) => classes
                .map(|class| Some(multiclass_loss(ld.label, class)))
                .collect(),
        };
        Ok(targets)
    }
}

impl Learner for Csoaa {
    fn predict(&mut self, example: &mut Example, offset: usize) -> Result<u32> {
        self.check_features(example)?;
        let mut best = 1;
        let mut best_cost = f64::INFINITY;
        for class in 1..=self.k {
            let cost = self.predicted_cost(offset, class, &example.features);
            if cost < best_cost {
                best = class;
                best_cost = cost;
            }
        }
        Ok(best)
    }

    fn learn(&mut self, example: &mut Example, offset: usize) -> Result<()> {
        self.check_features(example)?;
        let targets = self.targets(example.label())?;
        for (class, target) in (1u32..).zip(targets) {
            if let Some(cost) = target {
                self.fit(offset, class, &example.features, cost);
            }
        }
        Ok(())
    }

    fn cost_prediction(&mut self, example: &Example, action: u32) -> Result<f64> {
        self.check_features(example)?;
        Ok(self.predicted_cost(0, action, &example.features))
    }
}
