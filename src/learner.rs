//! The learner capability the exploration policies drive.

use crate::error::Result;
use crate::label::Example;

/// An incremental learner addressed by ensemble offset.
///
/// The policies never see a learner's internals: they set the example's label,
/// ask for a prediction or a training step at some offset, and read back a
/// class in `[1, k]`. Offsets select among multiplexed model instances that
/// share this one invocation interface. Bagging uses offsets `0..bags`, cover
/// trains its base learner at offset 0 and its oracles at `2..=bags + 1`.
pub trait Learner {
    /// Predict a class for the example using the instance at `offset`
    fn predict(&mut self, example: &mut Example, offset: usize) -> Result<u32>;

    /// Train the instance at `offset` on the label currently in the example
    fn learn(&mut self, example: &mut Example, offset: usize) -> Result<()>;

    /// Predicted cost of `action` on this example, used as the baseline of the
    /// doubly-robust cost estimate.
    ///
    /// Learners without a cost regressor keep the default of 0, which reduces
    /// the estimate to plain inverse propensity scoring.
    fn cost_prediction(&mut self, _example: &Example, _action: u32) -> Result<f64> {
        Ok(0.0)
    }
}

impl<L: Learner + ?Sized> Learner for &mut L {
    fn predict(&mut self, example: &mut Example, offset: usize) -> Result<u32> {
        (**self).predict(example, offset)
    }

    fn learn(&mut self, example: &mut Example, offset: usize) -> Result<()> {
        (**self).learn(example, offset)
    }

    fn cost_prediction(&mut self, example: &Example, action: u32) -> Result<f64> {
        (**self).cost_prediction(example, action)
    }
}

impl<L: Learner + ?Sized> Learner for Box<L> {
    fn predict(&mut self, example: &mut Example, offset: usize) -> Result<u32> {
        (**self).predict(example, offset)
    }

    fn learn(&mut self, example: &mut Example, offset: usize) -> Result<()> {
        (**self).learn(example, offset)
    }

    fn cost_prediction(&mut self, example: &Example, action: u32) -> Result<f64> {
        (**self).cost_prediction(example, action)
    }
}
