//! Banditify: exploration reductions from multiclass examples to bandit feedback.
//!
//! Each example arrives with its true class, but the learner is only allowed to
//! see the loss of the one action the exploration policy picks. The policy
//! records the probability it picked that action with, so the feedback can be
//! importance-weighted into unbiased cost estimates. Four policies are
//! provided:
//!
//! - [`TauFirst`](explore::TauFirst): uniform exploration for a fixed budget, then exploit.
//! - [`EpsilonGreedy`](explore::EpsilonGreedy): exploit, exploring uniformly with probability epsilon.
//! - [`Bagging`](explore::Bagging): act on a random bootstrap replica; the agreement
//!   among replicas gives the probability.
//! - [`Cover`](explore::Cover): sample from a mixture of cost-sensitive oracles trained
//!   to disagree, with a decaying uniform floor.
//!
//! Learners are reached through the [`Learner`] trait, and every random
//! decision is drawn from a caller-supplied `rand::RngCore`.
//!
//! # Quick Start
//!
//! ```
//! use banditify::prelude::*;
//! use rand::SeedableRng;
//!
//! let config = Config::builder().actions(3).epsilon(0.1).build()?;
//! let learner = Csoaa::new(3, 2, 1.0)?;
//! let mut reduction = Reduction::with_base(config, learner)?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let mut example = Example::new(vec![1.0, 0.0], 2);
//! let decision = reduction.learn(&mut example, &mut rng)?;
//! assert!((1..=3).contains(&decision.action));
//! assert_eq!(example.prediction, decision.action);
//! # Ok::<(), banditify::ExploreError>(())
//! ```

pub mod config;
mod error;
pub mod estimator;
pub mod explore;
pub mod label;
mod learner;
pub mod linear;
mod reduction;
mod regression;
pub mod sampler;

// Re-export main types
pub use config::{Config, Mode};
pub use error::{ExploreError, Result};
pub use explore::{Decision, Exploration};
pub use label::Example;
pub use learner::Learner;
pub use reduction::Reduction;

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use banditify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, Mode};
    pub use crate::explore::{Bagging, Cover, Decision, EpsilonGreedy, Exploration, TauFirst};
    pub use crate::label::{BanditCost, CostSensitiveLabel, Example, Label};
    pub use crate::linear::Csoaa;
    pub use crate::{ExploreError, Learner, Reduction, Result};
}
