//! Exploration configuration and the options that select it.

use serde::{Deserialize, Serialize};

use crate::error::{ExploreError, Result};
use crate::explore::ORACLE_OFFSET;

/// Exploration rate used when none is supplied.
pub const DEFAULT_EPSILON: f64 = 0.05;

/// Exploration strategy and its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    /// Explore uniformly for `tau` training rounds, then exploit
    TauFirst { tau: u64 },
    /// Explore uniformly with probability `epsilon`
    EpsilonGreedy { epsilon: f64 },
    /// Randomize over `bags` bootstrapped replicas
    Bag { bags: usize },
    /// Mix `bags` diversity-trained oracles with a decaying uniform floor
    Cover { bags: usize, epsilon: f64 },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::EpsilonGreedy {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Validated exploration configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of actions `k`
    pub actions: u32,
    pub mode: Mode,
}

impl Config {
    /// Creates a configuration, validating the parameters of `mode`
    pub fn new(actions: u32, mode: Mode) -> Result<Self> {
        let config = Self { actions, mode };
        config.validate()?;
        Ok(config)
    }

    /// Creates a new builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Checks the action count and the mode's parameters
    pub fn validate(&self) -> Result<()> {
        if self.actions < 2 {
            return Err(ExploreError::invalid(format!(
                "number of actions must be at least 2, got {}",
                self.actions
            )));
        }
        match self.mode {
            Mode::TauFirst { .. } => Ok(()),
            Mode::EpsilonGreedy { epsilon } if !(0.0..=1.0).contains(&epsilon) => Err(
                ExploreError::invalid(format!("epsilon must be between 0 and 1, got {epsilon}")),
            ),
            Mode::EpsilonGreedy { .. } => Ok(()),
            Mode::Bag { bags: 0 } | Mode::Cover { bags: 0, .. } => {
                Err(ExploreError::invalid("ensemble size must be at least 1"))
            }
            Mode::Bag { .. } => Ok(()),
            Mode::Cover { epsilon, .. } if !(epsilon > 0.0 && epsilon <= 1.0) => Err(
                ExploreError::invalid(format!("cover epsilon must be in (0, 1], got {epsilon}")),
            ),
            Mode::Cover { .. } => Ok(()),
        }
    }

    /// Offset slots the base learner must multiplex: one past its highest offset
    pub fn base_instances(&self) -> usize {
        match self.mode {
            Mode::Bag { bags } => bags,
            Mode::TauFirst { .. } | Mode::EpsilonGreedy { .. } | Mode::Cover { .. } => 1,
        }
    }

    /// Offset slots the cover oracle must multiplex, 0 without one.
    ///
    /// Oracles sit at `ORACLE_OFFSET..ORACLE_OFFSET + bags`, so this is one past
    /// the highest of them; the slots below `ORACLE_OFFSET` are never addressed.
    pub fn oracle_instances(&self) -> usize {
        match self.mode {
            Mode::Cover { bags, .. } => ORACLE_OFFSET + bags,
            _ => 0,
        }
    }
}

/// Reconciles the action count stored with a model against a freshly supplied one.
///
/// The stored value wins; a conflicting supplied value only produces a warning.
pub fn resolve_action_count(stored: Option<u32>, supplied: Option<u32>) -> Result<u32> {
    match (stored, supplied) {
        (Some(stored), Some(supplied)) if stored != supplied => {
            tracing::warn!(
                stored,
                supplied,
                "supplied action count differs from the one loaded with the model, using {stored}"
            );
            Ok(stored)
        }
        (Some(stored), _) => Ok(stored),
        (None, Some(supplied)) => Ok(supplied),
        (None, None) => Err(ExploreError::BuilderError {
            message: "number of actions not specified".into(),
        }),
    }
}

/// Builder for an exploration [`Config`].
///
/// Mirrors the option surface: one of `tau_first`, `bag`, or `cover` may be
/// chosen, `epsilon` alone selects epsilon-greedy, and `epsilon` together with
/// `cover` sets the cover rate. Nothing chosen means epsilon-greedy at
/// [`DEFAULT_EPSILON`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    actions: Option<u32>,
    stored_actions: Option<u32>,
    tau: Option<u64>,
    epsilon: Option<f64>,
    bags: Option<usize>,
    cover: Option<usize>,
}

impl ConfigBuilder {
    /// Set the number of actions supplied by the caller
    pub fn actions(mut self, actions: u32) -> Self {
        self.actions = Some(actions);
        self
    }

    /// Set the number of actions loaded with a saved model
    pub fn stored_actions(mut self, actions: u32) -> Self {
        self.stored_actions = Some(actions);
        self
    }

    /// Tau-first exploration with a budget of `tau` rounds
    pub fn tau_first(mut self, tau: u64) -> Self {
        self.tau = Some(tau);
        self
    }

    /// Exploration rate for epsilon-greedy, or for cover if `cover` is set
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Bagging exploration over `bags` replicas
    pub fn bag(mut self, bags: usize) -> Self {
        self.bags = Some(bags);
        self
    }

    /// Cover exploration with `bags` oracles
    pub fn cover(mut self, bags: usize) -> Self {
        self.cover = Some(bags);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        let actions = resolve_action_count(self.stored_actions, self.actions)?;

        let mode = match (self.tau, self.bags, self.cover, self.epsilon) {
            (None, None, None, None) => Mode::default(),
            (None, None, None, Some(epsilon)) => Mode::EpsilonGreedy { epsilon },
            (Some(tau), None, None, None) => Mode::TauFirst { tau },
            (None, Some(bags), None, None) => Mode::Bag { bags },
            (None, None, Some(bags), epsilon) => Mode::Cover {
                bags,
                epsilon: epsilon.unwrap_or(DEFAULT_EPSILON),
            },
            _ => {
                return Err(ExploreError::BuilderError {
                    message: "exploration modes are mutually exclusive: choose one of \
                              tau_first, epsilon, bag, or cover (with optional epsilon)"
                        .into(),
                });
            }
        };

        Config::new(actions, mode)
    }
}
