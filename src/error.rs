//! Error types for the banditify library.

use thiserror::Error;

/// Result type alias for exploration operations.
pub type Result<T> = std::result::Result<T, ExploreError>;

/// Errors that can occur while configuring or running an exploration policy.
#[derive(Error, Debug)]
pub enum ExploreError {
    /// Invalid parameter value.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A learner reported a class outside `[1, k]`.
    #[error("action {action} out of range: expected a class in [1, {k}]")]
    ActionOutOfRange { action: u32, k: u32 },

    /// Mismatch between the learner's feature width and the example.
    #[error("dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The learner was handed a label kind it cannot train on.
    #[error("unexpected label: {message}")]
    UnexpectedLabel { message: String },

    /// Cover exploration was configured without an oracle learner.
    #[error("cover exploration requires a cost-sensitive oracle learner")]
    MissingOracle,

    /// Builder configuration error.
    #[error("builder error: {message}")]
    BuilderError { message: String },

    /// Failure raised by an external learner.
    #[error("learner error: {0}")]
    Learner(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ExploreError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ExploreError::InvalidParameter {
            message: message.into(),
        }
    }
}
