//! Labels and the example record passed through the exploration policies.
//!
//! An [`Example`] arrives carrying a fully-revealed multiclass label. While a
//! policy delegates to a learner it swaps in a bandit or cost-sensitive label
//! through [`Example::override_label`], which hands back a guard that puts the
//! original label back when it goes out of scope.

use std::ops::{Deref, DerefMut};

use crate::error::{ExploreError, Result};

/// Fully-revealed multiclass label, classes numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MulticlassLabel {
    /// True class in `[1, k]`
    pub label: u32,
}

impl MulticlassLabel {
    pub fn new(label: u32) -> Self {
        Self { label }
    }
}

/// Partial feedback for one realized action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BanditCost {
    /// Observed loss of the realized action
    pub cost: f64,
    /// Realized action in `[1, k]`
    pub action: u32,
    /// Probability the action was sampled with, in `(0, 1]`
    pub probability: f64,
}

/// Bandit label handed to the base learner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BanditLabel {
    pub costs: Vec<BanditCost>,
}

impl BanditLabel {
    /// Label carrying a single observation
    pub fn observed(cost: BanditCost) -> Self {
        Self { costs: vec![cost] }
    }

    /// The observation, if any
    pub fn observation(&self) -> Option<&BanditCost> {
        self.costs.first()
    }
}

/// Estimated cost of one class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassCost {
    /// Class identifier in `[1, k]`
    pub class: u32,
    pub cost: f64,
}

/// Cost-sensitive label: one cost per class, in class order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CostSensitiveLabel {
    pub costs: Vec<ClassCost>,
}

impl CostSensitiveLabel {
    /// Marker cost for a class whose cost is not known.
    pub const UNKNOWN_COST: f64 = f64::MAX;

    /// Label for querying a cost-sensitive learner without revealing costs
    pub fn unknown(k: u32) -> Self {
        Self::from_costs((1..=k).map(|_| Self::UNKNOWN_COST))
    }

    /// Builds a label from per-class costs; the first cost belongs to class 1
    pub fn from_costs<I>(costs: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            costs: (1u32..)
                .zip(costs)
                .map(|(class, cost)| ClassCost { class, cost })
                .collect(),
        }
    }

    /// Whether every class cost is the unknown marker
    pub fn is_unknown(&self) -> bool {
        self.costs.iter().all(|c| c.cost == Self::UNKNOWN_COST)
    }
}

/// The label slot of an [`Example`].
#[derive(Clone, Debug, PartialEq)]
pub enum Label {
    Multiclass(MulticlassLabel),
    Bandit(BanditLabel),
    CostSensitive(CostSensitiveLabel),
}

impl Label {
    /// An empty bandit label, used when asking the base learner for a prediction only
    pub fn unlabeled() -> Self {
        Label::Bandit(BanditLabel::default())
    }

    fn kind(&self) -> &'static str {
        match self {
            Label::Multiclass(_) => "multiclass",
            Label::Bandit(_) => "bandit",
            Label::CostSensitive(_) => "cost-sensitive",
        }
    }
}

/// One example flowing through the reduction.
#[derive(Clone, Debug, PartialEq)]
pub struct Example {
    /// Dense feature vector, opaque to the exploration policies
    pub features: Vec<f64>,
    label: Label,
    /// Final prediction written by the policy, 0 until one is made
    pub prediction: u32,
    /// Loss of `prediction` against the true label
    pub loss: f64,
}

impl Example {
    /// Creates an example with a multiclass label
    pub fn new(features: Vec<f64>, label: u32) -> Self {
        Self::with_label(features, Label::Multiclass(MulticlassLabel::new(label)))
    }

    /// Creates an example carrying an arbitrary label
    pub fn with_label(features: Vec<f64>, label: Label) -> Self {
        Self {
            features,
            label,
            prediction: 0,
            loss: 0.0,
        }
    }

    /// The label currently in the slot
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// The true multiclass label, validated against `k`
    pub fn true_label(&self, k: u32) -> Result<u32> {
        match &self.label {
            Label::Multiclass(ld) => checked_action(ld.label, k),
            other => Err(ExploreError::UnexpectedLabel {
                message: format!("expected a multiclass label, found {}", other.kind()),
            }),
        }
    }

    /// Temporarily replaces the label; the original comes back when the guard drops
    pub fn override_label(&mut self, label: Label) -> LabelOverride<'_> {
        let original = std::mem::replace(&mut self.label, label);
        LabelOverride {
            example: self,
            original: Some(original),
        }
    }
}

/// Scoped label substitution returned by [`Example::override_label`].
#[derive(Debug)]
pub struct LabelOverride<'a> {
    example: &'a mut Example,
    original: Option<Label>,
}

impl Deref for LabelOverride<'_> {
    type Target = Example;

    fn deref(&self) -> &Example {
        self.example
    }
}

impl DerefMut for LabelOverride<'_> {
    fn deref_mut(&mut self) -> &mut Example {
        self.example
    }
}

impl Drop for LabelOverride<'_> {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            self.example.label = original;
        }
    }
}

/// Zero-one loss of `prediction` against `label`
pub fn multiclass_loss(label: u32, prediction: u32) -> f64 {
    if label == prediction { 0.0 } else { 1.0 }
}

/// Rejects actions outside `[1, k]`
pub(crate) fn checked_action(action: u32, k: u32) -> Result<u32> {
    if (1..=k).contains(&action) {
        Ok(action)
    } else {
        Err(ExploreError::ActionOutOfRange { action, k })
    }
}
