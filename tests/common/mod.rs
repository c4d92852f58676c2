//! Shared test doubles: a scripted uniform source and a recording learner.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use banditify::label::{BanditCost, Label};
use banditify::{Example, Learner, Result};

/// Uniform source replaying a fixed script of draws in `[0, 1)`.
///
/// Each value is encoded into the top 53 bits of `next_u64`, which is exactly
/// what `rng.random::<f64>()` reads back. Once the script runs out every draw
/// is 0.5.
pub struct ScriptedRng {
    draws: VecDeque<f64>,
}

impl ScriptedRng {
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl rand::RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let u = self.draws.pop_front().unwrap_or(0.5);
        assert!((0.0..1.0).contains(&u), "scripted draw {u} outside [0, 1)");
        ((u * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Learner double: fixed predictions per offset, records every call.
#[derive(Debug, Default)]
pub struct RecordingLearner {
    predictions: HashMap<usize, u32>,
    default_prediction: u32,
    pub predicted: Vec<usize>,
    pub learned: Vec<(usize, Label)>,
}

impl RecordingLearner {
    /// Every offset predicts `class`
    pub fn constant(class: u32) -> Self {
        Self {
            default_prediction: class,
            ..Default::default()
        }
    }

    /// Offset `start + i` predicts `classes[i]`
    pub fn per_offset(start: usize, classes: &[u32]) -> Self {
        Self {
            predictions: (start..).zip(classes.iter().copied()).collect(),
            default_prediction: 1,
            ..Default::default()
        }
    }

    /// Bandit records the learner was trained on, in call order
    pub fn bandit_records(&self) -> Vec<(usize, BanditCost)> {
        self.learned
            .iter()
            .filter_map(|(offset, label)| match label {
                Label::Bandit(l) => l.observation().map(|c| (*offset, *c)),
                _ => None,
            })
            .collect()
    }

    pub fn learned_offsets(&self) -> Vec<usize> {
        self.learned.iter().map(|(offset, _)| *offset).collect()
    }
}

impl Learner for RecordingLearner {
    fn predict(&mut self, _example: &mut Example, offset: usize) -> Result<u32> {
        self.predicted.push(offset);
        Ok(*self
            .predictions
            .get(&offset)
            .unwrap_or(&self.default_prediction))
    }

    fn learn(&mut self, example: &mut Example, offset: usize) -> Result<()> {
        self.learned.push((offset, example.label().clone()));
        Ok(())
    }
}
