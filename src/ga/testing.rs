//! Small problems shared by the unit tests.

use super::types::{BitChain, GaProblem};
use rand::Rng;
use std::cell::Cell;

/// Maximize the number of 1-bits in a fixed-width bit chain.
pub(crate) struct OneMax {
    pub bits: usize,
    pub calls: Cell<usize>,
}

impl OneMax {
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            calls: Cell::new(0),
        }
    }
}

impl GaProblem for OneMax {
    type Value = Vec<bool>;
    type Chain = BitChain;

    fn random_value<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
        (0..self.bits).map(|_| rng.random_bool(0.5)).collect()
    }

    fn encode(&self, value: &Vec<bool>) -> BitChain {
        value.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    fn decode(&self, chain: &BitChain) -> Vec<bool> {
        chain.chars().map(|c| c == '1').collect()
    }

    fn fitness(&self, value: &Vec<bool>) -> f64 {
        self.calls.set(self.calls.get() + 1);
        value.iter().filter(|&&b| b).count() as f64
    }
}

/// Each chain is a single index into a fixed score table.
pub(crate) struct ScoreTable {
    pub scores: Vec<f64>,
}

impl ScoreTable {
    pub fn new(scores: &[f64]) -> Self {
        Self {
            scores: scores.to_vec(),
        }
    }

    /// One chain per table entry, in table order.
    pub fn chains(&self) -> Vec<Vec<usize>> {
        (0..self.scores.len()).map(|i| vec![i]).collect()
    }
}

impl GaProblem for ScoreTable {
    type Value = usize;
    type Chain = Vec<usize>;

    fn random_value<R: Rng>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.scores.len())
    }

    fn encode(&self, value: &usize) -> Vec<usize> {
        vec![*value]
    }

    fn decode(&self, chain: &Vec<usize>) -> usize {
        chain.first().copied().unwrap_or(0)
    }

    fn fitness(&self, value: &usize) -> f64 {
        self.scores[*value]
    }
}
