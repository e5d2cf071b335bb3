//! A single candidate solution with lazily computed fitness.

use super::types::GaProblem;
use crate::error::{GaError, Result};
use rand::Rng;
use std::cell::Cell;
use std::fmt;

/// One candidate: an immutable encoded chain plus its cached fitness.
///
/// Fitness is computed on first read as `fitness(decode(chain))` and frozen
/// afterwards; the problem is never consulted again for this instance.
/// The normalized score only exists once a caller supplies the population's
/// fitness sum through
/// [`normalize_based_on_sum_of_fitness`](Chromosome::normalize_based_on_sum_of_fitness).
pub struct Chromosome<'a, P: GaProblem> {
    problem: &'a P,
    chain: P::Chain,
    fitness: Cell<Option<f64>>,
    normalized: Option<f64>,
}

impl<'a, P: GaProblem> Chromosome<'a, P> {
    /// Creates a chromosome from a fresh random candidate.
    pub fn new<R: Rng>(problem: &'a P, rng: &mut R) -> Self {
        let chain = problem.random_chain(rng);
        Self::with_chain(problem, chain)
    }

    /// Wraps an explicit chain, e.g. a bred child.
    pub fn with_chain(problem: &'a P, chain: P::Chain) -> Self {
        Self {
            problem,
            chain,
            fitness: Cell::new(None),
            normalized: None,
        }
    }

    /// The encoded chain.
    pub fn chain(&self) -> &P::Chain {
        &self.chain
    }

    /// Copies the chain out for use as a breeding parent.
    pub fn clone_chain(&self) -> P::Chain {
        self.chain.clone()
    }

    /// Decodes the chain into the problem's domain.
    pub fn value(&self) -> P::Value {
        self.problem.decode(&self.chain)
    }

    /// Computes fitness if it has not been computed yet.
    ///
    /// Returns `true` when this call did the computation and `false` when
    /// the score was already cached.
    pub fn run(&self) -> bool {
        if self.is_computed() {
            return false;
        }
        self.compute();
        true
    }

    fn compute(&self) -> f64 {
        let score = self.problem.fitness(&self.value());
        self.fitness.set(Some(score));
        score
    }

    /// Whether fitness has been computed.
    pub fn is_computed(&self) -> bool {
        self.fitness.get().is_some()
    }

    /// Raw fitness, computed on first access.
    pub fn fitness_score(&self) -> f64 {
        self.fitness.get().unwrap_or_else(|| self.compute())
    }

    /// Stores `fitness_score / sum` as the normalized score.
    ///
    /// Aggregating `sum` is the population's job; this only divides.
    pub fn normalize_based_on_sum_of_fitness(&mut self, sum: f64) {
        let score = self.fitness_score();
        self.normalized = Some(score / sum);
    }

    pub(crate) fn set_normalized(&mut self, normalized: f64) {
        self.normalized = Some(normalized);
    }

    /// Whether a normalized score is available.
    pub fn is_normalized(&self) -> bool {
        self.normalized.is_some()
    }

    /// Normalized fitness.
    ///
    /// # Errors
    /// [`GaError::NotNormalized`] until
    /// [`normalize_based_on_sum_of_fitness`](Self::normalize_based_on_sum_of_fitness)
    /// has been called.
    pub fn normalized_fitness_score(&self) -> Result<f64> {
        self.normalized.ok_or(GaError::NotNormalized)
    }
}

impl<P: GaProblem> Clone for Chromosome<'_, P> {
    fn clone(&self) -> Self {
        Self {
            problem: self.problem,
            chain: self.chain.clone(),
            fitness: self.fitness.clone(),
            normalized: self.normalized,
        }
    }
}

impl<P: GaProblem> fmt::Debug for Chromosome<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chromosome")
            .field("chain", &self.chain)
            .field("fitness", &self.fitness.get())
            .field("normalized", &self.normalized)
            .finish()
    }
}
