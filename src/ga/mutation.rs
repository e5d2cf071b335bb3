//! Mutation strategies.
//!
//! A mutation takes one chain and returns a possibly altered chain. It is
//! applied by the crossover strategy to each child, never by the population.
//!
//! # Strategies
//!
//! - [`NoMutation`]: identity
//! - [`BitFlipMutation`]: flip each position independently with a fixed rate
//! - [`SwapMutation`]: exchange two random positions, O(1)
//! - [`InvertMutation`]: reverse a random segment (2-opt), O(n)
//! - [`FnMutation`]: wrap a closure
//!
//! # References
//!
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use super::types::BitGenotype;
use rand::{Rng, RngCore};
use std::fmt::Debug;

/// Perturbs one chain.
///
/// Implementations must not keep state between calls other than what the
/// random source carries.
pub trait Mutation<G> {
    /// Returns the mutated chain.
    fn mutate<R: Rng>(&self, chain: G, rng: &mut R) -> G;
}

/// Returns every chain unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoMutation;

impl<G> Mutation<G> for NoMutation {
    fn mutate<R: Rng>(&self, chain: G, _rng: &mut R) -> G {
        chain
    }
}

/// Per-position bit flip.
///
/// Each gene flips independently with probability `rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitFlipMutation {
    rate: f64,
}

impl BitFlipMutation {
    /// Creates a bit-flip mutation. `rate` is clamped to `[0, 1]`; NaN
    /// becomes 0.
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self { rate }
    }

    /// Flips every position.
    pub fn always() -> Self {
        Self::new(1.0)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Default for BitFlipMutation {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl<G: BitGenotype> Mutation<G> for BitFlipMutation {
    fn mutate<R: Rng>(&self, mut chain: G, rng: &mut R) -> G {
        if self.rate <= 0.0 {
            return chain;
        }
        let rate = self.rate;
        chain.flip_where(|_| rng.random_bool(rate));
        chain
    }
}

/// Swap mutation: exchange two random positions.
///
/// Keeps a permutation a permutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapMutation;

impl<T: Clone + PartialEq + Debug> Mutation<Vec<T>> for SwapMutation {
    fn mutate<R: Rng>(&self, mut chain: Vec<T>, rng: &mut R) -> Vec<T> {
        let n = chain.len();
        if n < 2 {
            return chain;
        }
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        chain.swap(i, j);
        chain
    }
}

/// Invert mutation: reverse a random segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvertMutation;

impl<T: Clone + PartialEq + Debug> Mutation<Vec<T>> for InvertMutation {
    fn mutate<R: Rng>(&self, mut chain: Vec<T>, rng: &mut R) -> Vec<T> {
        let n = chain.len();
        if n < 2 {
            return chain;
        }
        let (start, end) = random_segment(n, rng);
        chain[start..=end].reverse();
        chain
    }
}

/// Adapts a closure into a [`Mutation`].
///
/// ```
/// use u_evolution::ga::{FnMutation, Mutation};
/// use u_evolution::random::create_rng;
///
/// let reverse = FnMutation(|chain: String, _rng: &mut dyn rand::RngCore| {
///     chain.chars().rev().collect::<String>()
/// });
/// let mut rng = create_rng(1);
/// assert_eq!(reverse.mutate("001".to_string(), &mut rng), "100");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnMutation<F>(pub F);

impl<G, F> Mutation<G> for FnMutation<F>
where
    F: Fn(G, &mut dyn RngCore) -> G,
{
    fn mutate<R: Rng>(&self, chain: G, rng: &mut R) -> G {
        (self.0)(chain, rng)
    }
}

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
