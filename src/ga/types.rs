//! Core trait definitions for the GA engine.
//!
//! [`Genotype`] describes the encoded chain a chromosome carries and
//! [`GaProblem`] is the contract between the generic engine and a concrete
//! problem encoding.

use rand::Rng;
use std::fmt::Debug;

/// Bit-string genotype: one character per position, `'0'` or `'1'`.
pub type BitChain = String;

/// An encoded candidate solution.
///
/// The engine treats genotypes as opaque values. The only structure it
/// relies on is positional: single-point crossover needs to know how many
/// genes a chain has and how to join a prefix of one chain to a suffix of
/// another.
pub trait Genotype: Clone + PartialEq + Debug {
    /// Number of positions in the chain.
    fn gene_count(&self) -> usize;

    /// Returns `self[0..point] ++ other[point..]`.
    ///
    /// Positions clamp to each chain's length, so a `point` at or past the
    /// end yields all of `self` followed by nothing of `other`.
    fn splice(&self, other: &Self, point: usize) -> Self;
}

/// A genotype whose positions are binary and can be flipped.
pub trait BitGenotype: Genotype {
    /// Flips the gene at `index`. Out-of-range indices are ignored.
    fn flip(&mut self, index: usize);

    /// Flips every position for which `pick` returns `true`.
    ///
    /// `pick` is called once per position, in order.
    fn flip_where<F: FnMut(usize) -> bool>(&mut self, mut pick: F) {
        for i in 0..self.gene_count() {
            if pick(i) {
                self.flip(i);
            }
        }
    }
}

impl Genotype for String {
    fn gene_count(&self) -> usize {
        self.chars().count()
    }

    fn splice(&self, other: &Self, point: usize) -> Self {
        let mut child: String = self.chars().take(point).collect();
        child.extend(other.chars().skip(point));
        child
    }
}

fn flip_bit_char(c: char) -> char {
    match c {
        '0' => '1',
        '1' => '0',
        other => other,
    }
}

impl BitGenotype for String {
    fn flip(&mut self, index: usize) {
        self.flip_where(|i| i == index);
    }

    // One pass over the characters instead of one rebuild per flipped bit.
    fn flip_where<F: FnMut(usize) -> bool>(&mut self, mut pick: F) {
        *self = self
            .chars()
            .enumerate()
            .map(|(i, c)| if pick(i) { flip_bit_char(c) } else { c })
            .collect();
    }
}

impl<T: Clone + PartialEq + Debug> Genotype for Vec<T> {
    fn gene_count(&self) -> usize {
        self.len()
    }

    fn splice(&self, other: &Self, point: usize) -> Self {
        let head = point.min(self.len());
        let tail = point.min(other.len());
        let mut child = Vec::with_capacity(head + other.len() - tail);
        child.extend_from_slice(&self[..head]);
        child.extend_from_slice(&other[tail..]);
        child
    }
}

impl BitGenotype for Vec<bool> {
    fn flip(&mut self, index: usize) {
        if let Some(bit) = self.get_mut(index) {
            *bit = !*bit;
        }
    }
}

/// Defines a GA optimization problem.
///
/// The engine never looks inside a domain value. It only moves between the
/// problem's native domain and its encoded chain through this trait:
///
/// 1. **Generation**: [`random_value`](GaProblem::random_value) followed by
///    [`encode`](GaProblem::encode) seeds a fresh chromosome
/// 2. **Evaluation**: [`decode`](GaProblem::decode) followed by
///    [`fitness`](GaProblem::fitness) scores a chromosome
///
/// # Maximization
///
/// Higher fitness is better. Fitness-proportionate selection additionally
/// assumes scores are non-negative.
///
/// # Determinism
///
/// Chromosomes evaluate `fitness(decode(chain))` at most once and cache the
/// result, so `fitness` should be a pure function of its input. A panicking
/// fitness function propagates to the caller untouched.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_evolution::ga::{BitChain, GaProblem};
///
/// struct OneMax {
///     bits: usize,
/// }
///
/// impl GaProblem for OneMax {
///     type Value = Vec<bool>;
///     type Chain = BitChain;
///
///     fn random_value<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
///         (0..self.bits).map(|_| rng.random_bool(0.5)).collect()
///     }
///
///     fn encode(&self, value: &Vec<bool>) -> BitChain {
///         value.iter().map(|&b| if b { '1' } else { '0' }).collect()
///     }
///
///     fn decode(&self, chain: &BitChain) -> Vec<bool> {
///         chain.chars().map(|c| c == '1').collect()
///     }
///
///     fn fitness(&self, value: &Vec<bool>) -> f64 {
///         value.iter().filter(|&&b| b).count() as f64
///     }
/// }
/// ```
pub trait GaProblem {
    /// A candidate in the problem's native domain.
    type Value;

    /// The encoded form the genetic operators work on.
    type Chain: Genotype;

    /// Produces a random candidate.
    fn random_value<R: Rng>(&self, rng: &mut R) -> Self::Value;

    /// Encodes a candidate into a chain.
    fn encode(&self, value: &Self::Value) -> Self::Chain;

    /// Decodes a chain back into a candidate.
    ///
    /// Must be lossless for everything [`fitness`](GaProblem::fitness) reads.
    fn decode(&self, chain: &Self::Chain) -> Self::Value;

    /// Scores a candidate. Higher is better.
    fn fitness(&self, value: &Self::Value) -> f64;

    /// Encodes a freshly drawn random candidate.
    fn random_chain<R: Rng>(&self, rng: &mut R) -> Self::Chain {
        let value = self.random_value(rng);
        self.encode(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_splice_swaps_tail() {
        let a = String::from("0000");
        let b = String::from("1111");
        assert_eq!(a.splice(&b, 2), "0011");
        assert_eq!(b.splice(&a, 2), "1100");
    }

    #[test]
    fn test_string_splice_point_past_end() {
        let a = String::from("010");
        let b = String::from("101");
        assert_eq!(a.splice(&b, 10), "010");
        assert_eq!(a.splice(&b, 0), "101");
    }

    #[test]
    fn test_string_flip() {
        let mut chain = String::from("0101");
        chain.flip(0);
        assert_eq!(chain, "1101");
        chain.flip(99);
        assert_eq!(chain, "1101");
    }

    #[test]
    fn test_string_flip_where_leaves_non_bits() {
        let mut chain = String::from("0x1");
        chain.flip_where(|_| true);
        assert_eq!(chain, "1x0");
    }

    #[test]
    fn test_vec_splice_unequal_lengths() {
        let a = vec![1, 2, 3, 4];
        let b = vec![9, 8];
        assert_eq!(a.splice(&b, 1), vec![1, 8]);
        assert_eq!(b.splice(&a, 3), vec![9, 8, 4]);
    }

    #[test]
    fn test_vec_bool_flip_where() {
        let mut chain = vec![false, true, false];
        chain.flip_where(|i| i != 1);
        assert_eq!(chain, vec![true, true, true]);
    }

    #[test]
    fn test_gene_count_counts_chars() {
        assert_eq!(String::from("0110").gene_count(), 4);
        assert_eq!(vec![0u8; 7].gene_count(), 7);
    }
}
