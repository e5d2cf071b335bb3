//! Crossover strategies.
//!
//! A crossover strategy turns the selected parent chains into the same
//! number of child chains, applying the mutation strategy to every child it
//! breeds.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1 (single-point crossover)

use super::mutation::Mutation;
use super::types::Genotype;
use crate::random;
use rand::Rng;
use std::time::{Duration, Instant};

/// Instrumentation accumulated across crossover calls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrossoverStatistics {
    /// Total wall-clock time spent in crossover.
    pub elapsed: Duration,
    /// Number of parent pairs recombined.
    pub pairs: usize,
}

/// Where a single-point crossover cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CutPoint {
    /// Uniform in `[0, gene_count)` of the first parent.
    #[default]
    ChainLength,

    /// Uniform in `[0, number of parents)`.
    ///
    /// Ties the cut to the population size rather than the chain. A cut at
    /// or beyond the chain length leaves both parents intact.
    PopulationSize,

    /// Always cut at the given position.
    Fixed(usize),
}

impl CutPoint {
    fn draw<R: Rng>(&self, gene_count: usize, parents: usize, rng: &mut R) -> usize {
        match *self {
            CutPoint::ChainLength if gene_count > 0 => rng.random_range(0..gene_count),
            CutPoint::ChainLength => 0,
            CutPoint::PopulationSize if parents > 0 => rng.random_range(0..parents),
            CutPoint::PopulationSize => 0,
            CutPoint::Fixed(k) => k,
        }
    }
}

/// Parameters of single-point crossover.
///
/// Parents are paired two by two (after an optional shuffle). Each pair
/// swaps the tails after the cut point:
///
/// ```text
/// child1 = a[..k] ++ b[k..]
/// child2 = b[..k] ++ a[k..]
/// ```
///
/// Both children are mutated. With an odd number of parents the last one
/// has no partner and is passed through, unmutated unless
/// `mutate_unpaired` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SinglePointCrossover {
    pub cut_point: CutPoint,
    pub shuffle: bool,
    pub mutate_unpaired: bool,
}

impl Default for SinglePointCrossover {
    fn default() -> Self {
        Self {
            cut_point: CutPoint::default(),
            shuffle: true,
            mutate_unpaired: false,
        }
    }
}

impl SinglePointCrossover {
    pub fn with_cut_point(mut self, cut_point: CutPoint) -> Self {
        self.cut_point = cut_point;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_mutate_unpaired(mut self, mutate_unpaired: bool) -> Self {
        self.mutate_unpaired = mutate_unpaired;
        self
    }

    fn breed<G, M, R>(
        &self,
        mut parents: Vec<G>,
        mutation: &M,
        rng: &mut R,
        statistics: &mut CrossoverStatistics,
    ) -> Vec<G>
    where
        G: Genotype,
        M: Mutation<G>,
        R: Rng,
    {
        if self.shuffle {
            random::shuffle(&mut parents, rng);
        }

        let count = parents.len();
        let mut children = Vec::with_capacity(count);
        let mut parents = parents.into_iter();

        while let Some(a) = parents.next() {
            let Some(b) = parents.next() else {
                let lone = if self.mutate_unpaired {
                    mutation.mutate(a, rng)
                } else {
                    a
                };
                children.push(lone);
                break;
            };

            let k = self.cut_point.draw(a.gene_count(), count, rng);
            let first = a.splice(&b, k);
            let second = b.splice(&a, k);

            children.push(mutation.mutate(first, rng));
            children.push(mutation.mutate(second, rng));
            statistics.pairs += 1;
        }

        children
    }
}

/// Crossover strategy.
///
/// # Examples
///
/// ```
/// use u_evolution::ga::{Crossover, CrossoverStatistics, CutPoint, NoMutation, SinglePointCrossover};
/// use u_evolution::random::create_rng;
///
/// let crossover = Crossover::SinglePoint(
///     SinglePointCrossover::default()
///         .with_cut_point(CutPoint::Fixed(2))
///         .with_shuffle(false),
/// );
/// let mut rng = create_rng(42);
/// let mut stats = CrossoverStatistics::default();
/// let children = crossover.crossover(
///     vec!["0000".to_string(), "1111".to_string()],
///     &NoMutation,
///     &mut rng,
///     &mut stats,
/// );
/// assert_eq!(children, vec!["0011", "1100"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// No recombination: every parent is only mutated.
    None,

    /// Single-point crossover.
    SinglePoint(SinglePointCrossover),
}

impl Default for Crossover {
    fn default() -> Self {
        Crossover::SinglePoint(SinglePointCrossover::default())
    }
}

impl Crossover {
    /// Breeds one child per parent.
    ///
    /// The output always has the same length as `parents`. Elapsed time is
    /// added to `statistics`.
    pub fn crossover<G, M, R>(
        &self,
        parents: Vec<G>,
        mutation: &M,
        rng: &mut R,
        statistics: &mut CrossoverStatistics,
    ) -> Vec<G>
    where
        G: Genotype,
        M: Mutation<G>,
        R: Rng,
    {
        let start = Instant::now();

        let children = match self {
            Crossover::None => parents
                .into_iter()
                .map(|chain| mutation.mutate(chain, rng))
                .collect(),
            Crossover::SinglePoint(params) => params.breed(parents, mutation, rng, statistics),
        };

        statistics.elapsed += start.elapsed();
        children
    }
}
