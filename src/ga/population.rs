//! One generation of chromosomes and its aggregate statistics.

use super::chromosome::Chromosome;
use super::types::GaProblem;
use crate::error::{GaError, Result};
use log::{debug, warn};
use rand::Rng;

/// An ordered set of chromosomes forming one generation.
///
/// A population is built once and then only read: the orchestrator
/// replaces it wholesale every generation. Members still evaluate their
/// own fitness lazily, so aggregates such as [`fitness_sum`](Self::fitness_sum)
/// trigger evaluation of any member that has not been scored yet.
pub struct Population<'a, P: GaProblem> {
    problem: &'a P,
    chromosomes: Vec<Chromosome<'a, P>>,
    popsize: usize,
    generation: usize,
}

fn check_popsize(popsize: usize) -> Result<()> {
    if popsize == 0 {
        return Err(GaError::InvalidConfig(
            "population size must be at least 1".into(),
        ));
    }
    Ok(())
}

impl<'a, P: GaProblem> Population<'a, P> {
    /// Builds a population of `popsize` random chromosomes.
    pub fn random<R: Rng>(
        problem: &'a P,
        popsize: usize,
        generation: usize,
        rng: &mut R,
    ) -> Result<Self> {
        check_popsize(popsize)?;
        let chromosomes = (0..popsize)
            .map(|_| Chromosome::new(problem, rng))
            .collect();
        Ok(Self {
            problem,
            chromosomes,
            popsize,
            generation,
        })
    }

    /// Builds a population from bred chains.
    ///
    /// At most `popsize` chains are kept. If fewer are supplied, the
    /// remainder is filled with random chromosomes so the generation always
    /// has exactly `popsize` members.
    pub fn from_chains<R: Rng>(
        problem: &'a P,
        chains: Vec<P::Chain>,
        popsize: usize,
        generation: usize,
        rng: &mut R,
    ) -> Result<Self> {
        check_popsize(popsize)?;
        let supplied = chains.len();
        if supplied > popsize {
            debug!(
                "generation {generation}: dropping {} surplus chains",
                supplied - popsize
            );
        }

        let mut chromosomes: Vec<Chromosome<'a, P>> = chains
            .into_iter()
            .take(popsize)
            .map(|chain| Chromosome::with_chain(problem, chain))
            .collect();

        if supplied < popsize {
            debug!(
                "generation {generation}: filling {} slots with random chromosomes",
                popsize - supplied
            );
            chromosomes.extend((supplied..popsize).map(|_| Chromosome::new(problem, rng)));
        }

        Ok(Self {
            problem,
            chromosomes,
            popsize,
            generation,
        })
    }

    /// The problem this population was built for.
    pub fn problem(&self) -> &'a P {
        self.problem
    }

    /// Target number of members.
    pub fn popsize(&self) -> usize {
        self.popsize
    }

    /// Generation index, starting at 0.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn chromosomes(&self) -> &[Chromosome<'a, P>] {
        &self.chromosomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chromosome<'a, P>> {
        self.chromosomes.iter()
    }

    /// Forces fitness evaluation of every member.
    ///
    /// Returns how many members were evaluated by this call.
    pub fn evaluate(&self) -> usize {
        self.chromosomes.iter().filter(|c| c.run()).count()
    }

    /// Sum of every member's raw fitness.
    pub fn fitness_sum(&self) -> f64 {
        self.chromosomes.iter().map(|c| c.fitness_score()).sum()
    }

    /// Mean raw fitness, or 0 for an empty population.
    pub fn mean_fitness(&self) -> f64 {
        if self.chromosomes.is_empty() {
            return 0.0;
        }
        self.fitness_sum() / self.chromosomes.len() as f64
    }

    /// Normalizes every member against the population's fitness sum.
    ///
    /// Afterwards the normalized scores sum to 1. When the fitness sum is
    /// exactly zero every member receives `1 / len` instead.
    ///
    /// A negative sum inverts the normalized order, so [`fittest`](Self::fittest)
    /// and roulette selection then favor the lowest raw fitness. Use
    /// [`highest_fitness`](Self::highest_fitness) for the raw best.
    pub fn normalize(&mut self) {
        let sum = self.fitness_sum();
        if sum < 0.0 {
            warn!(
                "generation {}: fitness sum {sum} is negative, normalized order is inverted",
                self.generation
            );
        }
        if sum == 0.0 {
            warn!(
                "generation {}: fitness sum is zero, normalizing uniformly",
                self.generation
            );
            let uniform = 1.0 / self.chromosomes.len() as f64;
            for chromosome in &mut self.chromosomes {
                chromosome.set_normalized(uniform);
            }
            return;
        }
        for chromosome in &mut self.chromosomes {
            chromosome.normalize_based_on_sum_of_fitness(sum);
        }
    }

    /// Whether every member carries a normalized score.
    pub fn is_normalized(&self) -> bool {
        self.chromosomes.iter().all(|c| c.is_normalized())
    }

    /// Member with the highest normalized fitness (first one on ties).
    ///
    /// # Errors
    /// [`GaError::NotNormalized`] before [`normalize`](Self::normalize),
    /// [`GaError::EmptyPopulation`] when there are no members.
    pub fn fittest(&self) -> Result<&Chromosome<'a, P>> {
        self.scan(Chromosome::normalized_fitness_score, |candidate, best| candidate > best)
    }

    /// Member with the lowest normalized fitness (first one on ties).
    pub fn least_fit(&self) -> Result<&Chromosome<'a, P>> {
        self.scan(Chromosome::normalized_fitness_score, |candidate, best| candidate < best)
    }

    /// Member with the highest raw fitness (first one on ties).
    ///
    /// Evaluates members as needed and does not require normalization.
    ///
    /// # Errors
    /// [`GaError::EmptyPopulation`] when there are no members.
    pub fn highest_fitness(&self) -> Result<&Chromosome<'a, P>> {
        self.scan(|c| Ok(c.fitness_score()), |candidate, best| candidate > best)
    }

    /// Member with the lowest raw fitness (first one on ties).
    pub fn lowest_fitness(&self) -> Result<&Chromosome<'a, P>> {
        self.scan(|c| Ok(c.fitness_score()), |candidate, best| candidate < best)
    }

    fn scan<K, F>(&self, key: K, replaces: F) -> Result<&Chromosome<'a, P>>
    where
        K: Fn(&Chromosome<'a, P>) -> Result<f64>,
        F: Fn(f64, f64) -> bool,
    {
        let mut members = self.chromosomes.iter();
        let mut best = members.next().ok_or(GaError::EmptyPopulation)?;
        let mut best_score = key(best)?;
        for candidate in members {
            let score = key(candidate)?;
            if replaces(score, best_score) {
                best = candidate;
                best_score = score;
            }
        }
        Ok(best)
    }
}
