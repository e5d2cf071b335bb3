//! Selection strategies for the GA.
//!
//! Selection turns a normalized population into the list of parent chains
//! handed to crossover. Every strategy returns at most `popsize` chains and
//! always returns copies, never references into the population.
//!
//! # References
//!
//! - Lipowski & Lipowska (2012), "Roulette-wheel selection via stochastic
//!   acceptance", Physica A 391(6)
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use super::population::Population;
use super::types::GaProblem;
use crate::error::{GaError, Result};
use log::warn;
use rand::Rng;
use std::time::{Duration, Instant};

/// Roulette attempts allowed per population member.
///
/// The expected number of attempts per accepted draw is
/// `fitness_max / fitness_mean`; this cap bounds the loop even when one
/// individual dominates the population.
pub const ROULETTE_ATTEMPTS_PER_MEMBER: usize = 10 * 3;

/// Instrumentation for one selection call. Never affects the outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionStatistics {
    /// Number of draws performed.
    pub iterations: usize,
    /// Wall-clock time spent selecting.
    pub elapsed: Duration,
}

/// Selection strategy for choosing parents.
///
/// All strategies assume **maximization** and read normalized fitness, so
/// the population must have been normalized first.
///
/// # Examples
///
/// ```
/// use u_evolution::ga::Selection;
///
/// // Fitness-proportionate, stochastic acceptance
/// let sel = Selection::RouletteWheel;
///
/// // Tournament with size 3
/// let sel = Selection::Tournament(3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate selection by stochastic acceptance.
    ///
    /// Repeatedly draws an individual uniformly and accepts it with
    /// probability `w_i / w_max`. Stops once `popsize` chains are accepted
    /// or after [`ROULETTE_ATTEMPTS_PER_MEMBER`]` * len` draws, so it may
    /// return fewer than `popsize` chains.
    ///
    /// If the best normalized score is not positive, every draw is
    /// accepted (uniform selection).
    ///
    /// # Complexity
    /// O(1) per draw
    #[default]
    RouletteWheel,

    /// Tournament selection: pick `k` individuals at random, keep the best.
    ///
    /// Always returns exactly `popsize` chains.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Linear rank selection.
    ///
    /// The best individual has weight `n`, the worst weight `1`. Always
    /// returns exactly `popsize` chains.
    ///
    /// # Complexity
    /// O(n log n) per call (sort), O(n) per selection
    Rank,
}

impl Selection {
    /// Selects parent chains from a normalized population.
    ///
    /// # Errors
    /// [`GaError::NotNormalized`] if the population has not been normalized.
    pub fn select<P: GaProblem, R: Rng>(
        &self,
        population: &Population<'_, P>,
        rng: &mut R,
        statistics: &mut SelectionStatistics,
    ) -> Result<Vec<P::Chain>> {
        if population.is_empty() {
            return Err(GaError::EmptyPopulation);
        }
        let start = Instant::now();

        let selected = match self {
            Selection::RouletteWheel => roulette_wheel(population, rng, statistics),
            Selection::Tournament(k) => tournament(population, *k, rng, statistics),
            Selection::Rank => rank(population, rng, statistics),
        };

        statistics.elapsed = start.elapsed();
        selected
    }
}

/// Raw fitness of every member, for strategies that only compare members.
///
/// Normalized scores reverse order when the fitness sum is negative, so
/// comparisons use the raw value. Normalization is still required.
fn ranking_scores<P: GaProblem>(population: &Population<'_, P>) -> Result<Vec<f64>> {
    population
        .iter()
        .map(|c| {
            c.normalized_fitness_score()?;
            Ok(c.fitness_score())
        })
        .collect()
}

/// Stochastic acceptance: uniform pick, accept with `w_i / w_max`.
fn roulette_wheel<P: GaProblem, R: Rng>(
    population: &Population<'_, P>,
    rng: &mut R,
    statistics: &mut SelectionStatistics,
) -> Result<Vec<P::Chain>> {
    let members = population.chromosomes();
    let n = members.len();
    let target = population.popsize();
    let fitness_max = population.fittest()?.normalized_fitness_score()?;

    let uniform = !(fitness_max.is_finite() && fitness_max > 0.0);
    if uniform {
        warn!(
            "generation {}: best normalized fitness is {fitness_max}, selecting uniformly",
            population.generation()
        );
    }

    let max_attempts = ROULETTE_ATTEMPTS_PER_MEMBER * n;
    let mut selected = Vec::with_capacity(target);
    let mut attempts = 0usize;

    while attempts < max_attempts && selected.len() < target {
        attempts += 1;

        let individual = &members[rng.random_range(0..n)];
        let draw: f64 = rng.random();
        let probability = if uniform {
            1.0
        } else {
            individual.normalized_fitness_score()? / fitness_max
        };

        if probability >= draw {
            selected.push(individual.clone_chain());
        }
    }

    statistics.iterations = attempts;
    Ok(selected)
}

/// Tournament selection: `popsize` tournaments of `k` uniform draws.
fn tournament<P: GaProblem, R: Rng>(
    population: &Population<'_, P>,
    k: usize,
    rng: &mut R,
    statistics: &mut SelectionStatistics,
) -> Result<Vec<P::Chain>> {
    let scores = ranking_scores(population)?;
    let members = population.chromosomes();
    let k = k.max(1);
    let n = members.len();
    let target = population.popsize();

    let mut selected = Vec::with_capacity(target);
    for _ in 0..target {
        let mut best_idx = rng.random_range(0..n);
        for _ in 1..k {
            let idx = rng.random_range(0..n);
            if scores[idx] > scores[best_idx] {
                best_idx = idx;
            }
        }
        selected.push(members[best_idx].clone_chain());
    }

    statistics.iterations = target * k;
    Ok(selected)
}

/// Linear rank selection: rank 0 (best) has weight `n`.
fn rank<P: GaProblem, R: Rng>(
    population: &Population<'_, P>,
    rng: &mut R,
    statistics: &mut SelectionStatistics,
) -> Result<Vec<P::Chain>> {
    let scores = ranking_scores(population)?;
    let members = population.chromosomes();
    let n = members.len();
    let target = population.popsize();

    // Best first; stable sort keeps population order among equals
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total = (n * (n + 1)) as f64 / 2.0;
    let mut selected = Vec::with_capacity(target);
    for _ in 0..target {
        let threshold = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        // floating-point fallback: the worst-ranked member
        let mut pick = order[n - 1];
        for (rank, &idx) in order.iter().enumerate() {
            cumulative += (n - rank) as f64;
            if cumulative > threshold {
                pick = idx;
                break;
            }
        }
        selected.push(members[pick].clone_chain());
    }

    statistics.iterations = target;
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::testing::ScoreTable;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn normalized(table: &ScoreTable) -> Population<'_, ScoreTable> {
        let mut rng = create_rng(7);
        let mut pop =
            Population::from_chains(table, table.chains(), table.scores.len(), 0, &mut rng)
                .unwrap();
        pop.normalize();
        pop
    }

    fn counts(selected: &[Vec<usize>], n: usize) -> Vec<usize> {
        let mut counts = vec![0; n];
        for chain in selected {
            counts[chain[0]] += 1;
        }
        counts
    }

    #[test]
    fn test_roulette_equal_fitness_saturates_quickly() {
        let table = ScoreTable::new(&[1.0; 10]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);
        let mut stats = SelectionStatistics::default();

        let selected = Selection::RouletteWheel
            .select(&pop, &mut rng, &mut stats)
            .unwrap();

        assert_eq!(selected.len(), 10);
        // p = 1 for everyone: every draw is accepted
        assert_eq!(stats.iterations, 10);
    }

    #[test]
    fn test_roulette_favors_fitter() {
        let table = ScoreTable::new(&[1.0, 10.0, 1.0, 1.0]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);

        let mut totals = vec![0; 4];
        for _ in 0..200 {
            let mut stats = SelectionStatistics::default();
            let selected = Selection::RouletteWheel
                .select(&pop, &mut rng, &mut stats)
                .unwrap();
            for (t, c) in totals.iter_mut().zip(counts(&selected, 4)) {
                *t += c;
            }
        }
        assert!(
            totals[1] > totals[0] * 4,
            "fittest should dominate: {totals:?}"
        );
    }

    #[test]
    fn test_roulette_respects_attempt_cap() {
        // One viable individual among many zeros: acceptance is rare
        let mut scores = vec![0.0; 50];
        scores[0] = 1.0;
        let table = ScoreTable::new(&scores);
        let pop = normalized(&table);
        let mut rng = create_rng(42);
        let mut stats = SelectionStatistics::default();

        let selected = Selection::RouletteWheel
            .select(&pop, &mut rng, &mut stats)
            .unwrap();

        assert!(selected.len() <= 50);
        assert!(stats.iterations <= ROULETTE_ATTEMPTS_PER_MEMBER * 50);
        assert!(selected.iter().all(|c| c[0] == 0));
    }

    #[test]
    fn test_roulette_all_zero_fitness_is_uniform() {
        let table = ScoreTable::new(&[0.0; 6]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);
        let mut stats = SelectionStatistics::default();

        let selected = Selection::RouletteWheel
            .select(&pop, &mut rng, &mut stats)
            .unwrap();

        assert_eq!(selected.len(), 6);
        assert_eq!(stats.iterations, 6);
    }

    #[test]
    fn test_roulette_non_finite_max_falls_back_to_uniform() {
        let table = ScoreTable::new(&[f64::NAN, 1.0, 2.0]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);
        let mut stats = SelectionStatistics::default();

        let selected = Selection::RouletteWheel
            .select(&pop, &mut rng, &mut stats)
            .unwrap();
        assert_eq!(selected.len(), 3);
        assert_eq!(stats.iterations, 3);
    }

    #[test]
    fn test_unnormalized_population_rejected() {
        let table = ScoreTable::new(&[1.0, 2.0]);
        let mut rng = create_rng(7);
        let pop = Population::from_chains(&table, table.chains(), 2, 0, &mut rng).unwrap();
        let mut stats = SelectionStatistics::default();

        for selection in [
            Selection::RouletteWheel,
            Selection::Tournament(2),
            Selection::Rank,
        ] {
            assert_eq!(
                selection.select(&pop, &mut rng, &mut stats),
                Err(GaError::NotNormalized)
            );
        }
    }

    #[test]
    fn test_tournament_favors_best() {
        let table = ScoreTable::new(&[10.0, 5.0, 1.0, 8.0]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);
        let mut stats = SelectionStatistics::default();

        let mut totals = vec![0; 4];
        for _ in 0..500 {
            let selected = Selection::Tournament(4)
                .select(&pop, &mut rng, &mut stats)
                .unwrap();
            assert_eq!(selected.len(), 4);
            for (t, c) in totals.iter_mut().zip(counts(&selected, 4)) {
                *t += c;
            }
        }
        assert!(
            totals[0] > 1200,
            "expected best to win >60% of tournaments, got {totals:?}"
        );
        assert_eq!(stats.iterations, 16);
    }

    #[test]
    fn test_tournament_size_zero_behaves_as_one() {
        let table = ScoreTable::new(&[1.0, 2.0, 3.0]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);
        let mut stats = SelectionStatistics::default();

        let selected = Selection::Tournament(0)
            .select(&pop, &mut rng, &mut stats)
            .unwrap();
        assert_eq!(selected.len(), 3);
        assert_eq!(stats.iterations, 3);
    }

    #[test]
    fn test_rank_favors_best() {
        let table = ScoreTable::new(&[100.0, 50.0, 1.0, 80.0]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);
        let mut stats = SelectionStatistics::default();

        let mut totals = vec![0; 4];
        for _ in 0..500 {
            let selected = Selection::Rank.select(&pop, &mut rng, &mut stats).unwrap();
            for (t, c) in totals.iter_mut().zip(counts(&selected, 4)) {
                *t += c;
            }
        }
        assert!(
            totals[0] > totals[2],
            "best should be selected more: {totals:?}"
        );
    }

    #[test]
    fn test_tournament_and_rank_prefer_higher_negative_fitness() {
        // -1 is the better member; the negative sum inverts normalized order
        let table = ScoreTable::new(&[-1.0, -9.0]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);

        for selection in [Selection::Tournament(2), Selection::Rank] {
            let mut stats = SelectionStatistics::default();
            let mut totals = vec![0; 2];
            for _ in 0..500 {
                let selected = selection.select(&pop, &mut rng, &mut stats).unwrap();
                for (t, c) in totals.iter_mut().zip(counts(&selected, 2)) {
                    *t += c;
                }
            }
            assert!(
                totals[0] > totals[1],
                "{selection:?} should favor the -1 member: {totals:?}"
            );
        }
    }

    #[test]
    fn test_single_individual() {
        let table = ScoreTable::new(&[5.0]);
        let pop = normalized(&table);
        let mut rng = create_rng(42);
        let mut stats = SelectionStatistics::default();

        for selection in [
            Selection::RouletteWheel,
            Selection::Tournament(3),
            Selection::Rank,
        ] {
            let selected = selection.select(&pop, &mut rng, &mut stats).unwrap();
            assert_eq!(selected, vec![vec![0]]);
        }
    }

    proptest! {
        #[test]
        fn prop_selection_never_exceeds_popsize(
            scores in prop::collection::vec(0.0f64..100.0, 1..40),
            seed in any::<u64>(),
        ) {
            let table = ScoreTable::new(&scores);
            let pop = normalized(&table);
            let mut rng = create_rng(seed);

            for selection in [Selection::RouletteWheel, Selection::Tournament(3), Selection::Rank] {
                let mut stats = SelectionStatistics::default();
                let selected = selection.select(&pop, &mut rng, &mut stats).unwrap();
                prop_assert!(selected.len() <= pop.popsize());
                prop_assert!(stats.iterations <= ROULETTE_ATTEMPTS_PER_MEMBER * scores.len());
            }
        }
    }
}
