//! GA evolutionary loop execution.
//!
//! [`Evolution`] owns the current generation and advances it one step at a
//! time: evaluate → normalize → select → breed → replace. [`GaRunner`] wraps
//! it for the common case of running to a configured stopping condition.

use super::config::GaConfig;
use super::crossover::CrossoverStatistics;
use super::mutation::Mutation;
use super::population::Population;
use super::selection::SelectionStatistics;
use super::types::GaProblem;
use crate::error::{GaError, Result};
use crate::random::rng_from_seed;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where the orchestrator is within a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The first generation exists but no step has run yet.
    Initializing,
    Evaluating,
    Normalizing,
    Selecting,
    Breeding,
    Replacing,
    Terminated,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `max_generations` generations were evaluated.
    MaxGenerations,
    /// A generation reached `target_fitness`.
    TargetReached,
    /// No new best for `stagnation_limit` generations.
    Stagnated,
    /// `time_limit_ms` elapsed.
    TimeLimit,
    /// The cancellation flag was raised.
    Cancelled,
    /// The caller's predicate asked to stop.
    Stopped,
}

/// Snapshot of one evaluated generation.
#[derive(Debug, Clone)]
pub struct GenerationReport<C, V> {
    /// Index of the generation that was evaluated.
    pub generation: usize,

    /// Chain of the generation's fittest member.
    pub best_chain: C,

    /// Decoded value of the generation's fittest member.
    pub best_value: V,

    /// Raw fitness of the generation's fittest member.
    pub best_fitness: f64,

    /// Raw fitness of the generation's least fit member.
    pub least_fitness: f64,

    /// Mean raw fitness of the generation.
    pub mean_fitness: f64,

    /// Number of parent chains selection produced.
    pub selected: usize,

    pub selection: SelectionStatistics,

    pub crossover: CrossoverStatistics,
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<C, V> {
    /// Best chain seen in any evaluated generation.
    pub best_chain: C,

    /// `best_chain` decoded.
    pub best_value: V,

    /// Fitness of `best_chain`.
    pub best_fitness: f64,

    /// Total number of generations evaluated.
    pub generations: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Best fitness of each generation evaluated during this run.
    pub fitness_history: Vec<f64>,
}

impl<C, V> GaResult<C, V> {
    /// Whether the run was terminated due to stagnation.
    pub fn stagnated(&self) -> bool {
        self.termination == Termination::Stagnated
    }

    /// Whether the run was cancelled externally.
    pub fn cancelled(&self) -> bool {
        self.termination == Termination::Cancelled
    }
}

/// Generation-by-generation driver.
///
/// The random source is injectable: [`Evolution::new`] seeds a [`StdRng`]
/// from [`GaConfig::seed`], [`Evolution::with_rng`] accepts any generator.
///
/// # Usage
///
/// ```
/// use u_evolution::ga::{BitFlipMutation, Evolution, GaConfig, GaProblem};
/// # use rand::Rng;
/// # struct OneMax;
/// # impl GaProblem for OneMax {
/// #     type Value = Vec<bool>;
/// #     type Chain = String;
/// #     fn random_value<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
/// #         (0..16).map(|_| rng.random_bool(0.5)).collect()
/// #     }
/// #     fn encode(&self, v: &Vec<bool>) -> String {
/// #         v.iter().map(|&b| if b { '1' } else { '0' }).collect()
/// #     }
/// #     fn decode(&self, c: &String) -> Vec<bool> { c.chars().map(|c| c == '1').collect() }
/// #     fn fitness(&self, v: &Vec<bool>) -> f64 { v.iter().filter(|&&b| b).count() as f64 }
/// # }
///
/// let problem = OneMax;
/// let config = GaConfig::default().with_population_size(20).with_seed(7);
/// let mut evolution = Evolution::new(&problem, config, BitFlipMutation::new(0.05))?;
///
/// let report = evolution.step()?;
/// assert_eq!(report.generation, 0);
/// assert_eq!(evolution.generation(), 1);
/// # Ok::<(), u_evolution::GaError>(())
/// ```
pub struct Evolution<'a, P: GaProblem, M, R = StdRng> {
    problem: &'a P,
    config: GaConfig,
    mutation: M,
    rng: R,
    population: Population<'a, P>,
    phase: Phase,
    best: Option<(P::Chain, f64)>,
}

impl<'a, P, M> Evolution<'a, P, M, StdRng>
where
    P: GaProblem,
    M: Mutation<P::Chain>,
{
    /// Creates a run seeded from `config.seed` (OS entropy when `None`).
    ///
    /// # Errors
    /// [`GaError::InvalidConfig`] if the configuration does not validate.
    pub fn new(problem: &'a P, config: GaConfig, mutation: M) -> Result<Self> {
        let rng = rng_from_seed(config.seed);
        Self::with_rng(problem, config, mutation, rng)
    }
}

impl<'a, P, M, R> Evolution<'a, P, M, R>
where
    P: GaProblem,
    M: Mutation<P::Chain>,
    R: Rng,
{
    /// Creates a run drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn with_rng(problem: &'a P, config: GaConfig, mutation: M, mut rng: R) -> Result<Self> {
        config.validate()?;
        let population = Population::random(problem, config.population_size, 0, &mut rng)?;
        Ok(Self {
            problem,
            config,
            mutation,
            rng,
            population,
            phase: Phase::Initializing,
            best: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the generation that the next [`step`](Self::step) evaluates.
    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    /// The current, possibly not yet evaluated, generation.
    pub fn population(&self) -> &Population<'a, P> {
        &self.population
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Best chain and fitness seen so far.
    pub fn best(&self) -> Option<(&P::Chain, f64)> {
        self.best.as_ref().map(|(chain, fitness)| (chain, *fitness))
    }

    fn best_score(&self) -> f64 {
        self.best.as_ref().map_or(f64::NEG_INFINITY, |(_, f)| *f)
    }

    fn record_best(&mut self, chain: &P::Chain, fitness: f64) {
        if self.best.is_none() || fitness > self.best_score() {
            self.best = Some((chain.clone(), fitness));
        }
    }

    /// Stops the run; further [`step`](Self::step) calls fail.
    pub fn terminate(&mut self) {
        self.phase = Phase::Terminated;
    }

    /// Evaluates the current generation and breeds the next one.
    ///
    /// Returns the report of the generation that was evaluated. The
    /// previous population is dropped and replaced by one built from the
    /// crossover output.
    ///
    /// # Errors
    /// [`GaError::Terminated`] once the run has terminated.
    pub fn step(&mut self) -> Result<GenerationReport<P::Chain, P::Value>> {
        if self.phase == Phase::Terminated {
            return Err(GaError::Terminated);
        }
        let generation = self.population.generation();

        self.phase = Phase::Evaluating;
        self.population.evaluate();

        self.phase = Phase::Normalizing;
        self.population.normalize();

        let fittest = self.population.highest_fitness()?;
        let best_chain = fittest.clone_chain();
        let best_fitness = fittest.fitness_score();
        let best_value = fittest.value();
        let least_fitness = self.population.lowest_fitness()?.fitness_score();
        let mean_fitness = self.population.mean_fitness();
        self.record_best(&best_chain, best_fitness);

        self.phase = Phase::Selecting;
        let mut selection = SelectionStatistics::default();
        let parents = self
            .config
            .selection
            .select(&self.population, &mut self.rng, &mut selection)?;
        let selected = parents.len();

        self.phase = Phase::Breeding;
        let mut crossover = CrossoverStatistics::default();
        let children =
            self.config
                .crossover
                .crossover(parents, &self.mutation, &mut self.rng, &mut crossover);

        self.phase = Phase::Replacing;
        self.population = Population::from_chains(
            self.problem,
            children,
            self.config.population_size,
            generation + 1,
            &mut self.rng,
        )?;
        self.phase = Phase::Evaluating;

        debug!(
            "generation {generation}: best={best_fitness:.6} mean={mean_fitness:.6} \
             selected={selected} selection_iterations={} crossover_time={:?}",
            selection.iterations, crossover.elapsed
        );

        Ok(GenerationReport {
            generation,
            best_chain,
            best_value,
            best_fitness,
            least_fitness,
            mean_fitness,
            selected,
            selection,
            crossover,
        })
    }

    /// Runs until one of the configured stopping conditions holds.
    pub fn run(&mut self) -> Result<GaResult<P::Chain, P::Value>> {
        self.drive(None, |_| false)
    }

    /// Like [`run`](Self::run), also stopping when `stop` returns `true`
    /// for a generation report.
    pub fn run_until<F>(&mut self, stop: F) -> Result<GaResult<P::Chain, P::Value>>
    where
        F: FnMut(&GenerationReport<P::Chain, P::Value>) -> bool,
    {
        self.drive(None, stop)
    }

    /// Like [`run`](Self::run), also stopping once `cancel` is raised.
    ///
    /// The flag is only checked between generations.
    pub fn run_with_cancel(&mut self, cancel: &AtomicBool) -> Result<GaResult<P::Chain, P::Value>> {
        self.drive(Some(cancel), |_| false)
    }

    fn drive<F>(
        &mut self,
        cancel: Option<&AtomicBool>,
        mut stop: F,
    ) -> Result<GaResult<P::Chain, P::Value>>
    where
        F: FnMut(&GenerationReport<P::Chain, P::Value>) -> bool,
    {
        if self.phase == Phase::Terminated {
            return Err(GaError::Terminated);
        }

        let started = Instant::now();
        let time_limit = self.config.time_limit_ms.map(Duration::from_millis);
        let mut fitness_history = Vec::new();
        let mut stagnation_counter = 0usize;

        let termination = loop {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break Termination::Cancelled;
            }
            if time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                break Termination::TimeLimit;
            }
            if self.population.generation() >= self.config.max_generations {
                break Termination::MaxGenerations;
            }

            let previous_best = self.best_score();
            let report = self.step()?;
            fitness_history.push(report.best_fitness);

            if self.best_score() > previous_best {
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            if self
                .config
                .target_fitness
                .is_some_and(|target| report.best_fitness >= target)
            {
                break Termination::TargetReached;
            }
            if stop(&report) {
                break Termination::Stopped;
            }
            if self.config.stagnation_limit > 0
                && stagnation_counter >= self.config.stagnation_limit
            {
                break Termination::Stagnated;
            }
        };

        self.finish(termination, fitness_history)
    }

    fn finish(
        &mut self,
        termination: Termination,
        fitness_history: Vec<f64>,
    ) -> Result<GaResult<P::Chain, P::Value>> {
        if self.best.is_none() {
            // stopped before any generation was evaluated
            let fittest = self.population.highest_fitness()?;
            self.best = Some((fittest.clone_chain(), fittest.fitness_score()));
        }
        self.phase = Phase::Terminated;

        let (best_chain, best_fitness) = match &self.best {
            Some((chain, fitness)) => (chain.clone(), *fitness),
            None => return Err(GaError::EmptyPopulation),
        };
        let generations = self.population.generation();

        info!(
            "GA stopped after {generations} generations ({termination:?}), best fitness {best_fitness:.6}"
        );

        Ok(GaResult {
            best_value: self.problem.decode(&best_chain),
            best_chain,
            best_fitness,
            generations,
            termination,
            fitness_history,
        })
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config, BitFlipMutation::new(0.01))?;
/// println!("Best fitness: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Errors
    /// [`GaError::InvalidConfig`] if the configuration does not validate.
    pub fn run<P, M>(
        problem: &P,
        config: &GaConfig,
        mutation: M,
    ) -> Result<GaResult<P::Chain, P::Value>>
    where
        P: GaProblem,
        M: Mutation<P::Chain>,
    {
        Self::run_with_cancel(problem, config, mutation, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before evaluating the next generation and returns the best solution
    /// found so far.
    pub fn run_with_cancel<P, M>(
        problem: &P,
        config: &GaConfig,
        mutation: M,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Chain, P::Value>>
    where
        P: GaProblem,
        M: Mutation<P::Chain>,
    {
        let mut evolution = Evolution::new(problem, config.clone(), mutation)?;
        evolution.drive(cancel.as_deref(), |_| false)
    }
}

// ============================================================================
// Tests
// ============================================================================
