//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::crossover::Crossover;
use super::selection::Selection;
use crate::error::{GaError, Result};

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, operator choice and termination conditions.
/// The mutation strategy is not part of the configuration: it is a typed
/// value handed to the runner alongside the problem.
///
/// # Defaults
///
/// ```
/// use u_evolution::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolution::ga::{Crossover, GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(5))
///     .with_crossover(Crossover::None)
///     .with_target_fitness(42.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in every generation.
    pub population_size: usize,

    /// Maximum number of generations to evaluate.
    pub max_generations: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Crossover strategy for breeding children.
    pub crossover: Crossover,

    /// Stop as soon as a generation's best fitness reaches this value.
    pub target_fitness: Option<f64>,

    /// Number of generations without a new best before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination (the default).
    pub stagnation_limit: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so the actual runtime may
    /// exceed the limit by one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            selection: Selection::default(),
            crossover: Crossover::default(),
            target_fitness: None,
            stagnation_limit: 0,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the fitness at which the run stops.
    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = Some(target);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for quick runs: small population, few generations.
    ///
    /// - Population: 50, Generations: 100, Time limit: 10s
    /// - Stagnation limit: 20
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            stagnation_limit: 20,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Preset balancing solution quality and run time.
    ///
    /// - Population: 100, Generations: 300, Time limit: 30s
    /// - Stagnation limit: 50
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            stagnation_limit: 50,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Preset for quality: large population, many generations.
    ///
    /// - Population: 150, Generations: 500, Time limit: 60s
    /// - Stagnation limit: 80
    pub fn quality() -> Self {
        Self {
            population_size: 150,
            max_generations: 500,
            stagnation_limit: 80,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`GaError::InvalidConfig`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        if self.selection == Selection::Tournament(0) {
            return Err(invalid("tournament size must be at least 1"));
        }
        if let Some(target) = self.target_fitness {
            if !target.is_finite() {
                return Err(invalid("target_fitness must be finite"));
            }
        }
        if self.time_limit_ms == Some(0) {
            return Err(invalid("time_limit_ms must be positive or None"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> GaError {
    GaError::InvalidConfig(message.to_string())
}
