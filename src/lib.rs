//! Generic genetic-algorithm engine.
//!
//! Evolves a population of encoded candidate solutions toward higher
//! fitness through repeated selection, crossover and mutation.
//!
//! - **Chromosome**: an immutable chain whose fitness is computed once, on
//!   first read, and can be normalized against the population total.
//! - **Population**: one generation; aggregates fitness, normalizes members
//!   and finds the fittest and least fit.
//! - **Operators**: fitness-proportionate (stochastic acceptance),
//!   tournament and rank selection; single-point crossover; bit-flip, swap,
//!   invert and custom mutation.
//! - **Orchestration**: a step-able generation loop with generation,
//!   target-fitness, stagnation, time and cancellation stopping conditions.
//!
//! # Architecture
//!
//! The crate contains no problem-specific encodings. Consumers implement
//! [`ga::GaProblem`] to map between their domain and a [`ga::Genotype`];
//! everything stochastic draws from a caller-supplied random source (see
//! [`random`]).

pub mod error;
pub mod ga;
pub mod random;

pub use error::{GaError, Result};
