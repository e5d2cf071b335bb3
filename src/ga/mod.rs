//! Genetic Algorithm engine.
//!
//! A generic GA built around lazily evaluated chromosomes and pluggable
//! operators. Users describe their problem by implementing [`GaProblem`]:
//! how to draw a random candidate, encode it to a chain, decode it back and
//! score it.
//!
//! # Core Types
//!
//! - [`Chromosome`]: one chain with memoized fitness and a normalized score
//! - [`Population`]: one generation; fitness sum, normalization, fittest
//! - [`Selection`]: roulette wheel (stochastic acceptance), tournament, rank
//! - [`Crossover`]: none or single-point, applying a [`Mutation`] per child
//! - [`Mutation`]: no-op, bit flip, swap, invert or any closure
//! - [`Evolution`] / [`GaRunner`]: the generation loop
//!
//! # Generation Loop
//!
//! ```text
//! evaluate → normalize → select → crossover + mutate → replace → ...
//! ```
//!
//! All randomness comes from a generator passed in by the caller (or seeded
//! from [`GaConfig::seed`]), so seeded runs are reproducible.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Lipowski & Lipowska (2012), "Roulette-wheel selection via stochastic acceptance"

mod chromosome;
mod config;
mod crossover;
mod mutation;
mod population;
mod runner;
mod selection;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use chromosome::Chromosome;
pub use config::GaConfig;
pub use crossover::{Crossover, CrossoverStatistics, CutPoint, SinglePointCrossover};
pub use mutation::{
    BitFlipMutation, FnMutation, InvertMutation, Mutation, NoMutation, SwapMutation,
};
pub use population::Population;
pub use runner::{Evolution, GaResult, GaRunner, GenerationReport, Phase, Termination};
pub use selection::{Selection, SelectionStatistics, ROULETTE_ATTEMPTS_PER_MEMBER};
pub use types::{BitChain, BitGenotype, GaProblem, Genotype};
