//! Error type shared by every component of the engine.

use thiserror::Error;

/// Errors raised by the genetic-algorithm core.
///
/// Fitness functions are never wrapped: a panicking fitness function
/// unwinds through the engine as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaError {
    /// A normalized fitness score was read before normalization.
    #[error("normalized fitness is unavailable: call normalize_based_on_sum_of_fitness(sum) (or Population::normalize) first")]
    NotNormalized,

    /// The configuration cannot drive an evolutionary run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An aggregate was requested from a population with no members.
    #[error("population is empty")]
    EmptyPopulation,

    /// `step` was called after the run reached a termination condition.
    #[error("evolution already terminated")]
    Terminated,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GaError>;
