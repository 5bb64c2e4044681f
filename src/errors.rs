use std::error::Error;

use thiserror::Error;

use crate::algorithm::Phase;

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> std::result::Result<(), E>;
}

#[derive(Debug, Error)]
pub enum TspError {
    /// Coordinate data (or a user supplied tour) cannot be turned into a valid instance
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// No spanning tree exists; impossible for complete graphs with finite weights
    #[error("graph is disconnected: spanning tree has {found} of {expected} edges")]
    DisconnectedGraph { found: usize, expected: usize },

    /// The odd-degree vertices could not be paired up perfectly
    #[error("matching failure: {0}")]
    MatchingFailure(String),

    /// A produced tour violates the Hamiltonian cycle invariant
    #[error("invalid tour: {0}")]
    InvalidTour(String),

    /// The caller asked to abandon the computation
    #[error("computation interrupted during {phase}")]
    Timeout { phase: Phase },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TspError>;

impl TspError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TspError::Timeout { .. })
    }
}
