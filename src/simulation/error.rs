//! Error taxonomy for grid localization.

use thiserror::Error;

use crate::simulation::environment::Coordinate;

/// Errors raised by topology construction and belief updates.
///
/// Moving into a wall is not an error: the agent simply stays put.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocalizationError {
    #[error("sensor error rate must lie in [0, 1], got {0}")]
    InvalidErrorRate(f64),

    #[error("grid dimensions must be positive, got {columns}x{rows}")]
    EmptyGrid { columns: usize, rows: usize },

    #[error("obstacle {0} lies outside the grid")]
    ObstacleOutOfBounds(Coordinate),

    #[error("grid has no occupiable cells")]
    NoOccupiableCells,

    #[error("start position {0} is not an occupiable cell")]
    StartNotOccupiable(Coordinate),

    #[error("percept has zero likelihood under every reachable state")]
    DegenerateBelief,

    #[error("belief covers {actual} states but the grid has {expected}")]
    StateCountMismatch { expected: usize, actual: usize },

    #[error("invalid probability distribution (sum={0})")]
    InvalidDistribution(f64),
}

/// Result type for localization operations.
pub type Result<T> = std::result::Result<T, LocalizationError>;
