//! Placement error types.

use thiserror::Error;

/// Result type alias for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Errors that can occur during host selection.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// Every candidate host was rejected by at least one filter.
    /// Per-host infeasibility is a normal `false`, not an error;
    /// only exhausting the whole candidate set surfaces here.
    #[error("no valid host found")]
    NoValidHost,

    #[error("invalid memory quantity: {0:?}")]
    InvalidMemoryQuantity(String),
}
