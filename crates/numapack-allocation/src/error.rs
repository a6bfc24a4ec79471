//! Allocation contract errors.

use thiserror::Error;

/// Result type alias for allocation operations.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Contract violations in allocation input. These fail fast; the
/// merge never silently coerces malformed input.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// A provider entry arrived without any resource classes.
    #[error("provider {provider} has no resources")]
    EmptyResources { provider: String },

    /// A subtraction would take a resource class below zero.
    #[error("resource class {class}: cannot subtract {subtract} from {have}")]
    NegativeQuantity {
        class: String,
        have: u64,
        subtract: u64,
    },

    /// An addition would overflow a resource class quantity.
    #[error("resource class {class}: adding {add} to {have} overflows")]
    QuantityOverflow { class: String, have: u64, add: u64 },
}
