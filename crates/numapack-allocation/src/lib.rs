//! numapack-allocation — allocation records and the move merge engine.
//!
//! The authoritative allocation state lives in the external resource
//! tracker; this crate only computes the *next* desired state. Its
//! centerpiece is the move-operation merge: one allocation request
//! that covers both hosts during a migration window, or collapses to
//! a single summed entry for a resize in place.

pub mod error;
pub mod merge;
pub mod types;

pub use error::{AllocationError, AllocationResult};
pub use merge::{MergeSign, merge_resources, move_operation_request};
pub use types::{
    AllocationRequest, ProviderAllocation, ProviderRef, ResourceClass, Resources,
    SourceAllocations, allocations_equal, normalized,
};
