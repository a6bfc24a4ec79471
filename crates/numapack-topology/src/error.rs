//! Topology construction errors.

use thiserror::Error;

/// Result type alias for topology construction.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors raised while building a topology snapshot.
///
/// All of these are recoverable from the scheduler's point of view:
/// the affected host is excluded from the current round rather than
/// failing the whole request.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("malformed probe report: {0}")]
    MalformedProbe(String),

    #[error("node {node}: pinned cpus are not a subset of the node cpuset")]
    PinnedOutsideCpuset { node: u32 },

    #[error("node {node}: available memory exceeds total")]
    MemAvailableExceedsTotal { node: u32 },

    #[error("nodes {a} and {b} share cpus")]
    OverlappingCpusets { a: u32, b: u32 },

    #[error("duplicate node id: {id}")]
    DuplicateNodeId { id: u32 },
}
