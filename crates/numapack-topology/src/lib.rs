//! numapack-topology — typed NUMA topology model.
//!
//! An immutable snapshot of one host's NUMA layout: per-node CPU sets,
//! CPUs already reserved by other workloads, and per-node memory.
//! Snapshots are rebuilt per scheduling attempt from a probe of host
//! hardware and validated on construction; nothing in this crate
//! mutates pinned or available fields afterwards. Reservation
//! bookkeeping belongs to the caller that commits a placement.

pub mod error;
pub mod node;
pub mod probe;
pub mod topology;

pub use error::{TopologyError, TopologyResult};
pub use node::{CpuSet, NumaNode};
pub use probe::ProbeReport;
pub use topology::NumaTopology;
