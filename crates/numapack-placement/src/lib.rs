//! numapack-placement — host selection for NUMA-pinned workloads.
//!
//! Given a workload request and a set of candidate hosts (topology
//! already resident in memory), decides per host whether the workload
//! fits and, for pinned workloads, which NUMA node it binds to. The
//! binding is recorded on the host state so the caller that commits
//! the reservation can see it.
//!
//! # Components
//!
//! - **`container`** — workload request types (`ContainerSpec`, typed
//!   memory quantities)
//! - **`host_state`** — per-attempt mutable view of one candidate host
//! - **`filter`** — the filter capability and the NUMA feasibility
//!   filter
//! - **`chain`** — ordered filter chains and destination selection

pub mod chain;
pub mod container;
pub mod error;
pub mod filter;
pub mod host_state;

pub use chain::FilterChain;
pub use container::{ContainerSpec, CpuPolicy, MemoryQuantity, MemoryUnit};
pub use error::{PlacementError, PlacementResult};
pub use filter::{FilterResult, HostFilter, NumaFilter};
pub use host_state::{HostLimits, HostState, NumaBinding};
