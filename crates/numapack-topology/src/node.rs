//! Per-node CPU and memory accounting.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of logical CPU indices.
///
/// Ordered, so iteration (and anything derived from it, like the
/// report payload) is deterministic.
pub type CpuSet = BTreeSet<u32>;

/// One NUMA node: the CPUs it owns, the CPUs already reserved by
/// other workloads, and its memory in MiB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumaNode {
    /// Stable within one topology snapshot.
    pub id: u32,
    pub cpuset: CpuSet,
    /// Subset of `cpuset` currently reserved by other workloads.
    pub pinned_cpus: CpuSet,
    pub mem_total: u64,
    pub mem_available: u64,
}

impl NumaNode {
    /// CPUs still free for pinning (`cpuset − pinned_cpus`).
    pub fn free_cpus(&self) -> CpuSet {
        self.cpuset.difference(&self.pinned_cpus).copied().collect()
    }

    /// Number of CPUs still free for pinning.
    pub fn free_cpu_count(&self) -> usize {
        self.cpuset.difference(&self.pinned_cpus).count()
    }

    /// MiB consumed on this node.
    pub fn mem_used(&self) -> u64 {
        self.mem_total.saturating_sub(self.mem_available)
    }
}
