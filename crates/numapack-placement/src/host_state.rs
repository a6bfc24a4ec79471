//! Scheduling-time view of one candidate host.

use numapack_topology::{CpuSet, NumaTopology};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The binding decision a passing NUMA filter records: which node was
/// chosen, plus the full pre-subtraction view of it for the claim
/// logic that later commits the reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumaBinding {
    pub node: u32,
    pub cpuset: CpuSet,
    pub pinned_cpus: CpuSet,
    pub mem_available: u64,
}

/// A binding plus the host-wide totals in force when it was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostLimits {
    pub binding: NumaBinding,
    pub cpu: u32,
    pub memory: u64,
}

/// Mutable per-attempt view of a candidate host.
///
/// Rebuilt per scheduling request from the latest known host state;
/// there is no persistent identity across requests. `limits` is the
/// only field filters write, and only once per attempt: single writer,
/// then readers.
#[derive(Debug, Clone)]
pub struct HostState {
    pub hostname: String,
    pub numa_topology: NumaTopology,
    /// Host-wide CPU count.
    pub cpus: u32,
    /// Host-wide memory in MiB.
    pub mem_total: u64,
    limits: Option<HostLimits>,
}

impl HostState {
    pub fn new(
        hostname: impl Into<String>,
        numa_topology: NumaTopology,
        cpus: u32,
        mem_total: u64,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            numa_topology,
            cpus,
            mem_total,
            limits: None,
        }
    }

    /// Record a passing filter's binding along with the host-wide
    /// totals. Write-once per attempt: the first binding wins and
    /// later writes are dropped.
    pub fn record_limits(&mut self, binding: NumaBinding) {
        if self.limits.is_some() {
            debug!(host = %self.hostname, "limits already recorded, keeping first binding");
            return;
        }
        self.limits = Some(HostLimits {
            binding,
            cpu: self.cpus,
            memory: self.mem_total,
        });
    }

    /// The binding decision for this attempt, if any filter passed
    /// with one.
    pub fn limits(&self) -> Option<&HostLimits> {
        self.limits.as_ref()
    }
}
