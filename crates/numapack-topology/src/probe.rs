//! Construction from the host-capability probe.
//!
//! The probe itself is an external collaborator; it hands over an
//! already-parsed report (node id → CPU list, plus per-node memory
//! sizes). A report that does not line up is a recoverable failure:
//! the caller excludes the host from the current scheduling round and
//! moves on.

use tracing::debug;

use crate::error::{TopologyError, TopologyResult};
use crate::node::{CpuSet, NumaNode};
use crate::topology::NumaTopology;

/// Parsed output of the host-capability probe.
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    /// Node id → logical CPU indices, in probe order.
    pub node_cpus: Vec<(u32, Vec<u32>)>,
    /// Per-node memory in MiB, positionally matching `node_cpus`.
    pub node_mem_mib: Vec<u64>,
    /// CPUs reserved for floating (non-pinned) workloads. These are
    /// never candidates for pinning and are excluded from every
    /// node's cpuset.
    pub floating_cpus: CpuSet,
}

impl NumaTopology {
    /// Build a fresh snapshot from a probe report.
    ///
    /// A fresh snapshot has no pinned CPUs and all memory available;
    /// current usage is layered on by the caller's resource tracker
    /// before any scheduling decision is made.
    pub fn from_probe(report: &ProbeReport) -> TopologyResult<Self> {
        if report.node_cpus.is_empty() {
            return Err(TopologyError::MalformedProbe(
                "probe reported no NUMA nodes".to_string(),
            ));
        }
        if report.node_cpus.len() != report.node_mem_mib.len() {
            return Err(TopologyError::MalformedProbe(format!(
                "{} cpu entries but {} memory entries",
                report.node_cpus.len(),
                report.node_mem_mib.len()
            )));
        }

        let nodes = report
            .node_cpus
            .iter()
            .zip(&report.node_mem_mib)
            .map(|((id, cpus), &mem)| {
                let cpuset: CpuSet = cpus
                    .iter()
                    .copied()
                    .filter(|c| !report.floating_cpus.contains(c))
                    .collect();
                NumaNode {
                    id: *id,
                    cpuset,
                    pinned_cpus: CpuSet::new(),
                    mem_total: mem,
                    mem_available: mem,
                }
            })
            .collect();

        let topology = Self::new(nodes)?;
        debug!(nodes = topology.len(), "built numa topology from probe");
        Ok(topology)
    }
}
