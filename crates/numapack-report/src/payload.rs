//! Topology report payload for the resource tracker.

use numapack_topology::{NumaNode, NumaTopology};
use serde::{Deserialize, Serialize};

/// One NUMA node in the shape the tracker wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumaNodeReport {
    pub id: u32,
    pub memory: u64,
    pub memory_usage: u64,
    pub cpuset: Vec<u32>,
    pub pinned_cpus: Vec<u32>,
    pub cpu_usage: u64,
}

impl From<&NumaNode> for NumaNodeReport {
    fn from(node: &NumaNode) -> Self {
        Self {
            id: node.id,
            memory: node.mem_total,
            memory_usage: node.mem_used(),
            cpuset: node.cpuset.iter().copied().collect(),
            pinned_cpus: node.pinned_cpus.iter().copied().collect(),
            cpu_usage: node.pinned_cpus.len() as u64,
        }
    }
}

/// Idempotent full-replace payload for one resource provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyReport {
    pub uuid: String,
    pub numa_topology: Vec<NumaNodeReport>,
}

/// Render a topology in reverse stored order — the same order the
/// feasibility filter walks — so array positions correlate across
/// subsystems.
pub fn topology_report(topology: &NumaTopology, rp_uuid: impl Into<String>) -> TopologyReport {
    TopologyReport {
        uuid: rp_uuid.into(),
        numa_topology: topology
            .nodes()
            .iter()
            .rev()
            .map(NumaNodeReport::from)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numapack_topology::CpuSet;

    fn topology() -> NumaTopology {
        NumaTopology::new(vec![
            NumaNode {
                id: 0,
                cpuset: [0, 1, 2, 3].into_iter().collect(),
                pinned_cpus: [1, 3].into_iter().collect(),
                mem_total: 4096,
                mem_available: 1024,
            },
            NumaNode {
                id: 1,
                cpuset: [4, 5, 6, 7].into_iter().collect(),
                pinned_cpus: CpuSet::new(),
                mem_total: 4096,
                mem_available: 4096,
            },
        ])
        .unwrap()
    }

    #[test]
    fn nodes_are_emitted_in_reverse_order() {
        let report = topology_report(&topology(), "rp-1");

        let ids: Vec<u32> = report.numa_topology.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 0]);
        assert_eq!(report.uuid, "rp-1");
    }

    #[test]
    fn usage_fields_are_derived() {
        let report = topology_report(&topology(), "rp-1");
        let node0 = &report.numa_topology[1];

        assert_eq!(node0.memory, 4096);
        assert_eq!(node0.memory_usage, 3072);
        assert_eq!(node0.cpuset, vec![0, 1, 2, 3]);
        assert_eq!(node0.pinned_cpus, vec![1, 3]);
        assert_eq!(node0.cpu_usage, 2);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let report = topology_report(&topology(), "rp-1");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["uuid"], "rp-1");
        assert_eq!(json["numa_topology"][0]["id"], 1);
        assert_eq!(json["numa_topology"][1]["memory_usage"], 3072);
        assert_eq!(json["numa_topology"][1]["pinned_cpus"][0], 1);
    }
}
