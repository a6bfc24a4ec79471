//! Validated, ordered NUMA topology snapshots.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{TopologyError, TopologyResult};
use crate::node::NumaNode;

/// Ordered sequence of NUMA nodes for one host.
///
/// The stored order is the evaluation order consumers rely on: the
/// feasibility filter and the report adapter both walk it back to
/// front, so array positions correlate across subsystems. The order
/// is not necessarily node-id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumaTopology {
    nodes: Vec<NumaNode>,
}

impl NumaTopology {
    /// Build a topology, rejecting snapshots that violate the model:
    /// pinned CPUs outside their node's cpuset, more available than
    /// total memory, duplicate node ids, or a CPU owned by two nodes.
    pub fn new(nodes: Vec<NumaNode>) -> TopologyResult<Self> {
        let mut seen_ids = BTreeSet::new();
        for node in &nodes {
            if !node.pinned_cpus.is_subset(&node.cpuset) {
                return Err(TopologyError::PinnedOutsideCpuset { node: node.id });
            }
            if node.mem_available > node.mem_total {
                return Err(TopologyError::MemAvailableExceedsTotal { node: node.id });
            }
            if !seen_ids.insert(node.id) {
                return Err(TopologyError::DuplicateNodeId { id: node.id });
            }
        }
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                if !a.cpuset.is_disjoint(&b.cpuset) {
                    return Err(TopologyError::OverlappingCpusets { a: a.id, b: b.id });
                }
            }
        }
        Ok(Self { nodes })
    }

    /// Nodes in stored order.
    pub fn nodes(&self) -> &[NumaNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
