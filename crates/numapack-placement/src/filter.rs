//! The filter capability and the NUMA feasibility filter.

use tracing::debug;

use crate::container::{ContainerSpec, CpuPolicy};
use crate::host_state::{HostState, NumaBinding};

/// Outcome of running one filter against one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    pub passed: bool,
    /// Binding decision, present only when a filter passed with a
    /// concrete node choice.
    pub binding: Option<NumaBinding>,
}

impl FilterResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            binding: None,
        }
    }

    pub fn pass_with(binding: NumaBinding) -> Self {
        Self {
            passed: true,
            binding: Some(binding),
        }
    }

    pub fn fail() -> Self {
        Self {
            passed: false,
            binding: None,
        }
    }
}

/// A host filter: a pure function over one host and one workload.
///
/// Filters do not mutate the host themselves; any binding they decide
/// on travels in the [`FilterResult`] and is committed by the chain.
pub trait HostFilter {
    fn name(&self) -> &'static str;

    /// Hint that the result does not vary across workloads within one
    /// scheduling request. An optimization for the caller, not a
    /// correctness requirement.
    fn run_once_per_request(&self) -> bool {
        false
    }

    fn filter(&self, host: &HostState, spec: &ContainerSpec) -> FilterResult;
}

/// Filters hosts by whether a pinned workload's CPU count and memory
/// request fit on a single NUMA node.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumaFilter;

impl HostFilter for NumaFilter {
    fn name(&self) -> &'static str {
        "numa"
    }

    fn run_once_per_request(&self) -> bool {
        true
    }

    fn filter(&self, host: &HostState, spec: &ContainerSpec) -> FilterResult {
        if spec.cpu_policy != CpuPolicy::Dedicated {
            // Shared workloads float across nodes; nothing to bind.
            return FilterResult::pass();
        }

        let requested_mib = spec.memory.to_mib();
        // Reverse order is policy, not accident: placement is biased
        // toward higher-numbered nodes, and the first fit wins. A node
        // with zero free CPUs or zero free memory is a normal miss.
        for node in host.numa_topology.nodes().iter().rev() {
            let cpu_fits = node.free_cpu_count() >= spec.cpu as usize;
            let mem_fits = node.mem_available >= requested_mib;
            if cpu_fits && mem_fits {
                debug!(
                    host = %host.hostname,
                    node = node.id,
                    free_cpus = node.free_cpu_count(),
                    mem_available = node.mem_available,
                    "numa filter selected node"
                );
                return FilterResult::pass_with(NumaBinding {
                    node: node.id,
                    cpuset: node.cpuset.clone(),
                    pinned_cpus: node.pinned_cpus.clone(),
                    mem_available: node.mem_available,
                });
            }
        }

        debug!(
            host = %host.hostname,
            cpu = spec.cpu,
            memory_mib = requested_mib,
            "no numa node fits"
        );
        FilterResult::fail()
    }
}
