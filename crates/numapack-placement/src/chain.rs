//! Ordered filter chains and destination selection.

use tracing::{debug, info};

use crate::container::ContainerSpec;
use crate::error::{PlacementError, PlacementResult};
use crate::filter::{HostFilter, NumaFilter};
use crate::host_state::HostState;

/// An ordered set of filters, short-circuiting on the first failure.
pub struct FilterChain {
    filters: Vec<Box<dyn HostFilter>>,
}

impl FilterChain {
    pub fn new(filters: Vec<Box<dyn HostFilter>>) -> Self {
        Self { filters }
    }

    /// Run every filter against one host, in order, stopping at the
    /// first failure. Any binding a passing filter produced is
    /// committed into `host.limits` — the single permitted side
    /// effect, visible to the caller that claims the reservation.
    pub fn passes(&self, host: &mut HostState, spec: &ContainerSpec) -> bool {
        for filter in &self.filters {
            let result = filter.filter(host, spec);
            if !result.passed {
                debug!(host = %host.hostname, filter = filter.name(), "host rejected");
                return false;
            }
            if let Some(binding) = result.binding {
                host.record_limits(binding);
            }
        }
        true
    }

    /// Pick the first candidate host that passes every filter.
    ///
    /// Candidates are tried in the order given. Per-host
    /// infeasibility is normal; only the exhaustion of every
    /// candidate is surfaced, as [`PlacementError::NoValidHost`].
    pub fn select_destination(
        &self,
        hosts: &mut [HostState],
        spec: &ContainerSpec,
    ) -> PlacementResult<usize> {
        for (idx, host) in hosts.iter_mut().enumerate() {
            if self.passes(host, spec) {
                info!(host = %host.hostname, "selected destination host");
                return Ok(idx);
            }
        }
        Err(PlacementError::NoValidHost)
    }
}

impl Default for FilterChain {
    /// The standard chain: the NUMA feasibility filter alone.
    fn default() -> Self {
        Self::new(vec![Box::new(NumaFilter)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::CpuPolicy;
    use crate::filter::FilterResult;
    use numapack_topology::{CpuSet, NumaNode, NumaTopology};

    struct RejectAll;

    impl HostFilter for RejectAll {
        fn name(&self) -> &'static str {
            "reject-all"
        }

        fn filter(&self, _host: &HostState, _spec: &ContainerSpec) -> FilterResult {
            FilterResult::fail()
        }
    }

    fn host(hostname: &str, free_cpus: u32, mem_available: u64) -> HostState {
        let topology = NumaTopology::new(vec![NumaNode {
            id: 0,
            cpuset: (0..free_cpus).collect(),
            pinned_cpus: CpuSet::new(),
            mem_total: 8192,
            mem_available,
        }])
        .unwrap();
        HostState::new(hostname, topology, free_cpus, 8192)
    }

    fn dedicated(cpu: u32, memory: &str) -> ContainerSpec {
        ContainerSpec {
            cpu_policy: CpuPolicy::Dedicated,
            cpu,
            memory: memory.parse().unwrap(),
            host: None,
        }
    }

    #[test]
    fn passing_chain_commits_binding() {
        let chain = FilterChain::default();
        let mut h = host("host-1", 4, 4096);

        assert!(chain.passes(&mut h, &dedicated(2, "1024M")));

        let limits = h.limits().unwrap();
        assert_eq!(limits.binding.node, 0);
        assert_eq!(limits.cpu, 4);
        assert_eq!(limits.memory, 8192);
    }

    #[test]
    fn shared_pass_leaves_limits_unset() {
        let chain = FilterChain::default();
        let mut h = host("host-1", 0, 0);
        let spec = ContainerSpec {
            cpu_policy: CpuPolicy::Shared,
            cpu: 0,
            memory: "1M".parse().unwrap(),
            host: None,
        };

        assert!(chain.passes(&mut h, &spec));
        assert!(h.limits().is_none());
    }

    #[test]
    fn failing_host_leaves_limits_unset() {
        let chain = FilterChain::default();
        let mut h = host("host-1", 2, 4096);

        assert!(!chain.passes(&mut h, &dedicated(8, "1024M")));
        assert!(h.limits().is_none());
    }

    #[test]
    fn chain_short_circuits_on_first_failure() {
        // The rejecting filter runs first, so the NUMA filter never
        // gets a chance to bind.
        let chain = FilterChain::new(vec![Box::new(RejectAll), Box::new(NumaFilter)]);
        let mut h = host("host-1", 4, 4096);

        assert!(!chain.passes(&mut h, &dedicated(2, "1024M")));
        assert!(h.limits().is_none());
    }

    #[test]
    fn selects_first_feasible_host() {
        let chain = FilterChain::default();
        let mut hosts = vec![
            host("small", 1, 512),
            host("fits", 4, 4096),
            host("also-fits", 8, 8192),
        ];

        let idx = chain
            .select_destination(&mut hosts, &dedicated(2, "1024M"))
            .unwrap();

        assert_eq!(idx, 1);
        assert!(hosts[1].limits().is_some());
        assert!(hosts[0].limits().is_none());
        // Selection stops at the first pass; later hosts are untouched.
        assert!(hosts[2].limits().is_none());
    }

    #[test]
    fn exhausted_candidates_are_no_valid_host() {
        let chain = FilterChain::default();
        let mut hosts = vec![host("small", 1, 512), host("tiny", 1, 256)];

        let err = chain
            .select_destination(&mut hosts, &dedicated(4, "1024M"))
            .unwrap_err();

        assert!(matches!(err, PlacementError::NoValidHost));
    }
}
