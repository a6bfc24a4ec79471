//! Allocation wire types for the external resource tracker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resource class name (`"VCPU"`, `"MEMORY_MB"`, ...).
pub type ResourceClass = String;

/// Class → non-negative quantity. A `BTreeMap` keeps emission order
/// stable, which matters for debugging and tests, not semantics.
pub type Resources = BTreeMap<ResourceClass, u64>;

/// Current allocations on a source host, keyed by resource-provider
/// uuid.
pub type SourceAllocations = BTreeMap<String, Resources>;

/// Reference to a resource provider by its opaque uuid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    pub uuid: String,
}

/// Resources claimed against one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAllocation {
    pub resource_provider: ProviderRef,
    pub resources: Resources,
}

impl ProviderAllocation {
    pub fn new(uuid: impl Into<String>, resources: Resources) -> Self {
        Self {
            resource_provider: ProviderRef { uuid: uuid.into() },
            resources,
        }
    }
}

/// Ordered sequence of per-provider allocations. Order is not
/// semantically significant but is kept stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AllocationRequest {
    pub allocations: Vec<ProviderAllocation>,
}

impl AllocationRequest {
    pub fn new(allocations: Vec<ProviderAllocation>) -> Self {
        Self { allocations }
    }

    /// The entry for a given provider, if present.
    pub fn provider(&self, uuid: &str) -> Option<&ProviderAllocation> {
        self.allocations
            .iter()
            .find(|a| a.resource_provider.uuid == uuid)
    }
}

/// Copy of `resources` with zero-valued classes dropped.
pub fn normalized(resources: &Resources) -> Resources {
    resources
        .iter()
        .filter(|&(_, &quantity)| quantity != 0)
        .map(|(class, &quantity)| (class.clone(), quantity))
        .collect()
}

/// Semantic equality: two allocation sets are equal iff their
/// provider → class → quantity mappings match after dropping
/// zero-valued entries. Entry order never matters.
pub fn allocations_equal(a: &AllocationRequest, b: &AllocationRequest) -> bool {
    let to_map = |req: &AllocationRequest| -> BTreeMap<String, Resources> {
        req.allocations
            .iter()
            .map(|alloc| {
                (
                    alloc.resource_provider.uuid.clone(),
                    normalized(&alloc.resources),
                )
            })
            .collect()
    };
    to_map(a) == to_map(b)
}
