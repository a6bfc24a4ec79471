//! The move-operation allocation merge.
//!
//! When a workload moves between hosts, the tracker needs a single
//! request that reflects consumption on both hosts during the
//! transition window. When it resizes in place, source and destination
//! are the same provider and the two sides are summed instead.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{AllocationError, AllocationResult};
use crate::types::{AllocationRequest, ProviderAllocation, Resources, SourceAllocations};

/// Direction for [`merge_resources`].
///
/// The move path only adds; subtraction exists so the same primitive
/// can later decrement source allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSign {
    Add,
    Subtract,
}

/// Merge `new` into `original`, adding or subtracting per resource
/// class. A class whose merged quantity is zero is removed rather
/// than emitted as an explicit `0`; subtracting below zero is a
/// contract violation, never clamped.
pub fn merge_resources(
    original: &mut Resources,
    new: &Resources,
    sign: MergeSign,
) -> AllocationResult<()> {
    let classes: BTreeSet<String> = original.keys().chain(new.keys()).cloned().collect();
    for class in classes {
        let have = original.get(&class).copied().unwrap_or(0);
        let delta = new.get(&class).copied().unwrap_or(0);
        let value = match sign {
            MergeSign::Add => {
                have.checked_add(delta)
                    .ok_or_else(|| AllocationError::QuantityOverflow {
                        class: class.clone(),
                        have,
                        add: delta,
                    })?
            }
            MergeSign::Subtract => {
                have.checked_sub(delta)
                    .ok_or_else(|| AllocationError::NegativeQuantity {
                        class: class.clone(),
                        have,
                        subtract: delta,
                    })?
            }
        };
        if value == 0 {
            original.remove(&class);
        } else {
            original.insert(class, value);
        }
    }
    Ok(())
}

/// Build the single allocation request covering a move from the host
/// holding `source_allocs` to the host targeted by `dest_alloc_req`.
///
/// Providers that are genuinely new to the move (typically the
/// destination compute node) are appended as-is: both hosts hold
/// resources simultaneously during the transition. Providers the
/// source already allocates against, like shared storage, are carried
/// from the source unchanged. When the destination introduces no new
/// provider at all, the move is a resize in place and destination
/// quantities are summed into the matching source entries — summed,
/// not maxed, because the tracker adjusts for decrementing old
/// allocations itself.
///
/// A destination provider that overlaps a source provider while other
/// new providers exist is deliberately left unmerged: the tracker
/// reconciles exactly the two scenarios above, and a fuzzy
/// partial-overlap merge has no defined meaning.
pub fn move_operation_request(
    source_allocs: &SourceAllocations,
    dest_alloc_req: &AllocationRequest,
) -> AllocationResult<AllocationRequest> {
    debug!("doubling up allocation request for move operation");

    for (uuid, resources) in source_allocs {
        if resources.is_empty() {
            return Err(AllocationError::EmptyResources {
                provider: uuid.clone(),
            });
        }
    }
    for entry in &dest_alloc_req.allocations {
        if entry.resources.is_empty() {
            return Err(AllocationError::EmptyResources {
                provider: entry.resource_provider.uuid.clone(),
            });
        }
    }

    let cur_rp_uuids: BTreeSet<&str> = source_allocs.keys().map(String::as_str).collect();
    let new_rp_uuids: BTreeSet<&str> = dest_alloc_req
        .allocations
        .iter()
        .map(|a| a.resource_provider.uuid.as_str())
        .filter(|uuid| !cur_rp_uuids.contains(uuid))
        .collect();

    // Seed with the source side, carried unchanged.
    let mut merged: Vec<ProviderAllocation> = source_allocs
        .iter()
        .map(|(uuid, resources)| ProviderAllocation::new(uuid.clone(), resources.clone()))
        .collect();

    for alloc in &dest_alloc_req.allocations {
        let uuid = alloc.resource_provider.uuid.as_str();
        if new_rp_uuids.contains(uuid) {
            merged.push(alloc.clone());
        } else if new_rp_uuids.is_empty() {
            // Resize to the same host: sum into the seeded entry.
            for current in &mut merged {
                if current.resource_provider.uuid == uuid {
                    merge_resources(&mut current.resources, &alloc.resources, MergeSign::Add)?;
                }
            }
        }
    }

    let request = AllocationRequest::new(merged);
    debug!(
        providers = request.allocations.len(),
        "merged move allocation request"
    );
    Ok(request)
}
