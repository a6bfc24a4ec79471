//! Workload request types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlacementError;

/// Unit suffix of a requested memory quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryUnit {
    /// `M` suffix.
    Mebibytes,
    /// `G` suffix.
    Gibibytes,
}

/// A requested memory amount with an explicit unit.
///
/// Parsed from the `"512M"` request convention once, at the boundary.
/// Everything past the boundary compares in MiB via
/// [`MemoryQuantity::to_mib`], the same unit node memory is tracked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryQuantity {
    pub amount: u64,
    pub unit: MemoryUnit,
}

impl MemoryQuantity {
    pub const fn mib(amount: u64) -> Self {
        Self {
            amount,
            unit: MemoryUnit::Mebibytes,
        }
    }

    pub fn to_mib(self) -> u64 {
        match self.unit {
            MemoryUnit::Mebibytes => self.amount,
            MemoryUnit::Gibibytes => self.amount * 1024,
        }
    }
}

impl FromStr for MemoryQuantity {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (value, unit) = if let Some(v) = trimmed.strip_suffix('M') {
            (v, MemoryUnit::Mebibytes)
        } else if let Some(v) = trimmed.strip_suffix('G') {
            (v, MemoryUnit::Gibibytes)
        } else {
            return Err(PlacementError::InvalidMemoryQuantity(s.to_string()));
        };
        let amount = value
            .parse::<u64>()
            .map_err(|_| PlacementError::InvalidMemoryQuantity(s.to_string()))?;
        Ok(Self { amount, unit })
    }
}

impl fmt::Display for MemoryQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.unit {
            MemoryUnit::Mebibytes => 'M',
            MemoryUnit::Gibibytes => 'G',
        };
        write!(f, "{}{}", self.amount, suffix)
    }
}

/// How the workload consumes CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CpuPolicy {
    /// Floats across any NUMA node; no pinning.
    #[default]
    Shared,
    /// Requires exclusively pinned CPUs from a single NUMA node.
    Dedicated,
}

/// Read-only workload request, the input to every filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub cpu_policy: CpuPolicy,
    /// Requested CPU count; only meaningful under `Dedicated`.
    pub cpu: u32,
    pub memory: MemoryQuantity,
    /// Optional hostname constraint, independent of NUMA placement.
    pub host: Option<String>,
}
