//! numapack-report — resource-provider reporting for the external
//! resource tracker.
//!
//! Translates topology snapshots into the tracker's payload shape and
//! submits them, along with merged move allocations, over HTTP.
//! Everything here is best-effort telemetry around scheduling, never a
//! precondition: failures are logged (rate-limited for connectivity)
//! and surfaced as booleans, and a scheduling decision already made is
//! never rolled back by a reporting failure.

pub mod client;
pub mod limiter;
pub mod payload;

pub use client::ReportClient;
pub use limiter::WarnLimiter;
pub use payload::{NumaNodeReport, TopologyReport, topology_report};
