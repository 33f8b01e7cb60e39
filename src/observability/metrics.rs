//! Metrics collection.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by outcome
//! - `router_routes_registered_total` (counter): stored routes by kind
//! - `router_compiled_routes` (gauge): entries in the finalized table by kind
//! - `router_cache_loads_total` (counter): cache lookups by result
//!   (hit, miss, stale, malformed)
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; exporting is the host's concern
//! - Labels are static strings only

use metrics::{counter, gauge};

/// Record one dispatch outcome.
pub fn record_dispatch(outcome: &'static str) {
    counter!("router_dispatch_total", "outcome" => outcome).increment(1);
}

/// Record a route stored by the compiler.
pub fn record_route_registered(kind: &'static str) {
    counter!("router_routes_registered_total", "kind" => kind).increment(1);
}

/// Record the size of a freshly finalized table.
pub fn record_compiled_routes(static_count: usize, dynamic_count: usize) {
    gauge!("router_compiled_routes", "kind" => "static").set(static_count as f64);
    gauge!("router_compiled_routes", "kind" => "dynamic").set(dynamic_count as f64);
}

/// Record the result of a cache lookup.
pub fn record_cache_load(result: &'static str) {
    counter!("router_cache_loads_total", "result" => result).increment(1);
}
