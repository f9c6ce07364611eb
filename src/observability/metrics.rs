//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define dispatch metrics (rebuilds, lookups, table size)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `dispatch_rebuilds_total` (counter): dispatch table rebuilds
//! - `dispatch_rebuild_duration_seconds` (histogram): rebuild latency
//! - `dispatch_table_endpoints` (gauge): endpoints in the current table
//! - `dispatch_table_keys` (gauge): canonical keys in the current table
//! - `dispatch_lookups_total` (counter): lookups by result (exact, folded, none)
//! - `registry_endpoints` (gauge): endpoints in the registry
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Recorders are free functions so call sites stay one line
//! - Recording is a no-op until an exporter is installed, so library use
//!   and tests need no setup

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Failure to bind is logged, not fatal; the process keeps running without
/// an exporter.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!("Failed to start metrics endpoint: {}", e),
    }
}

/// Record one dispatch table rebuild.
pub fn record_rebuild(endpoints: usize, keys: usize, started: Instant) {
    counter!("dispatch_rebuilds_total").increment(1);
    histogram!("dispatch_rebuild_duration_seconds").record(started.elapsed().as_secs_f64());
    gauge!("dispatch_table_endpoints").set(endpoints as f64);
    gauge!("dispatch_table_keys").set(keys as f64);
}

/// Record one lookup and how it matched.
pub fn record_lookup(result: &'static str) {
    counter!("dispatch_lookups_total", "result" => result).increment(1);
}

/// Record the registry size after a mutation.
pub fn record_registry_size(count: usize) {
    gauge!("registry_endpoints").set(count as f64);
}
