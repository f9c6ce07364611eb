//! Shared utilities for integration testing.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use route_dispatch::registry::endpoint::{Endpoint, RouteValues};

/// Build an endpoint with string route values in declaration order.
#[allow(dead_code)]
pub fn endpoint(name: &str, values: &[(&str, &str)]) -> Endpoint {
    let mut route_values = RouteValues::new();
    for (attribute, value) in values {
        route_values.set(*attribute, *value);
    }
    Endpoint::new(name, route_values)
}

/// Build a route-value query in declaration order.
pub fn query(values: &[(&str, &str)]) -> RouteValues {
    let mut route_values = RouteValues::new();
    for (attribute, value) in values {
        route_values.set(*attribute, *value);
    }
    route_values
}

/// Unique path for a throwaway config file.
#[allow(dead_code)]
pub fn temp_config_path() -> PathBuf {
    std::env::temp_dir().join(format!("dispatch-test-{}.toml", uuid::Uuid::new_v4()))
}

/// Poll `predicate` until it holds or `timeout` elapses.
#[allow(dead_code)]
pub async fn wait_until<F>(predicate: F, timeout: Duration) -> bool
where
    F: Fn() -> bool,
{
    let started = Instant::now();
    while started.elapsed() < timeout {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    predicate()
}
