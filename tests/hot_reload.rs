//! Hot reload tests: config file changes flowing into live lookups.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use route_dispatch::config::watcher::run_update_loop;
use route_dispatch::config::{load_config, ConfigWatcher};
use route_dispatch::registry::EndpointRegistry;
use route_dispatch::{EndpointSelector, InMemoryRegistry, Shutdown};

mod common;

use common::{query, temp_config_path, wait_until};

const V1: &str = r#"
[[endpoints]]
name = "home"
[endpoints.route_values]
controller = "Home"
action = "Index"
"#;

const V2: &str = r#"
[[endpoints]]
name = "orders"
[endpoints.route_values]
controller = "Orders"
action = "List"
"#;

#[tokio::test]
async fn test_file_change_flows_into_lookups() {
    let path = temp_config_path();
    fs::write(&path, V1).unwrap();

    let config = load_config(&path).unwrap();
    let registry = Arc::new(InMemoryRegistry::with_endpoints(config.to_endpoints()));
    let selector = EndpointSelector::new(registry.clone() as Arc<dyn EndpointRegistry>);

    let (watcher, updates) = ConfigWatcher::new(&path);
    let _watcher = watcher.run(Duration::from_millis(200)).unwrap();
    let shutdown = Shutdown::new();
    let loop_handle = tokio::spawn(run_update_loop(
        registry.clone(),
        updates,
        shutdown.subscribe(),
    ));

    let matched = selector
        .select(&query(&[("controller", "Home"), ("action", "Index")]))
        .unwrap();
    assert_eq!(matched[0].name(), "home");

    fs::write(&path, V2).unwrap();

    let reloaded = wait_until(
        || {
            selector
                .select(&query(&[("controller", "Orders"), ("action", "List")]))
                .map(|matched| !matched.is_empty())
                .unwrap_or(false)
        },
        Duration::from_secs(10),
    )
    .await;
    assert!(reloaded, "Rewritten config should reach lookups via reload");

    let stale = selector
        .select(&query(&[("controller", "Home"), ("action", "Index")]))
        .unwrap();
    assert!(stale.is_empty(), "Replaced endpoint set should drop old endpoints");

    shutdown.trigger();
    loop_handle.await.unwrap();
    fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_invalid_reload_keeps_current_endpoints() {
    let path = temp_config_path();
    fs::write(&path, V1).unwrap();

    let config = load_config(&path).unwrap();
    let registry = Arc::new(InMemoryRegistry::with_endpoints(config.to_endpoints()));
    let selector = EndpointSelector::new(registry.clone() as Arc<dyn EndpointRegistry>);

    let (watcher, updates) = ConfigWatcher::new(&path);
    let _watcher = watcher.run(Duration::from_millis(200)).unwrap();
    let shutdown = Shutdown::new();
    let loop_handle = tokio::spawn(run_update_loop(
        registry.clone(),
        updates,
        shutdown.subscribe(),
    ));

    fs::write(&path, "endpoints = definitely not toml").unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let matched = selector
        .select(&query(&[("controller", "Home"), ("action", "Index")]))
        .unwrap();
    assert_eq!(
        matched.len(),
        1,
        "A reload that fails to parse must leave the endpoint set untouched"
    );

    fs::write(&path, V2).unwrap();
    let recovered = wait_until(
        || {
            selector
                .select(&query(&[("controller", "Orders"), ("action", "List")]))
                .map(|matched| !matched.is_empty())
                .unwrap_or(false)
        },
        Duration::from_secs(10),
    )
    .await;
    assert!(recovered, "A later valid config should still be applied");

    shutdown.trigger();
    loop_handle.await.unwrap();
    fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_update_loop_stops_on_shutdown() {
    let registry = Arc::new(InMemoryRegistry::new());
    let (_tx, updates) = tokio::sync::mpsc::unbounded_channel();
    let shutdown = Shutdown::new();

    let loop_handle = tokio::spawn(run_update_loop(
        registry.clone(),
        updates,
        shutdown.subscribe(),
    ));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), loop_handle)
        .await
        .expect("Update loop should stop promptly after shutdown")
        .unwrap();
}
