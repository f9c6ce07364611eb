//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatch
//! service. All types derive Serde traits for deserialization from config
//! files. Declaration order matters: endpoints enter the registry in file
//! order, and their attribute names fix the canonical key order.

use serde::{Deserialize, Serialize};

use crate::registry::endpoint::{Endpoint, RouteValues};

/// Root configuration for the dispatch service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Endpoint declarations, in file order.
    pub endpoints: Vec<EndpointConfig>,

    /// Hot-reload settings for the config file itself.
    pub watch: WatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl DispatchConfig {
    /// Materialize the declared endpoints, keeping file order.
    pub fn to_endpoints(&self) -> Vec<Endpoint> {
        self.endpoints
            .iter()
            .cloned()
            .map(EndpointConfig::into_endpoint)
            .collect()
    }
}

/// One endpoint declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Unique endpoint identifier for logging and lookups by name.
    pub name: String,

    /// Route values this endpoint is published under, in declaration order.
    #[serde(default)]
    pub route_values: RouteValues,
}

impl EndpointConfig {
    /// Convert into a registry endpoint.
    pub fn into_endpoint(self) -> Endpoint {
        Endpoint::new(self.name, self.route_values)
    }
}

/// Config file watch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Enable hot reload of the endpoint file.
    pub enabled: bool,

    /// Watcher poll interval in seconds.
    pub poll_interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 2,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: DispatchConfig = toml::from_str("").unwrap();
        assert!(config.endpoints.is_empty());
        assert!(config.watch.enabled);
        assert_eq!(config.watch.poll_interval_secs, 2);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_endpoints_keep_file_order() {
        let config: DispatchConfig = toml::from_str(
            r#"
            [[endpoints]]
            name = "orders"
            [endpoints.route_values]
            controller = "Orders"
            action = "List"

            [[endpoints]]
            name = "home"
            [endpoints.route_values]
            action = "Index"
            controller = "Home"
            "#,
        )
        .unwrap();

        let endpoints = config.to_endpoints();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].name(), "orders");
        assert_eq!(endpoints[1].name(), "home");

        // The second endpoint declared action before controller; that order
        // survives deserialization.
        let names: Vec<&str> = endpoints[1].route_values().iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["action", "controller"]);
    }

    #[test]
    fn test_endpoint_without_route_values_is_allowed() {
        let config: DispatchConfig = toml::from_str(
            r#"
            [[endpoints]]
            name = "fallback"
            "#,
        )
        .unwrap();
        assert!(config.endpoints[0].route_values.is_empty());
    }
}
