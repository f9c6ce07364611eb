//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check endpoint names are present and unique
//! - Validate value ranges (poll interval > 0, metrics address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatchConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::DispatchConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate `config`, collecting every error rather than stopping at the
/// first.
pub fn validate_config(config: &DispatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_names: HashSet<&str> = HashSet::new();
    for (index, endpoint) in config.endpoints.iter().enumerate() {
        let field = format!("endpoints[{}]", index);
        if endpoint.name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{}.name", field),
                "endpoint name must not be empty",
            ));
        } else if !seen_names.insert(endpoint.name.as_str()) {
            errors.push(ValidationError::new(
                format!("{}.name", field),
                format!("duplicate endpoint name '{}'", endpoint.name),
            ));
        }
        for (attribute, _) in endpoint.route_values.iter() {
            if attribute.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("{}.route_values", field),
                    "attribute names must not be empty",
                ));
            }
        }
    }

    if config.watch.enabled && config.watch.poll_interval_secs == 0 {
        errors.push(ValidationError::new(
            "watch.poll_interval_secs",
            "poll interval must be at least 1 second",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EndpointConfig;
    use crate::registry::endpoint::RouteValues;

    fn config_with_endpoints(names: &[&str]) -> DispatchConfig {
        DispatchConfig {
            endpoints: names
                .iter()
                .map(|name| EndpointConfig {
                    name: name.to_string(),
                    route_values: RouteValues::new(),
                })
                .collect(),
            ..DispatchConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DispatchConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_endpoint_names_rejected() {
        let config = config_with_endpoints(&["home", "orders", "home"]);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "endpoints[2].name");
        assert!(errors[0].message.contains("duplicate"));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut config = config_with_endpoints(&["", "ok"]);
        config.watch.poll_interval_secs = 0;
        config.observability.metrics_address = "not-an-address".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "endpoints[0].name",
                "watch.poll_interval_secs",
                "observability.metrics_address"
            ]
        );
    }

    #[test]
    fn test_empty_attribute_name_rejected() {
        let mut config = config_with_endpoints(&["home"]);
        config.endpoints[0].route_values = RouteValues::new().with("", "Home");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "endpoints[0].route_values");
    }

    #[test]
    fn test_disabled_metrics_skip_address_check() {
        let mut config = DispatchConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "nonsense".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
