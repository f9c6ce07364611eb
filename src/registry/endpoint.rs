//! Endpoint data model.
//!
//! # Responsibilities
//! - Represent a dispatch destination and its named route attributes
//! - Provide uniform, pure attribute access by name
//! - Render attribute values as deterministic lookup-key components
//!
//! # Design Decisions
//! - Endpoints are plain data records; no trait objects, no inheritance
//! - Identity is `Arc` handle identity, so structural equality is not derived
//! - Attribute order is insertion order, which keeps the canonical key order
//!   of a table build reproducible for a given endpoint set

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single route attribute value.
///
/// Values are text, integer or boolean scalars. Scalars render with their
/// Rust `Display` forms, which do not vary with the process locale, so the
/// same value always produces the same lookup-key component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteValue {
    /// Literal text.
    Text(String),
    /// Integer scalar.
    Int(i64),
    /// Boolean scalar.
    Bool(bool),
    /// Explicitly absent value; keys as the empty string.
    Empty,
}

impl RouteValue {
    /// Render the value as a lookup-key component.
    pub fn as_component(&self) -> Cow<'_, str> {
        match self {
            RouteValue::Text(text) => Cow::Borrowed(text.as_str()),
            RouteValue::Int(value) => Cow::Owned(value.to_string()),
            RouteValue::Bool(true) => Cow::Borrowed("true"),
            RouteValue::Bool(false) => Cow::Borrowed("false"),
            RouteValue::Empty => Cow::Borrowed(""),
        }
    }
}

impl fmt::Display for RouteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_component())
    }
}

impl From<&str> for RouteValue {
    fn from(value: &str) -> Self {
        RouteValue::Text(value.to_string())
    }
}

impl From<String> for RouteValue {
    fn from(value: String) -> Self {
        RouteValue::Text(value)
    }
}

impl From<i64> for RouteValue {
    fn from(value: i64) -> Self {
        RouteValue::Int(value)
    }
}

impl From<bool> for RouteValue {
    fn from(value: bool) -> Self {
        RouteValue::Bool(value)
    }
}

/// An insertion-ordered map of route attribute names to values.
///
/// Used both for the attributes an endpoint declares and for the value bag a
/// lookup supplies. Iteration yields names in first-insertion order;
/// re-inserting a name overwrites its value but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteValues {
    entries: IndexMap<String, RouteValue>,
}

impl RouteValues {
    /// Create an empty value bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for literals and tests.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RouteValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or overwrite the value for `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<RouteValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&RouteValue> {
        self.entries.get(name)
    }

    /// Lookup-key component for `name`.
    ///
    /// Missing names key as the empty string, consistent with how tables are
    /// built from endpoints that do not declare an attribute.
    pub fn component(&self, name: &str) -> Cow<'_, str> {
        match self.entries.get(name) {
            Some(value) => value.as_component(),
            None => Cow::Borrowed(""),
        }
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for RouteValues
where
    N: Into<String>,
    V: Into<RouteValue>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut values = RouteValues::new();
        for (name, value) in iter {
            values.set(name, value);
        }
        values
    }
}

/// A dispatch destination.
///
/// Opaque to the dispatch layer except for its route attributes. Immutable
/// once published into a registry snapshot; two endpoints are "the same"
/// only when they are the same `Arc` handle.
#[derive(Debug, Clone, Serialize)]
pub struct Endpoint {
    /// Display name used in logs and CLI output.
    name: String,
    /// Declared route attributes.
    route_values: RouteValues,
}

impl Endpoint {
    /// Create an endpoint with the given attributes.
    pub fn new(name: impl Into<String>, route_values: RouteValues) -> Self {
        Self {
            name: name.into(),
            route_values,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared route attributes.
    pub fn route_values(&self) -> &RouteValues {
        &self.route_values
    }

    /// Attribute value for `name`, if declared.
    pub fn value(&self, name: &str) -> Option<&RouteValue> {
        self.route_values.get(name)
    }
}

/// Shared handle to an endpoint. Snapshots and table buckets share these.
pub type SharedEndpoint = Arc<Endpoint>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_rendering() {
        assert_eq!(RouteValue::from("Home").as_component(), "Home");
        assert_eq!(RouteValue::from(42).as_component(), "42");
        assert_eq!(RouteValue::from(-7).as_component(), "-7");
        assert_eq!(RouteValue::from(true).as_component(), "true");
        assert_eq!(RouteValue::from(false).as_component(), "false");
        assert_eq!(RouteValue::Empty.as_component(), "");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let values = RouteValues::new()
            .with("area", "")
            .with("controller", "Home")
            .with("action", "Index");

        let names: Vec<&str> = values.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["area", "controller", "action"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut values = RouteValues::new().with("controller", "Home").with("action", "Index");
        values.set("controller", "Admin");

        let entries: Vec<(&str, String)> = values
            .iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        assert_eq!(
            entries,
            vec![("controller", "Admin".to_string()), ("action", "Index".to_string())]
        );
    }

    #[test]
    fn test_missing_component_is_empty() {
        let values = RouteValues::new().with("controller", "Home");
        assert_eq!(values.component("controller"), "Home");
        assert_eq!(values.component("area"), "");
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let values: RouteValues =
            toml::from_str("controller = \"Home\"\naction = \"Index\"\nid = 7\n").unwrap();
        let names: Vec<&str> = values.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["controller", "action", "id"]);
        assert_eq!(values.get("id"), Some(&RouteValue::Int(7)));
    }
}
