//! Route-value dispatch table.
//!
//! # Responsibilities
//! - Derive the canonical attribute-key order from an endpoint snapshot
//! - Index every endpoint under its exact and case-folded component tuples
//! - Resolve queries: exact tuple first, folded tuple as fallback
//!
//! # Design Decisions
//! - Canonical key order is the first-seen order of distinct attribute names
//!   across the snapshot, so the same snapshot always yields the same table
//! - A missing attribute contributes an empty component, making every key
//!   tuple the same length
//! - Case folding uses Unicode uppercasing, not ASCII-only, so non-ASCII
//!   values fold the same way at build time and query time
//! - Built once per snapshot and never mutated; lookups borrow from the table

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::observability::metrics;
use crate::registry::endpoint::{RouteValues, SharedEndpoint};
use crate::registry::snapshot::RegistrySnapshot;

/// How a lookup arrived at its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The query tuple matched byte-for-byte.
    Exact,
    /// The query tuple matched only after case folding.
    CaseInsensitive,
    /// No endpoint matched.
    Miss,
}

impl MatchKind {
    /// Stable label for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::CaseInsensitive => "folded",
            Self::Miss => "none",
        }
    }
}

/// Outcome of [`DispatchTable::lookup`], borrowing the matched endpoints.
#[derive(Debug)]
pub struct LookupResult<'t> {
    pub kind: MatchKind,
    pub endpoints: &'t [SharedEndpoint],
}

/// Immutable two-level index from route-value tuples to endpoints.
#[derive(Debug)]
pub struct DispatchTable {
    /// Version of the snapshot this table was built from.
    version: u64,
    /// Distinct attribute names in first-seen order.
    canonical_keys: Vec<String>,
    exact: HashMap<Vec<String>, Vec<SharedEndpoint>>,
    folded: HashMap<Vec<String>, Vec<SharedEndpoint>>,
    endpoint_count: usize,
}

impl DispatchTable {
    /// Build a table from `snapshot`.
    ///
    /// Two linear passes: the first fixes the canonical key order, the
    /// second indexes each endpoint under its exact and folded tuples.
    /// Endpoints sharing a tuple keep their snapshot order inside the
    /// bucket.
    pub fn build(snapshot: &RegistrySnapshot) -> Self {
        let started = Instant::now();

        // Pass 1: first-seen distinct attribute names define the key order.
        let mut seen: HashSet<&str> = HashSet::new();
        let mut canonical_keys: Vec<String> = Vec::new();
        for endpoint in snapshot.endpoints() {
            for (name, _) in endpoint.route_values().iter() {
                if seen.insert(name) {
                    canonical_keys.push(name.to_string());
                }
            }
        }

        // Pass 2: index every endpoint under both tuple forms.
        let mut exact: HashMap<Vec<String>, Vec<SharedEndpoint>> = HashMap::new();
        let mut folded: HashMap<Vec<String>, Vec<SharedEndpoint>> = HashMap::new();
        for endpoint in snapshot.endpoints() {
            let key: Vec<String> = canonical_keys
                .iter()
                .map(|name| endpoint.route_values().component(name).into_owned())
                .collect();
            let folded_key: Vec<String> = key.iter().map(|component| fold(component)).collect();
            exact.entry(key).or_default().push(endpoint.clone());
            folded.entry(folded_key).or_default().push(endpoint.clone());
        }

        let table = Self {
            version: snapshot.version(),
            canonical_keys,
            exact,
            folded,
            endpoint_count: snapshot.len(),
        };
        metrics::record_rebuild(table.endpoint_count, table.canonical_keys.len(), started);
        tracing::debug!(
            version = table.version,
            endpoints = table.endpoint_count,
            keys = table.canonical_keys.len(),
            elapsed = ?started.elapsed(),
            "Dispatch table built"
        );
        table
    }

    /// Resolve `values` to the endpoints registered under its tuple.
    ///
    /// Values whose names are not canonical keys are ignored; canonical
    /// keys absent from `values` contribute empty components. A miss
    /// returns an empty slice, never an error.
    pub fn lookup(&self, values: &RouteValues) -> LookupResult<'_> {
        let key: Vec<String> = self
            .canonical_keys
            .iter()
            .map(|name| values.component(name).into_owned())
            .collect();
        if let Some(endpoints) = self.exact.get(&key) {
            return LookupResult {
                kind: MatchKind::Exact,
                endpoints,
            };
        }
        let folded_key: Vec<String> = key.iter().map(|component| fold(component)).collect();
        if let Some(endpoints) = self.folded.get(&folded_key) {
            return LookupResult {
                kind: MatchKind::CaseInsensitive,
                endpoints,
            };
        }
        LookupResult {
            kind: MatchKind::Miss,
            endpoints: &[],
        }
    }

    /// Version of the snapshot this table was built from.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Attribute names in canonical order.
    pub fn canonical_keys(&self) -> &[String] {
        &self.canonical_keys
    }

    /// Number of endpoints indexed.
    pub fn endpoint_count(&self) -> usize {
        self.endpoint_count
    }

    /// Iterate the exact tuples and their endpoint buckets.
    pub fn exact_buckets(&self) -> impl Iterator<Item = (&[String], &[SharedEndpoint])> {
        self.exact
            .iter()
            .map(|(key, endpoints)| (key.as_slice(), endpoints.as_slice()))
    }
}

/// Shared case fold for build and query time.
///
/// Unicode uppercasing is locale-independent; folding both sides the same
/// way is what makes the fallback index coherent.
fn fold(component: &str) -> String {
    component.to_uppercase()
}
