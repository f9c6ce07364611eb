//! Endpoint selection over the cached dispatch table.
//!
//! # Responsibilities
//! - Keep a [`DispatchTable`] current via a [`VersionedCache`]
//! - Resolve route-value queries to owned endpoint lists
//! - Record lookup outcomes for observability

use std::sync::Arc;

use crate::dispatch::cache::{BuildFn, VersionedCache};
use crate::dispatch::table::{DispatchTable, MatchKind};
use crate::dispatch::DispatchError;
use crate::observability::metrics;
use crate::registry::endpoint::{RouteValues, SharedEndpoint};
use crate::registry::EndpointRegistry;

/// Resolves route values to endpoints, rebuilding its table when the
/// registry changes.
#[derive(Debug)]
pub struct EndpointSelector {
    cache: VersionedCache<DispatchTable>,
}

impl EndpointSelector {
    /// Create a selector over `registry`.
    pub fn new(registry: Arc<dyn EndpointRegistry>) -> Self {
        let build: BuildFn<DispatchTable> =
            Box::new(|snapshot| Ok(DispatchTable::build(snapshot)));
        Self {
            cache: VersionedCache::new(registry, build),
        }
    }

    /// Resolve `values` to the matching endpoints.
    ///
    /// Exact tuple matches win; otherwise the case-folded index is
    /// consulted. No match yields an empty vec, not an error. Errors only
    /// surface when the table itself cannot be (re)built.
    pub fn select(&self, values: &RouteValues) -> Result<Vec<SharedEndpoint>, DispatchError> {
        let table = self.cache.ensure_current()?;
        let result = table.lookup(values);
        metrics::record_lookup(result.kind.as_label());
        if result.kind == MatchKind::Miss {
            tracing::trace!(values = ?values, "No endpoint matched route values");
        }
        Ok(result.endpoints.to_vec())
    }

    /// Current table, rebuilding it first if needed.
    pub fn table(&self) -> Result<Arc<DispatchTable>, DispatchError> {
        self.cache.ensure_current()
    }

    /// Release the table and the registry subscription.
    pub fn dispose(&self) {
        self.cache.dispose();
    }
}
