//! In-memory endpoint registry.
//!
//! # Responsibilities
//! - Hold the current endpoint set behind an atomic snapshot slot
//! - Produce a wholly new, higher-version snapshot per mutation
//! - Notify subscribers after each publish
//!
//! # Design Decisions
//! - Readers never lock: one `ArcSwap` load of an immutable snapshot
//! - A single writer mutex serializes read-modify-write mutations
//! - Publish order is store-then-notify, so a lookup issued after a change
//!   callback ran observes the new endpoint set

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::registry::change::{ChangeCallback, ChangeNotifier, SubscriptionHandle};
use crate::registry::endpoint::{Endpoint, SharedEndpoint};
use crate::registry::snapshot::RegistrySnapshot;
use crate::registry::{EndpointRegistry, RegistryError};

/// Mutable endpoint registry with lock-free snapshot reads.
#[derive(Debug)]
pub struct InMemoryRegistry {
    current: ArcSwap<RegistrySnapshot>,
    /// Serializes mutations; readers go through `current` only.
    write_lock: Mutex<()>,
    notifier: ChangeNotifier,
}

impl InMemoryRegistry {
    /// Create an empty registry at version 0.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(RegistrySnapshot::empty()),
            write_lock: Mutex::new(()),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Create a registry pre-populated with `endpoints` (version 1).
    pub fn with_endpoints(endpoints: Vec<Endpoint>) -> Self {
        let registry = Self::new();
        registry.replace_all(endpoints);
        registry
    }

    /// Atomically replace the entire endpoint set.
    pub fn replace_all(&self, endpoints: Vec<Endpoint>) {
        let endpoints: Vec<SharedEndpoint> = endpoints.into_iter().map(Arc::new).collect();
        let version = self.publish(endpoints);
        tracing::debug!(version, endpoints = self.len(), "Registry endpoint set replaced");
    }

    /// Add `endpoint`, or replace the endpoint with the same name in place.
    ///
    /// Replacing in place keeps the endpoint's position, so the relative
    /// order of unrelated endpoints is stable across reconfigurations.
    pub fn insert(&self, endpoint: Endpoint) {
        let endpoint = Arc::new(endpoint);
        let name = endpoint.name().to_string();
        let version = {
            let _guard = self.write_lock.lock().expect("registry writer mutex poisoned");
            let current = self.current.load();
            let mut endpoints: Vec<SharedEndpoint> = current.endpoints().to_vec();
            match endpoints.iter().position(|existing| existing.name() == endpoint.name()) {
                Some(index) => endpoints[index] = endpoint,
                None => endpoints.push(endpoint),
            }
            self.store(current.version() + 1, endpoints)
        };
        self.notifier.notify();
        tracing::debug!(version, endpoint = %name, "Registry endpoint inserted");
    }

    /// Remove the endpoint named `name`.
    ///
    /// Returns false, without a version bump or notification, when no such
    /// endpoint exists.
    pub fn remove(&self, name: &str) -> bool {
        let version = {
            let _guard = self.write_lock.lock().expect("registry writer mutex poisoned");
            let current = self.current.load();
            let mut endpoints: Vec<SharedEndpoint> = current.endpoints().to_vec();
            let Some(index) = endpoints.iter().position(|existing| existing.name() == name) else {
                return false;
            };
            endpoints.remove(index);
            self.store(current.version() + 1, endpoints)
        };
        self.notifier.notify();
        tracing::debug!(version, endpoint = %name, "Registry endpoint removed");
        true
    }

    /// Current endpoint count.
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    /// True when no endpoints are registered.
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Number of live change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    /// Take the writer lock, store the next snapshot, then notify.
    fn publish(&self, endpoints: Vec<SharedEndpoint>) -> u64 {
        let version = {
            let _guard = self.write_lock.lock().expect("registry writer mutex poisoned");
            let current = self.current.load();
            self.store(current.version() + 1, endpoints)
        };
        self.notifier.notify();
        version
    }

    /// Store a new snapshot. Caller must hold the writer lock.
    fn store(&self, version: u64, endpoints: Vec<SharedEndpoint>) -> u64 {
        metrics::record_registry_size(endpoints.len());
        self.current.store(Arc::new(RegistrySnapshot::new(version, endpoints)));
        version
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointRegistry for InMemoryRegistry {
    fn snapshot(&self) -> Result<RegistrySnapshot, RegistryError> {
        Ok(self.current.load().as_ref().clone())
    }

    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionHandle {
        self.notifier.subscribe(callback)
    }
}
