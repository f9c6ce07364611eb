//! Lazily rebuilt, atomically published value cache.
//!
//! # Responsibilities
//! - Build the cached value on first use, from a registry snapshot
//! - Invalidate on registry change notifications
//! - Publish rebuilt values atomically so readers never see a partial value
//!
//! # Design Decisions
//! - Invalidation only bumps a counter; the rebuild happens on the next
//!   read, so notification callbacks stay cheap
//! - Concurrent readers may race to rebuild; builds are pure functions of
//!   a snapshot, so racing is wasted work, never wrong results
//! - Publication keeps the entry built against the newest signal, so a slow
//!   stale build cannot clobber a fresher one
//! - Disposal is explicit and idempotent; the drop guard makes leaking the
//!   change subscription impossible

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;

use crate::dispatch::DispatchError;
use crate::registry::change::SubscriptionHandle;
use crate::registry::snapshot::RegistrySnapshot;
use crate::registry::EndpointRegistry;

/// Builds a cache value from a registry snapshot.
pub type BuildFn<T> = Box<dyn Fn(&RegistrySnapshot) -> Result<T, DispatchError> + Send + Sync>;

/// One published value, tagged with the invalidation signal it covers.
struct CacheEntry<T> {
    signal: u64,
    value: Arc<T>,
}

/// Registry-backed cache that rebuilds `T` when the endpoint set changes.
pub struct VersionedCache<T> {
    registry: Arc<dyn EndpointRegistry>,
    build: BuildFn<T>,
    current: ArcSwapOption<CacheEntry<T>>,
    /// Bumped by the change callback; an entry is current while its
    /// signal is at least this value.
    pending: Arc<AtomicU64>,
    subscription: Mutex<Option<SubscriptionHandle>>,
    disposed: AtomicBool,
}

impl<T> VersionedCache<T> {
    /// Create a cache over `registry`. No value is built until the first
    /// [`ensure_current`](Self::ensure_current) call.
    pub fn new(registry: Arc<dyn EndpointRegistry>, build: BuildFn<T>) -> Self {
        let pending = Arc::new(AtomicU64::new(0));
        let subscription = registry.subscribe({
            let pending = pending.clone();
            Arc::new(move || {
                pending.fetch_add(1, Ordering::AcqRel);
            })
        });
        Self {
            registry,
            build,
            current: ArcSwapOption::empty(),
            pending,
            subscription: Mutex::new(Some(subscription)),
            disposed: AtomicBool::new(false),
        }
    }

    /// Return the cached value, rebuilding it first if a change was
    /// signalled since it was built.
    ///
    /// Build failures propagate to the caller and leave any previously
    /// published value in place; subsequent calls retry the build.
    pub fn ensure_current(&self) -> Result<Arc<T>, DispatchError> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(DispatchError::Disposed);
        }
        let signal = self.pending.load(Ordering::Acquire);
        if let Some(entry) = self.current.load_full() {
            if entry.signal >= signal {
                return Ok(entry.value.clone());
            }
        }
        self.rebuild(signal)
    }

    /// Build from a fresh snapshot and publish unless a newer entry landed
    /// in the meantime.
    fn rebuild(&self, signal: u64) -> Result<Arc<T>, DispatchError> {
        let snapshot = self.registry.snapshot()?;
        let value = Arc::new((self.build)(&snapshot)?);
        let fresh = Arc::new(CacheEntry {
            signal,
            value: value.clone(),
        });
        self.current.rcu(|current| match current {
            Some(entry) if entry.signal >= signal => Some(Arc::clone(entry)),
            _ => Some(Arc::clone(&fresh)),
        });
        tracing::trace!(
            signal,
            snapshot_version = snapshot.version(),
            "Cache value rebuilt"
        );
        Ok(value)
    }

    /// Drop the change subscription and the published value.
    ///
    /// Idempotent. After disposal every
    /// [`ensure_current`](Self::ensure_current) call fails with
    /// [`DispatchError::Disposed`].
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        drop(
            self.subscription
                .lock()
                .expect("cache subscription mutex poisoned")
                .take(),
        );
        self.current.store(None);
        tracing::debug!("Versioned cache disposed");
    }

    /// True once [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl<T> Drop for VersionedCache<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T> std::fmt::Debug for VersionedCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedCache")
            .field("pending", &self.pending.load(Ordering::Relaxed))
            .field("disposed", &self.disposed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
