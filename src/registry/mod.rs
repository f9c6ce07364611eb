//! Endpoint registry subsystem.
//!
//! # Data Flow
//! ```text
//! Mutation (replace_all / insert / remove):
//!     writer lock → new RegistrySnapshot (version + 1)
//!     → atomic store → release lock → notify subscribers
//!
//! Read path:
//!     snapshot() → one atomic load, no locks
//!
//! Subscription:
//!     subscribe(callback) → SubscriptionHandle
//!     handle dropped → callback removed
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable; consumers index any version safely while
//!   mutations continue
//! - Callbacks run after the new snapshot is stored, so subscribers that
//!   re-read the registry from the callback see the change
//! - Subscriptions are RAII handles; forgetting to unsubscribe is not
//!   possible

pub mod change;
pub mod endpoint;
pub mod memory;
pub mod snapshot;

pub use change::ChangeCallback;
pub use change::SubscriptionHandle;
pub use endpoint::Endpoint;
pub use endpoint::RouteValue;
pub use endpoint::RouteValues;
pub use endpoint::SharedEndpoint;
pub use memory::InMemoryRegistry;
pub use snapshot::RegistrySnapshot;

/// Errors surfaced by registry implementations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry backend could not produce a snapshot.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Source of endpoint snapshots plus change notification.
///
/// Implementations must publish a new snapshot before invoking change
/// callbacks: a consumer that calls [`snapshot`](EndpointRegistry::snapshot)
/// from inside a callback observes the version the callback announced.
pub trait EndpointRegistry: Send + Sync {
    /// Return the current immutable snapshot.
    fn snapshot(&self) -> Result<RegistrySnapshot, RegistryError>;

    /// Register `callback` to run after every published change.
    ///
    /// The callback must be cheap and non-blocking; heavier work belongs in
    /// whatever the callback schedules. Dropping the returned handle
    /// unsubscribes.
    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionHandle;
}
