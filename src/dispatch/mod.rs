//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Registry change:
//!     callback → VersionedCache signal bump (no rebuild yet)
//!
//! Query (EndpointSelector::select):
//!     ensure_current → rebuild table if signalled
//!     → DispatchTable::lookup (exact, then case-folded)
//!     → owned Vec<SharedEndpoint> (empty on miss)
//! ```
//!
//! # Design Decisions
//! - Rebuilds are read-driven; change storms cost one rebuild on the next
//!   query, not one per change
//! - Queries hold an `Arc` to one table generation; a concurrent swap never
//!   mixes two generations inside a single lookup

pub mod cache;
pub mod selector;
pub mod table;

pub use cache::BuildFn;
pub use cache::VersionedCache;
pub use selector::EndpointSelector;
pub use table::DispatchTable;
pub use table::LookupResult;
pub use table::MatchKind;

use crate::registry::RegistryError;

/// Errors surfaced by the dispatch subsystem.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The backing registry could not produce a snapshot.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The cached value could not be built from a snapshot.
    #[error("dispatch table build failed: {0}")]
    Build(String),

    /// The cache was used after [`VersionedCache::dispose`].
    #[error("dispatch cache used after dispose")]
    Disposed,
}
