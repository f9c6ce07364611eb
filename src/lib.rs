//! Versioned route-value dispatch for named endpoints.
//!
//! Endpoints register under ordered attribute/value tuples (their route
//! values). Queries carrying route values resolve to the endpoints
//! published under the same tuple: exact match first, case-insensitive
//! as a fallback, an empty list when nothing matches.
//!
//! # Architecture Overview
//!
//! ```text
//!     Route-value query        ┌────────────────────────────────────────────┐
//!     ────────────────────────▶│              EndpointSelector              │
//!                              │                                            │
//!                              │  ┌────────────────┐    ┌───────────────┐   │
//!     Matched endpoints        │  │ VersionedCache │───▶│ DispatchTable │   │
//!     ◀────────────────────────┼──│ (lazy rebuild) │    │ exact + folded│   │
//!                              │  └───────┬────────┘    └───────────────┘   │
//!                              └──────────┼─────────────────────────────────┘
//!                                         │ snapshot() / change callback
//!                                         ▼
//!                              ┌──────────────────────┐      config file
//!                              │   InMemoryRegistry   │◀──── (watcher.rs,
//!                              │ versioned snapshots  │       hot reload)
//!                              └──────────────────────┘
//! ```
//!
//! Mutations publish a fresh immutable [`RegistrySnapshot`]; selectors
//! notice via a change signal and rebuild their [`DispatchTable`] on the
//! next query. In-flight queries keep the table generation they started
//! with.

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod registry;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::DispatchConfig;
pub use dispatch::DispatchError;
pub use dispatch::DispatchTable;
pub use dispatch::EndpointSelector;
pub use dispatch::MatchKind;
pub use dispatch::VersionedCache;
pub use lifecycle::Shutdown;
pub use registry::Endpoint;
pub use registry::EndpointRegistry;
pub use registry::InMemoryRegistry;
pub use registry::RegistrySnapshot;
pub use registry::RouteValue;
pub use registry::RouteValues;
pub use registry::SharedEndpoint;
