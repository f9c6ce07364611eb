//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DispatchConfig (validated, immutable)
//!     → endpoints applied to the registry
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → registry.replace_all(new endpoints)
//!     → selectors rebuild on their next query
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A reload that fails to parse or validate never reaches the registry

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::load_config;
pub use loader::ConfigError;
pub use schema::DispatchConfig;
pub use schema::EndpointConfig;
pub use schema::ObservabilityConfig;
pub use schema::WatchConfig;
pub use watcher::ConfigWatcher;
