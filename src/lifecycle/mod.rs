//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Shutdown::trigger → broadcast to tasks
//!     → update loop and query loop wind down → Exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task holds a receiver
//! - Triggering with no subscribers is a no-op, not an error

pub mod shutdown;

pub use shutdown::Shutdown;
