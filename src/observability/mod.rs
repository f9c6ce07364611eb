//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing, level set by config or environment
//! - Metrics are cheap (atomic increments) and safe to record before an
//!   exporter exists

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
