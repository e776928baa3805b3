//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured logging with key/value fields
//! - Request ID flows from the HTTP client into log events
//! - Metrics go through the `metrics` facade; without an installed recorder
//!   they are no-ops

pub mod logging;
pub mod metrics;
