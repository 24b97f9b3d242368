//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP pipeline / router produce:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → Terminal or log aggregation (stderr)
//!     → Whatever recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging through `tracing`
//! - Request ID flows from the request chain into every log line
//! - Metrics go through the `metrics` facade; without a recorder they are no-ops

pub mod logging;
pub mod metrics;

pub use logging::{env_filter, init_logging};
