//! Access-log API.
//!
//! # Responsibilities
//! - Describe log queries (`LogFilter`) and decode result pages
//! - Fetch pages from `GET /api/logs` through the HTTP client
//!
//! # Wire Format
//! ```text
//! GET /api/logs?ip=&path=&status=&limit=200&offset=0&from=RFC3339&to=RFC3339
//!     → {"total": N, "logs": [LogEntry, ...] | null}
//! ```

pub mod api;
pub mod types;

pub use api::{LogsApi, LOGS_PATH};
pub use types::{LogEntry, LogFilter, LogsPage, DEFAULT_LIMIT};
