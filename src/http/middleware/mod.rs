//! Stock interceptors.
//!
//! # Request Chain
//! - `RequestId`: tag every call with an `x-request-id`
//! - `RequestTracing`: log outgoing calls
//!
//! # Response Chain
//! - `ResponseTracing`: log outcomes and failures
//! - `ResponseMetrics`: count calls and record latency
//!
//! All of them pass values and rejections through unchanged apart from the
//! header `RequestId` adds.

pub mod metrics;
pub mod request_id;
pub mod trace;

pub use metrics::ResponseMetrics;
pub use request_id::RequestId;
pub use trace::{RequestTracing, ResponseTracing};
