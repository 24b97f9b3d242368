//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! ApiRequest (request.rs)
//!     → request interceptor chain (interceptor.rs, middleware/)
//!     → base URL resolution + deadline (client.rs)
//!     → transport dispatch (transport.rs, reqwest)
//!     → status check (client.rs)
//!     → response interceptor chain (interceptor.rs, middleware/)
//!     → ApiResponse (response.rs) or HttpError (error.rs)
//! ```

pub mod client;
pub mod error;
pub mod interceptor;
pub mod middleware;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{resolve_url, HttpClient};
pub use error::{BoxError, HttpError, Stage};
pub use interceptor::{
    from_fn, map, recover, FnInterceptor, Interceptor, InterceptorChain, InterceptorHandle, PassThrough,
};
pub use request::{ApiRequest, X_REQUEST_ID};
pub use response::{ApiResponse, RequestMeta};
pub use transport::{transport_fn, FnTransport, PreparedRequest, ReqwestTransport, Transport};
