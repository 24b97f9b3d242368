//! Access-log viewer client library.
//!
//! # Architecture Overview
//!
//! ```text
//!   navigation target ──▶ routing (table + router + history)
//!                              │
//!                              ▼ activated view (app)
//!                         logs::LogsApi
//!                              │
//!                              ▼
//!   request chain ──▶ http::HttpClient ──▶ transport (reqwest) ──▶ log backend
//!   response chain ◀──────────┘
//!
//!   cross-cutting: config (TOML + env), observability (tracing, metrics)
//! ```

pub mod app;
pub mod config;
pub mod http;
pub mod logs;
pub mod observability;
pub mod routing;

pub use config::ClientConfig;
pub use http::HttpClient;
pub use routing::Router;
