//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize, missing file → defaults)
//!     → environment overrides (LOGVIEW_API_BASE_URL)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → handed to the HTTP client and router at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigurationError, BASE_URL_ENV};
pub use schema::{ApiConfig, ClientConfig, ObservabilityConfig, RouterConfig};
pub use validation::ValidationError;
