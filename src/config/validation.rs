//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the base URL is an absolute http(s) URL
//! - Validate value ranges (timeouts > 0, known log levels)
//! - Check route declarations (non-empty, unique, well-formed patterns)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use url::Url;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in the configuration or route declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `api.base_url` is not an absolute http(s) URL.
    InvalidBaseUrl { value: String, reason: String },
    /// `api.timeout_ms` is zero.
    ZeroTimeout,
    /// `observability.log_level` is not a known level.
    UnknownLogLevel(String),
    /// The route table has no entries.
    NoRoutes,
    /// Two route records share a path pattern.
    DuplicatePath(String),
    /// Two route records share a name.
    DuplicateName(String),
    /// A route record has an empty name.
    EmptyName { path: String },
    /// A path pattern could not be compiled.
    InvalidPattern { pattern: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidBaseUrl { value, reason } => {
                write!(f, "api.base_url `{}` is invalid: {}", value, reason)
            }
            ValidationError::ZeroTimeout => write!(f, "api.timeout_ms must be greater than zero"),
            ValidationError::UnknownLogLevel(level) => {
                write!(f, "observability.log_level `{}` is not one of {:?}", level, LOG_LEVELS)
            }
            ValidationError::NoRoutes => write!(f, "no routes declared"),
            ValidationError::DuplicatePath(path) => write!(f, "duplicate route path `{}`", path),
            ValidationError::DuplicateName(name) => write!(f, "duplicate route name `{}`", name),
            ValidationError::EmptyName { path } => {
                write!(f, "route `{}` has an empty name", path)
            }
            ValidationError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid route pattern `{}`: {}", pattern, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(base_url) = &config.api.base_url {
        if let Err(reason) = check_base_url(base_url) {
            errors.push(ValidationError::InvalidBaseUrl {
                value: base_url.clone(),
                reason,
            });
        }
    }

    if config.api.timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme `{}`", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
