//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that supplies the API base URL.
pub const BASE_URL_ENV: &str = "LOGVIEW_API_BASE_URL";

/// Error type for configuration loading and route registration.
///
/// Fatal to startup: the application must not proceed with an invalid
/// configuration or route table.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl ConfigurationError {
    /// The individual validation problems, if this is a validation failure.
    pub fn issues(&self) -> &[ValidationError] {
        match self {
            ConfigurationError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// The base URL comes from, in rising priority: the file,
/// `LOGVIEW_API_BASE_URL`, then `base_url_override`. Validation runs once,
/// after all overrides.
pub fn load_config(path: &Path, base_url_override: Option<String>) -> Result<ClientConfig, ConfigurationError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ClientConfig = toml::from_str(&content)?;

    apply_overrides(config, std::env::var(BASE_URL_ENV).ok(), base_url_override)
}

/// Like [`load_config`], but a missing file yields the default configuration.
///
/// Reporting the missing file is left to the caller, which usually has not
/// installed a subscriber yet.
pub fn load_or_default(path: &Path, base_url_override: Option<String>) -> Result<ClientConfig, ConfigurationError> {
    if !path.exists() {
        return apply_overrides(
            ClientConfig::default(),
            std::env::var(BASE_URL_ENV).ok(),
            base_url_override,
        );
    }
    load_config(path, base_url_override)
}

/// Apply the environment value, then the explicit override, then validate.
pub fn apply_overrides(
    config: ClientConfig,
    env_value: Option<String>,
    base_url_override: Option<String>,
) -> Result<ClientConfig, ConfigurationError> {
    let config = apply_base_url_override(config, env_value);
    let config = apply_base_url_override(config, base_url_override);
    validate_config(&config).map_err(ConfigurationError::Validation)?;
    Ok(config)
}

/// Replace `api.base_url` with `value` when it is set and non-empty.
pub fn apply_base_url_override(mut config: ClientConfig, value: Option<String>) -> ClientConfig {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        config.api.base_url = Some(value.trim().to_string());
    }
    config
}
