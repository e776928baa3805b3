//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the API address can be built
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.base_url {url:?} is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("api.settings_path {0:?} must contain the {{id}} placeholder")]
    MissingIdPlaceholder(String),

    #[error("api.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("server.id must not be empty")]
    EmptyServerId,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = Url::parse(&config.api.base_url) {
        errors.push(ValidationError::InvalidBaseUrl {
            url: config.api.base_url.clone(),
            reason: e.to_string(),
        });
    }

    if !config.api.settings_path.contains("{id}") {
        errors.push(ValidationError::MissingIdPlaceholder(config.api.settings_path.clone()));
    }

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.server.id.trim().is_empty() {
        errors.push(ValidationError::EmptyServerId);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
