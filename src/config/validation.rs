//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain spaces, got '{0}'")]
    InvalidServerName(String),
    #[error("bridge.command is required")]
    MissingBridgeCommand,
    #[error("bridge.max_event_bytes must be greater than zero")]
    ZeroEventLimit,
    #[error("blobs.path is required")]
    MissingBlobPath,
    #[error("blobs.base_url must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
    #[error("blobs.max_size must be greater than zero")]
    ZeroBlobSize,
    #[error("limits.max_line_length must be at least 512, got {0}")]
    LineLengthTooSmall(usize),
    #[error("limits.send_queue must be greater than zero")]
    ZeroSendQueue,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.server.name;
    if name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if name.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidServerName(name.clone()));
    }

    if config.bridge.command.trim().is_empty() {
        errors.push(ValidationError::MissingBridgeCommand);
    }
    if config.bridge.max_event_bytes == 0 {
        errors.push(ValidationError::ZeroEventLimit);
    }

    if config.blobs.path.trim().is_empty() {
        errors.push(ValidationError::MissingBlobPath);
    }
    let url = &config.blobs.base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ValidationError::InvalidBaseUrl(url.clone()));
    }
    if config.blobs.max_size == 0 {
        errors.push(ValidationError::ZeroBlobSize);
    }

    if config.limits.max_line_length < 512 {
        errors.push(ValidationError::LineLengthTooSmall(
            config.limits.max_line_length,
        ));
    }
    if config.limits.send_queue == 0 {
        errors.push(ValidationError::ZeroSendQueue);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
