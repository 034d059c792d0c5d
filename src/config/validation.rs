//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every origin is a bare `http`/`https` origin
//! - Check path prefixes and the mount path are usable as path segments
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;
use crate::routing::registry::Origin;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration, collecting every violation.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let mount = &config.listener.mount_path;
    if !mount.starts_with('/') {
        errors.push(ValidationError::new("listener.mount_path", "must start with '/'"));
    } else if mount.len() > 1 && mount.ends_with('/') {
        errors.push(ValidationError::new(
            "listener.mount_path",
            "must not end with '/' unless it is exactly '/'",
        ));
    }

    let origins = &config.origins;
    for (field, value) in [
        ("origins.primary", &origins.primary),
        ("origins.cdn", &origins.cdn),
        ("origins.api", &origins.api),
    ] {
        if let Err(e) = Origin::parse(value) {
            errors.push(ValidationError::new(field, e.to_string()));
        }
    }

    for (field, prefix) in [
        ("origins.cdn_path_prefix", &origins.cdn_path_prefix),
        ("origins.api_path_prefix", &origins.api_path_prefix),
    ] {
        if prefix.is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        } else if prefix.contains('/') {
            errors.push(ValidationError::new(field, "must be a single path segment"));
        }
    }

    if origins.cdn_path_prefix == origins.api_path_prefix {
        errors.push(ValidationError::new(
            "origins.api_path_prefix",
            "must differ from origins.cdn_path_prefix",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::new("limits.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
