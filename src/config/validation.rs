//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (probe count, threshold, timeouts)
//! - Validate the target endpoint once, before any probe is sent
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HarnessConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::endpoint::{is_plain_path, Endpoint};
use crate::config::schema::HarnessConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    Scheme(String),

    #[error("path '{0}' must start with '/' and carry no query or fragment")]
    Path(String),

    #[error("invalid HTTP method '{0}'")]
    Method(String),

    #[error("probe count must be at least 1")]
    ZeroProbes,

    #[error("expected successes ({expected}) exceed probe count ({count})")]
    ThresholdAboveCount { expected: u32, count: u32 },

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("login {0} must not be empty")]
    EmptyCredential(&'static str),
}

/// Validate a fully layered configuration.
pub fn validate_config(config: &HarnessConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = Endpoint::parse(
        &config.target.base_url,
        &config.target.path,
        &config.target.method,
    ) {
        errors.push(e);
    }

    if config.probe.count == 0 {
        errors.push(ValidationError::ZeroProbes);
    }

    if config.probe.expected_success > config.probe.count {
        errors.push(ValidationError::ThresholdAboveCount {
            expected: config.probe.expected_success,
            count: config.probe.count,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if let Some(login) = &config.auth.login {
        if !is_plain_path(&login.path) {
            errors.push(ValidationError::Path(login.path.clone()));
        }
        if login.email.trim().is_empty() {
            errors.push(ValidationError::EmptyCredential("email"));
        }
        if login.password.is_empty() {
            errors.push(ValidationError::EmptyCredential("password"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
