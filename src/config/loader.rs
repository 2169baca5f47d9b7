//! Configuration loading from disk and the command line.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::HarnessConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied on the command line. `None` leaves the layered value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub post_id: Option<i64>,
    pub user_id: Option<i64>,
    pub base_url: Option<String>,
    pub count: Option<u32>,
    pub expected_success: Option<u32>,
    pub pacing_ms: Option<u64>,
    pub token: Option<String>,
    pub halt_on_rate_limit: bool,
    pub deadline_secs: Option<u64>,
}

impl CliOverrides {
    /// Apply the overrides on top of a loaded configuration.
    pub fn apply(self, config: &mut HarnessConfig) {
        if let Some(post_id) = self.post_id {
            config.probe.post_id = post_id;
        }
        if let Some(user_id) = self.user_id {
            config.probe.user_id = user_id;
        }
        if let Some(base_url) = self.base_url {
            config.target.base_url = base_url;
        }
        if let Some(count) = self.count {
            config.probe.count = count;
        }
        if let Some(expected) = self.expected_success {
            config.probe.expected_success = expected;
        }
        if let Some(ms) = self.pacing_ms {
            config.pacing.interval_ms = ms;
        }
        if let Some(token) = self.token {
            config.auth.token = Some(token);
        }
        if self.halt_on_rate_limit {
            config.run.halt_on_rate_limit = true;
        }
        if let Some(secs) = self.deadline_secs {
            config.run.deadline_secs = Some(secs);
        }
    }
}

/// Layer defaults, an optional config file and CLI overrides, then validate.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: CliOverrides,
) -> Result<HarnessConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => HarnessConfig::default(),
    };
    overrides.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        base_url = %config.target.base_url,
        path = %config.target.path,
        count = config.probe.count,
        expected_success = config.probe.expected_success,
        "Configuration resolved"
    );
    Ok(config)
}

fn read_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
