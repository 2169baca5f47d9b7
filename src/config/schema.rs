//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a probe run.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for a rate-limit verification run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Service under test.
    pub target: TargetConfig,

    /// Probe count, expected threshold and payload shape.
    pub probe: ProbeConfig,

    /// Delay between probe issuances.
    pub pacing: PacingConfig,

    /// Early-stop behaviour.
    pub run: RunConfig,

    /// HTTP client timeouts.
    pub timeouts: TimeoutConfig,

    /// Credentials attached to every probe.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Target endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the service (e.g., "http://localhost:8080").
    pub base_url: String,

    /// Path the probes are sent to.
    pub path: String,

    /// HTTP method for probes.
    pub method: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            path: "/api/comments".to_string(),
            method: "POST".to_string(),
        }
    }
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Total number of probes to issue.
    pub count: u32,

    /// Number of probes the limiter is expected to accept.
    pub expected_success: u32,

    /// Post the synthetic comments are attached to.
    pub post_id: i64,

    /// User the synthetic comments are attributed to.
    pub user_id: i64,

    /// Comment text prefix; the sequence index is appended.
    pub text_prefix: String,

    /// Maximum response body bytes kept for diagnostics.
    pub body_snippet_bytes: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            count: 70,
            expected_success: 60,
            post_id: 1,
            user_id: 1,
            text_prefix: "Test comment".to_string(),
            body_snippet_bytes: 512,
        }
    }
}

/// Pacing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Fixed delay between issuances in milliseconds (0 disables pacing).
    pub interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

impl PacingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Run control configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RunConfig {
    /// Stop issuing after the first 429 is observed.
    pub halt_on_rate_limit: bool,

    /// Stop issuing once this many seconds have elapsed.
    pub deadline_secs: Option<u64>,
}

impl RunConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// Timeout configuration for the HTTP client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// How the bearer token is rendered into the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenFormat {
    /// `Bearer <token>`
    #[default]
    Plain,
    /// `Bearer {"token":"<token>"}`
    JsonEnvelope,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Static bearer token. Ignored when `login` is set.
    pub token: Option<String>,

    /// Header rendering for the token.
    pub token_format: TokenFormat,

    /// Exchange credentials for a token before the run.
    pub login: Option<LoginConfig>,
}

/// Credentials for the login exchange.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginConfig {
    /// Login path on the target service.
    #[serde(default = "default_login_path")]
    pub path: String,

    pub email: String,

    pub password: String,
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
