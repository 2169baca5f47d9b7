//! Probe outcomes and status classification.

use serde::Serialize;
use std::time::Duration;

/// Classified result of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// HTTP 200.
    Success,
    /// HTTP 429. Also counted as a failure.
    RateLimited,
    /// HTTP 401.
    Unauthorized,
    /// Any other status, with a snippet of the body for diagnostics.
    OtherFailure { status: u16, body: String },
    /// The request never produced a status (refused, DNS, timeout, ...).
    TransportError { message: String },
}

impl ProbeOutcome {
    /// Short label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Success => "success",
            ProbeOutcome::RateLimited => "rate_limited",
            ProbeOutcome::Unauthorized => "unauthorized",
            ProbeOutcome::OtherFailure { .. } => "other_failure",
            ProbeOutcome::TransportError { .. } => "transport_error",
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, ProbeOutcome::Success)
    }
}

/// Map a status code and body to an outcome.
///
/// Pure: the result depends only on the arguments.
pub fn classify(status: u16, body: &str, snippet_bytes: usize) -> ProbeOutcome {
    match status {
        200 => ProbeOutcome::Success,
        429 => ProbeOutcome::RateLimited,
        401 => ProbeOutcome::Unauthorized,
        _ => ProbeOutcome::OtherFailure {
            status,
            body: snippet(body, snippet_bytes),
        },
    }
}

/// Whether the outcome for `status` carries a body snippet.
pub fn keeps_body(status: u16) -> bool {
    !matches!(status, 200 | 401 | 429)
}

/// Decode a body prefix read off the wire.
///
/// A multi-byte character split by the read limit is dropped rather than
/// replaced.
pub fn decode_snippet(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) if e.error_len().is_none() => String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Truncate to at most `max_bytes`, backing off to a char boundary.
fn snippet(body: &str, max_bytes: usize) -> String {
    if body.len() <= max_bytes {
        return body.to_string();
    }
    let mut end = max_bytes;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

/// An outcome tagged with its sequence index and latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRecord {
    pub sequence: u32,
    pub outcome: ProbeOutcome,
    pub latency: Duration,
}

impl std::fmt::Display for ProbeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Probe {}: ", self.sequence)?;
        match &self.outcome {
            ProbeOutcome::Success => write!(f, "SUCCESS"),
            ProbeOutcome::RateLimited => write!(f, "RATE LIMIT (429)"),
            ProbeOutcome::Unauthorized => write!(f, "UNAUTHORIZED (401)"),
            ProbeOutcome::OtherFailure { status, body } => {
                write!(f, "FAILED (HTTP {})", status)?;
                if !body.is_empty() {
                    write!(f, "\nResponse: {}", body)?;
                }
                Ok(())
            }
            ProbeOutcome::TransportError { message } => write!(f, "ERROR - {}", message),
        }
    }
}
