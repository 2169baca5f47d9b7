//! Request dispatch.
//!
//! # Responsibilities
//! - Send exactly one request per probe (no retries)
//! - Classify the response into a `ProbeOutcome`
//! - Absorb every transport failure into `ProbeOutcome::TransportError`

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use std::error::Error as _;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use crate::config::TimeoutConfig;
use crate::probe::outcome::{classify, decode_snippet, keeps_body, ProbeOutcome};
use crate::probe::request::ProbeRequest;

/// Header carrying the per-probe correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sends one probe and reports its outcome. Never fails.
pub trait Dispatch {
    fn dispatch(&self, request: ProbeRequest) -> impl Future<Output = ProbeOutcome> + Send;
}

/// Build the shared HTTP client with the configured timeouts.
pub fn build_client(timeouts: &TimeoutConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.request_secs))
        .build()
}

/// Dispatcher backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: Client,
    authorization: Option<HeaderValue>,
    snippet_bytes: usize,
}

impl HttpDispatcher {
    pub fn new(client: Client, authorization: Option<HeaderValue>, snippet_bytes: usize) -> Self {
        Self {
            client,
            authorization,
            snippet_bytes,
        }
    }
}

impl Dispatch for HttpDispatcher {
    async fn dispatch(&self, request: ProbeRequest) -> ProbeOutcome {
        let request_id = Uuid::new_v4();
        let target = &request.target;

        let mut builder = self
            .client
            .request(target.method.clone(), target.url().clone())
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(&request.payload);
        if let Some(auth) = &self.authorization {
            builder = builder.header(AUTHORIZATION, auth.clone());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let message = describe_transport_error(&e);
                tracing::warn!(
                    sequence = request.sequence,
                    request_id = %request_id,
                    error = %message,
                    "Probe failed before a response"
                );
                return ProbeOutcome::TransportError { message };
            }
        };

        let status = response.status().as_u16();
        let body = if keeps_body(status) {
            read_snippet(response, self.snippet_bytes, request.sequence).await
        } else {
            String::new()
        };

        let outcome = classify(status, &body, self.snippet_bytes);
        tracing::debug!(
            sequence = request.sequence,
            request_id = %request_id,
            status,
            outcome = outcome.label(),
            "Probe completed"
        );
        outcome
    }
}

/// Read at most `limit` bytes of the body, then drop the rest of the response.
///
/// A failed read keeps whatever arrived; the status alone decides the outcome.
async fn read_snippet(mut response: Response, limit: usize, sequence: u32) -> String {
    let mut buf = Vec::with_capacity(limit.min(8 * 1024));
    while buf.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(limit - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(sequence, error = %e, "Could not read response body");
                break;
            }
        }
    }
    decode_snippet(&buf)
}

/// Flatten a reqwest error and its sources into one line.
fn describe_transport_error(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else {
        "request"
    };

    let mut message = format!("{}: {}", kind, error);
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
