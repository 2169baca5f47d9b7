//! Credentials for probes.
//!
//! A token is either configured directly or obtained once through a login
//! exchange before the run starts. It is then rendered into a single
//! `Authorization` header value shared by every probe.

use reqwest::header::HeaderValue;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Endpoint, TokenFormat};

/// Errors that can occur while preparing credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("login rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("login response did not contain a token")]
    MissingToken,

    #[error("token cannot be used in a header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Exchange credentials for a token.
pub async fn login(
    client: &Client,
    endpoint: &Endpoint,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    tracing::info!(endpoint = %endpoint, email, "Logging in");

    let response = client
        .request(endpoint.method.clone(), endpoint.url().clone())
        .json(&LoginRequest { email, password })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: LoginResponse = response.json().await?;
    match parsed.token {
        Some(token) if !token.is_empty() => {
            tracing::info!("Login succeeded");
            Ok(token)
        }
        _ => Err(AuthError::MissingToken),
    }
}

/// Render a token into an `Authorization` header value.
pub fn authorization_header(token: &str, format: TokenFormat) -> Result<HeaderValue, AuthError> {
    let value = match format {
        TokenFormat::Plain => format!("Bearer {}", token),
        TokenFormat::JsonEnvelope => {
            format!("Bearer {}", serde_json::json!({ "token": token }))
        }
    };
    let mut header = HeaderValue::from_str(&value)?;
    header.set_sensitive(true);
    Ok(header)
}
