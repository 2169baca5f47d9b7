//! Startup sequencing.
//!
//! Turns a validated configuration into a ready orchestrator. Anything
//! that fails here aborts the run before a single probe is sent.

use reqwest::Method;
use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::config::{Endpoint, HarnessConfig};
use crate::probe::auth::{self, AuthError};
use crate::probe::dispatcher::build_client;
use crate::probe::{HttpDispatcher, ProbeFactory};
use crate::run::{Orchestrator, Pacer, RunPlan};

/// Errors that abort a run before it starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] ValidationError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
}

/// Build the HTTP dispatcher and orchestrator for `config`.
pub async fn prepare(config: &HarnessConfig) -> Result<Orchestrator<HttpDispatcher>, StartupError> {
    let target = Endpoint::parse(
        &config.target.base_url,
        &config.target.path,
        &config.target.method,
    )?;
    let client = build_client(&config.timeouts)?;

    let token = match &config.auth.login {
        Some(login) => {
            let endpoint = Endpoint::parse(&config.target.base_url, &login.path, Method::POST.as_str())?;
            Some(auth::login(&client, &endpoint, &login.email, &login.password).await?)
        }
        None => config.auth.token.clone(),
    };
    let authorization = token
        .map(|t| auth::authorization_header(&t, config.auth.token_format))
        .transpose()?;

    tracing::info!(
        endpoint = %target,
        authenticated = authorization.is_some(),
        "Probe target ready"
    );

    let dispatcher = HttpDispatcher::new(client, authorization, config.probe.body_snippet_bytes);
    let factory = ProbeFactory::new(target, &config.probe);
    let pacer = Pacer::new(config.pacing.interval());

    Ok(Orchestrator::new(dispatcher, factory, pacer, RunPlan::from_config(config)))
}
