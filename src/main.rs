//! rate-probe
//!
//! Verifies a service's rate limiter from the outside: sends N probes at a
//! fixed pace, tallies the answers and checks them against the expected
//! threshold.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI args + config file
//!          │
//!          ▼
//!   ┌─────────────┐     ┌──────────────┐     ┌────────────────┐
//!   │   config    │────▶│  lifecycle   │────▶│ run::Orchestr. │
//!   │ validation  │     │   startup    │     │  (Issuing …)   │
//!   └─────────────┘     │ (auth/login) │     └───────┬────────┘
//!                       └──────────────┘             │ pacing
//!                                                    ▼
//!                                            ┌────────────────┐      Service
//!                                            │ probe dispatch │─────▶ under
//!                                            └───────┬────────┘       test
//!                                                    │ outcomes
//!                                                    ▼
//!                                            ┌────────────────┐
//!                                            │   aggregator   │──▶ report
//!                                            └────────────────┘
//! ```
//!
//! # Exit codes
//! - 0: observed counts match the expected threshold
//! - 1: counts do not match (including runs stopped early)
//! - 2: configuration or authentication error, nothing was sent

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use rate_probe::config::{resolve_config, CliOverrides};
use rate_probe::lifecycle::{prepare, signals, Shutdown};
use rate_probe::observability::logging;

#[derive(Parser)]
#[command(name = "rate-probe")]
#[command(about = "Probe an HTTP endpoint and verify its rate limiter", long_about = None)]
struct Cli {
    /// Post the probe comments are attached to [default: 1]
    post_id: Option<i64>,

    /// User the probe comments are attributed to [default: 1]
    user_id: Option<i64>,

    /// Base URL of the service under test [default: http://localhost:8080]
    base_url: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of probes to send [default: 70]
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Number of probes expected to succeed [default: 60]
    #[arg(short, long)]
    expect: Option<u32>,

    /// Delay between probes in milliseconds [default: 100]
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Bearer token sent with every probe
    #[arg(long, env = "RATE_PROBE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Stop issuing after the first 429
    #[arg(long)]
    halt_on_rate_limit: bool,

    /// Stop issuing after this many seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            post_id: self.post_id,
            user_id: self.user_id,
            base_url: self.base_url.clone(),
            count: self.count,
            expected_success: self.expect,
            pacing_ms: self.pacing_ms,
            token: self.token.clone(),
            halt_on_rate_limit: self.halt_on_rate_limit,
            deadline_secs: self.deadline_secs,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    logging::init(&config.observability);
    tracing::info!("rate-probe v{} starting", env!("CARGO_PKG_VERSION"));

    let orchestrator = match prepare(&config).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("ERROR: {}", e);
            return ExitCode::from(2);
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    let signal_task = signals::spawn_ctrl_c_handler(shutdown.clone());

    if !cli.json {
        println!("Testing rate limiting...");
        println!("Post ID: {}", config.probe.post_id);
        println!("User ID: {}", config.probe.user_id);
        println!("Base URL: {}", config.target.base_url);
        println!();
    }

    let json = cli.json;
    let report = orchestrator
        .run_observed(shutdown.subscribe(), |record| {
            if !json {
                println!("{}", record);
            }
        })
        .await;
    signal_task.abort();

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize report");
                println!("{}", report);
            }
        }
    } else {
        println!();
        println!("{}", report);
    }

    if report.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
