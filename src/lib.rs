//! Rate-limit verification harness.
//!
//! Fires a fixed number of probes at one HTTP endpoint, tallies how the
//! service answered, and compares the tally against the threshold its rate
//! limiter is supposed to enforce.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod run;

pub use config::HarnessConfig;
pub use lifecycle::Shutdown;
pub use run::{Orchestrator, RunReport};
