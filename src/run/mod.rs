//! Run subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator
//!     → pacing.rs (one interval between issuances)
//!     → probe::Dispatch (N probes, concurrently in flight)
//!     → aggregator.rs (record each outcome exactly once, any order)
//!     → report.rs (counters vs. expected threshold → RunReport)
//! ```
//!
//! # Design Decisions
//! - Fixed issuance rate with unbounded in-flight probes
//! - Counters live in the run's scope; nothing survives between runs
//! - No partial report: the report is built only after the drain barrier

pub mod aggregator;
pub mod orchestrator;
pub mod pacing;
pub mod report;

pub use aggregator::{AggregateCounters, OutcomeAggregator};
pub use orchestrator::{drain, Orchestrator, RunPhase, RunPlan};
pub use pacing::Pacer;
pub use report::{Expectation, LatencySummary, RunReport, StopReason};
