//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → Operator terminal / log aggregation
//!     → Any recorder an embedding application installs
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr; stdout carries the run report only
//! - Every probe carries a request ID that appears in its log lines
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
