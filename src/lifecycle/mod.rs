//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Build HTTP client → Authenticate → Build orchestrator
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop issuing probes → Drain in-flight → Report
//!
//! Signals (signals.rs):
//!     Ctrl-C → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Setup failures abort before the first probe is sent
//! - Shutdown never discards outcomes that are already in flight

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{prepare, StartupError};
