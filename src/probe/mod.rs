//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! ProbeFactory::build(sequence)
//!     → ProbeRequest (immutable, owned by one dispatch call)
//!     → Dispatch::dispatch (one HTTP request, auth header, request ID)
//!     → outcome::classify (status code → ProbeOutcome)
//! ```
//!
//! # Design Decisions
//! - No retries: a failed probe is definitive for its sequence index
//! - Dispatch never returns an error; transport failures are outcomes
//! - Classification is a pure function of status and body

pub mod auth;
pub mod dispatcher;
pub mod outcome;
pub mod request;

pub use dispatcher::{Dispatch, HttpDispatcher};
pub use outcome::{classify, ProbeOutcome, ProbeRecord};
pub use request::{CommentPayload, ProbeFactory, ProbeRequest};
