//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → CLI overrides (loader.rs)
//!     → validation.rs (semantic checks, endpoint parse)
//!     → HarnessConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow running with no config file at all
//! - Validation separates syntactic (serde) from semantic checks
//! - The target URL is turned into an `Endpoint` once; nothing downstream re-parses strings

pub mod endpoint;
pub mod loader;
pub mod schema;
pub mod validation;

pub use endpoint::Endpoint;
pub use loader::{resolve_config, CliOverrides, ConfigError};
pub use schema::{
    AuthConfig, HarnessConfig, LoginConfig, ObservabilityConfig, ProbeConfig, TimeoutConfig,
    TokenFormat,
};
