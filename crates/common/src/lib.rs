//! probekit Common Utilities
//!
//! Shared infrastructure for all probekit crates:
//! - Error types and result aliases
//! - Clock abstraction used to stamp tracker entries
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
