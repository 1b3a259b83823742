//! Error types shared across probekit crates.
//!
//! Tracker operations are infallible; these errors only surface at the
//! edges (configuration, event files, entry output).

use std::path::PathBuf;

/// Top-level error type for probekit operations.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Event stream error: {message}")]
    EventStream { message: String },

    #[error("Replay error: {message}")]
    Replay { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using ProbeError.
pub type ProbeResult<T> = Result<T, ProbeError>;

impl ProbeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn event_stream(msg: impl Into<String>) -> Self {
        Self::EventStream {
            message: msg.into(),
        }
    }

    pub fn replay(msg: impl Into<String>) -> Self {
        Self::Replay {
            message: msg.into(),
        }
    }
}
