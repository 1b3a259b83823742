//! Logging and tracing initialization.
//!
//! Log records never go to stdout. The CLI prints machine-readable reports
//! there, so logs go to stderr or to the configured log file.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    pub fn for_config(config: &LoggingConfig) -> Self {
        match &config.file {
            Some(path) => Self::File(path.clone()),
            None => Self::Stderr,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. If the log file
/// cannot be opened, logging falls back to stderr.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file = match LogTarget::for_config(config) {
        LogTarget::File(path) => match open_log_file(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Failed to open log file {}: {e}", path.display());
                None
            }
        },
        LogTarget::Stderr => None,
    };

    let subscriber = match file {
        Some(file) => build_subscriber(config, env_filter, Mutex::new(file), false),
        None => build_subscriber(config, env_filter, std::io::stderr, true),
    };
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn open_log_file(path: &std::path::Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Build a fmt subscriber writing to `writer`, JSON formatted when
/// `config.json` is set.
pub fn build_subscriber<W>(
    config: &LoggingConfig,
    env_filter: EnvFilter,
    writer: W,
    ansi: bool,
) -> Box<dyn tracing::Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(ansi);

    if config.json {
        Box::new(builder.json().finish())
    } else {
        Box::new(
            builder
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    }
}
