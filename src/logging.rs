//! Tracing subscriber setup
//!
//! Standard output is the editing surface, so log lines are never written to a terminal. They go
//! to the file given by `--log` only. Without it no subscriber is installed and all events are
//! discarded.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Build a subscriber writing to `log_file`. Filter is taken from `RUST_LOG` and defaults to
/// `info`.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}

/// Initialize the global tracing subscriber with file logging.
pub fn init_global(log_file_path: &Path) -> Result<()> {
    let log_file = File::create(log_file_path)?;
    build_subscriber(log_file)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
