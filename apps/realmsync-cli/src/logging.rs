//! Run log setup.
//!
//! Every run appends to a plain-text log file. With `--verbose` the same
//! events are mirrored to stderr. `RUST_LOG` overrides the default `info`
//! filter for both.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{LoaderError, LoaderResult};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(log_file: &Path, verbose: bool) -> LoaderResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| {
            LoaderError::Io(format!(
                "Failed to open log file {}: {}",
                log_file.display(),
                e
            ))
        })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| LoaderError::Config(format!("Failed to initialize logging: {}", e)))
}
