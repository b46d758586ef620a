// file: src/logging/logger.rs
// version: 2.1.0
// guid: 8b3f1c27-6e4d-4a9b-b0d5-2f71c8e94a36

//! Logger initialization and configuration

use crate::error::WelcomeError;
use crate::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Pick the level from the command line flags. `RUST_LOG` wins when neither
/// flag is given.
fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Log file name for a session started at `now`
pub fn log_file_name(now: DateTime<Utc>) -> String {
    format!("amdr-welcome-{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Initialize the logging system.
///
/// Logs go to stderr, and additionally to a timestamped file when
/// `log_dir` is given. Returns the log file path, if any.
pub fn init_logger(verbose: bool, quiet: bool, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(io::stderr)
        .compact()
        .with_filter(build_filter(verbose, quiet));

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(Utc::now()));
            let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(build_filter(verbose, quiet));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| WelcomeError::config(format!("Failed to initialize logger: {}", e)))?;

    if let Some(path) = &log_path {
        tracing::info!("Logging to {}", path.display());
    }

    Ok(log_path)
}

/// Run `f` inside an `operation` span
pub fn with_operation_span<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let span = tracing::info_span!("operation", name = operation);
    let _enter = span.enter();
    f()
}
