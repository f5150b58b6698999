//! File logging.
//!
//! The TUI owns the terminal, so logs go to
//! `$FEEDLINE_HOME/logs/feedline.log` through a non-blocking writer.

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub const LOG_FILE_NAME: &str = "feedline.log";

const DEFAULT_FILTER: &str = "feedline_core=info,feedline_tui=info,feedline=info";
const DEBUG_FILTER: &str = "feedline_core=debug,feedline_tui=debug,feedline=debug";

/// Installs the global subscriber writing to `dir/feedline.log`.
///
/// `RUST_LOG` takes precedence over the default filter. The returned guard
/// flushes pending lines on drop and must be held until exit.
///
/// # Errors
/// Returns an error if the log directory or file cannot be created, or if a
/// global subscriber is already installed.
pub fn init(dir: &Path, debug: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let path = dir.join(LOG_FILE_NAME);
    let file = options
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let (writer, guard) = non_blocking(file);
    let default_filter = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}
