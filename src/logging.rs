//! Logging setup
//!
//! The TUI owns stdout/stderr, so logs go to a file in the data directory.
//! `FORMBUILDER_LOG` overrides the configured level using `EnvFilter` syntax.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::FormbuilderPaths;

pub const LOG_ENV: &str = "FORMBUILDER_LOG";

/// Install the file subscriber. Keep the returned guard alive until exit,
/// dropping it flushes buffered lines.
pub fn init_logging(paths: &FormbuilderPaths, level: &str) -> Result<WorkerGuard> {
    paths.ensure_dirs()?;
    let log_dir = paths.log_file.parent().unwrap_or(paths.root.as_path());
    let log_name = paths
        .log_file
        .file_name()
        .with_context(|| format!("Invalid log file path {}", paths.log_file.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, embedding); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(guard)
}
