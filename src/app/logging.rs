//! Tracing subscriber setup for the `nv` binary.
//!
//! The filter comes from `NV_LOG` (default `warn`). The TUI owns the terminal,
//! so in TUI mode logs only go to `NV_LOG_FILE` when it is set.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::AppError;

pub const LOG_FILTER_ENV: &str = "NV_LOG";
pub const LOG_FILE_ENV: &str = "NV_LOG_FILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Stderr unless a log file is configured.
    Console,
    /// Log file if configured, otherwise nowhere.
    Tui,
}

pub fn init_logging(target: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let writer = match (std::env::var_os(LOG_FILE_ENV), target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    AppError::new(4, format!("Failed to open log file {}: {e}", path.to_string_lossy()))
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        (None, LogTarget::Console) => BoxMakeWriter::new(std::io::stderr),
        (None, LogTarget::Tui) => BoxMakeWriter::new(std::io::sink),
    };

    // A subscriber may already be installed (e.g. by a test harness); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(())
}
