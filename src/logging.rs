//! Diagnostic logging to a file.
//!
//! The terminal being edited is never a log sink: interleaving log lines with
//! redraw sequences corrupts the prompt line. Logs go to a file chosen by the
//! caller or by `RAWLINE_LOG`, filtered by `RAWLINE_LOG_FILTER`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;
use crate::error::LineError;

pub const LOG_FILTER_ENV: &str = "RAWLINE_LOG_FILTER";
const DEFAULT_FILTER: &str = "debug";

/// Installs a global fmt subscriber appending to `path`.
///
/// Fails if the file cannot be opened or a global subscriber already exists.
pub fn init_file_logging(path: impl AsRef<Path>) -> Result<(), LineError> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| LineError::Logging(format!("opening {}: {err}", path.display())))?;

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| LineError::Logging(err.to_string()))
}

/// Calls [`init_file_logging`] when `RAWLINE_LOG` is set. Returns whether a
/// subscriber was installed.
pub fn init_from_env() -> Result<bool, LineError> {
    match EnvConfig::from_env().log_file {
        Some(path) => init_file_logging(path).map(|()| true),
        None => Ok(false),
    }
}
