//! Error type shared by the terminal, editor and logging layers.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LineError {
    #[error("terminal attribute error while {operation}: {source}")]
    TerminalAttributes {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to read from terminal: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write to terminal: {0}")]
    Write(#[source] io::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl LineError {
    #[must_use]
    pub fn attributes(operation: &'static str, source: io::Error) -> Self {
        Self::TerminalAttributes { operation, source }
    }

    /// Underlying OS error code, when the failure came from a system call.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::TerminalAttributes { source, .. }
            | Self::Read(source)
            | Self::Write(source) => source.raw_os_error(),
            Self::Logging(_) => None,
        }
    }
}

/// Abort-with-diagnostic hook invoked when the terminal can no longer be controlled.
pub type FatalHandler = fn(&LineError) -> !;

/// Prints the diagnostic to stderr and exits with status 1.
pub fn default_fatal_handler(err: &LineError) -> ! {
    tracing::error!(error = %err, "fatal terminal error");
    eprintln!("rawline: {err}");
    std::process::exit(1)
}
