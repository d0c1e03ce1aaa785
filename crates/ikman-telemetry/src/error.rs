//! Error types for telemetry setup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for telemetry setup.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The global tracing subscriber could not be installed.
    #[error("failed to install tracing subscriber")]
    Init {
        /// Installation failure detail.
        detail: String,
    },
    /// The configured log file could not be opened.
    #[error("failed to open log file")]
    LogFile {
        /// Path of the log file.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

/// Convenience alias for telemetry results.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
