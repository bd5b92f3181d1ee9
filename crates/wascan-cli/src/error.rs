//! CLI error types

use std::path::PathBuf;
use wascan_core::ScanError;

/// Result type alias for CLI operations
pub type CliResult<T> = std::result::Result<T, CliError>;

/// Failures that abort a CLI run
///
/// Per-file decode failures are not errors; they are reported as failed
/// detections in the output.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        /// Config path given on the command line
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid JSON for a scan config
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        /// Config path given on the command line
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// Controller rejected an operation
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Session ended before every file was read
    #[error("session ended after {read} of {total} files")]
    Incomplete {
        /// Files with a reported result
        read: usize,
        /// Files requested
        total: usize,
    },

    /// Writing output failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serializing output failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
