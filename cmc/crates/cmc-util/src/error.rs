//! Error types for report writing.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for report-buffer persistence.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to create or overwrite a report file
    #[error("failed to write report {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for report operations
pub type ReportResult<T> = std::result::Result<T, ReportError>;
