//! Export error type.

use std::path::PathBuf;

use thiserror::Error;

use codebatcher_core::ErrorCategory;

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Output file could not be created.
    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output failed.
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The zip writer reported an error.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl ArchiveError {
    /// Machine-readable category.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::ArchiveError
    }
}
