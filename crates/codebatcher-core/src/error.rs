//! Error types for scanning and batching.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Stable machine-readable error category reported alongside every failure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Bad request: missing root, empty selection, invalid batch size.
    InputError,
    /// The directory walk could not complete.
    ScanError,
    /// A selected file could not be read. Recovered with a placeholder.
    FileReadError,
    /// The archive writer failed.
    ArchiveError,
}

impl ErrorCategory {
    /// Category name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Errors that can occur during scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory could not be listed during the walk.
    #[error("Failed to read directory {path}: {message}")]
    ReadDir { path: PathBuf, message: String },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::ReadDir { path, .. }
            | Self::NotADirectory { path } => Some(path),
            Self::InvalidConfig { .. } => None,
        }
    }

    /// Machine-readable category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig { .. } => ErrorCategory::InputError,
            _ => ErrorCategory::ScanError,
        }
    }
}

/// Rejected request input. The operation is not attempted.
#[derive(Debug, Error)]
pub enum InputError {
    /// No project root given.
    #[error("projectPath is required")]
    MissingProjectPath,

    /// No selection tree, or an empty one.
    #[error("selectedTree cannot be empty")]
    EmptySelection,

    /// Explicitly supplied batch size that is not positive.
    #[error("linesPerBatch must be a positive integer, got {value}")]
    InvalidBatchSize { value: i64 },

    /// Request body could not be parsed.
    #[error("Malformed request: {message}")]
    Malformed { message: String },
}

impl InputError {
    /// Machine-readable category.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::InputError
    }
}

/// Why a file got a placeholder instead of its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Read failed or the content is not UTF-8.
    Unreadable,
    /// Content empty or whitespace only.
    Empty,
}

/// Non-fatal problem recorded while combining files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWarning {
    /// File the warning is about.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl FileWarning {
    /// Create a new file warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create an unreadable-file warning.
    pub fn unreadable(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self {
            path: path.into(),
            message: format!("Read error: {error}"),
            kind: WarningKind::Unreadable,
        }
    }

    /// Create an empty-file warning.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Empty file: {}", path.display()),
            path,
            kind: WarningKind::Empty,
        }
    }

    /// Unreadable files are the recovered `file_read_error` category; empty files are not errors.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self.kind {
            WarningKind::Unreadable => Some(ErrorCategory::FileReadError),
            WarningKind::Empty => None,
        }
    }
}
