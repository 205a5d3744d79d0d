//! Request bodies and their validation.
//!
//! The field names match the JSON bodies of the batch, download and
//! aggregate operations (`projectPath`, `selectedTree`, `linesPerBatch`).

use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::BatchConfig;
use crate::error::InputError;
use crate::node::Node;

/// Raw body of a batch or download request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    /// Project root the selection tree was scanned from.
    #[serde(default)]
    pub project_path: Option<String>,

    /// Scan tree with `selected` flags set by the caller.
    #[serde(default)]
    pub selected_tree: Option<Vec<Node>>,

    /// Optional batch size.
    #[serde(default)]
    pub lines_per_batch: Option<i64>,
}

/// A batch request that passed validation.
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    /// Project root.
    pub project_path: PathBuf,
    /// Non-empty selection tree.
    pub selected_tree: Vec<Node>,
    /// Positive batch size, if one was given.
    pub lines_per_batch: Option<usize>,
}

impl SelectionRequest {
    /// Batch configuration for this request.
    pub fn batch_config(&self) -> BatchConfig {
        self.lines_per_batch
            .map(BatchConfig::with_lines)
            .unwrap_or_default()
    }
}

impl BatchRequest {
    /// Parse a request body.
    pub fn from_json(body: &str) -> Result<Self, InputError> {
        serde_json::from_str(body).map_err(|e| InputError::Malformed {
            message: e.to_string(),
        })
    }

    /// Parse a request body from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InputError> {
        serde_json::from_reader(reader).map_err(|e| InputError::Malformed {
            message: e.to_string(),
        })
    }

    /// Check required fields and the batch size.
    pub fn validate(self) -> Result<SelectionRequest, InputError> {
        let project_path = require_project_path(self.project_path.as_deref())?;

        let selected_tree = match self.selected_tree {
            Some(tree) if !tree.is_empty() => tree,
            _ => return Err(InputError::EmptySelection),
        };

        let lines_per_batch = validate_lines_per_batch(self.lines_per_batch)?;

        Ok(SelectionRequest {
            project_path,
            selected_tree,
            lines_per_batch,
        })
    }
}

/// Raw body of an aggregate request: scan everything and batch it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    /// Project root to scan.
    #[serde(default)]
    pub project_path: Option<String>,

    /// Optional batch size.
    #[serde(default)]
    pub lines_per_batch: Option<i64>,
}

impl AggregateRequest {
    /// Check the project path and batch size.
    pub fn validate(self) -> Result<(PathBuf, BatchConfig), InputError> {
        let project_path = require_project_path(self.project_path.as_deref())?;
        let config = validate_lines_per_batch(self.lines_per_batch)?
            .map(BatchConfig::with_lines)
            .unwrap_or_default();
        Ok((project_path, config))
    }
}

/// A project path must be present and non-blank.
pub fn require_project_path(path: Option<&str>) -> Result<PathBuf, InputError> {
    match path {
        Some(p) if !p.trim().is_empty() => Ok(PathBuf::from(p)),
        _ => Err(InputError::MissingProjectPath),
    }
}

/// An omitted batch size is fine; an explicit non-positive one is rejected.
pub fn validate_lines_per_batch(value: Option<i64>) -> Result<Option<usize>, InputError> {
    match value {
        None => Ok(None),
        Some(n) if n > 0 => usize::try_from(n)
            .map(Some)
            .map_err(|_| InputError::InvalidBatchSize { value: n }),
        Some(n) => Err(InputError::InvalidBatchSize { value: n }),
    }
}
