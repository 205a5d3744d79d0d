//! Core types for codebatcher.
//!
//! This crate holds the data model shared by the scan, batch and export
//! crates: tree nodes, batches, scan and batch configuration, request
//! validation, and the error taxonomy.

mod batch;
mod config;
mod error;
mod node;
mod request;
mod tree;

pub use batch::{Batch, BatchSummary};
pub use config::{
    BatchConfig, BatchConfigBuilder, DEFAULT_EXCLUDED_NAMES, DEFAULT_LINES_PER_BATCH, ScanConfig,
    ScanConfigBuilder, effective_lines_per_batch,
};
pub use error::{ErrorCategory, FileWarning, InputError, ScanError, WarningKind};
pub use node::{Node, NodeKind};
pub use request::{
    AggregateRequest, BatchRequest, SelectionRequest, require_project_path,
    validate_lines_per_batch,
};
pub use tree::{ScanTree, TreeStats};
