//! Project tree scanning for codebatcher.
//!
//! This crate walks a project directory and builds the filtered tree that a
//! caller selects files from. Key behaviour:
//!
//! - **Static rules** skip dotfiles and a fixed denylist of lockfiles,
//!   linter/formatter configs and env files
//! - **Gitignore** patterns from the root `.gitignore` are honoured
//! - **Pruning** drops folders with nothing left after filtering
//! - **Deterministic order**: entries are sorted by name
//!
//! # Example
//!
//! ```rust,no_run
//! use codebatcher_scan::{ScanConfig, TreeScanner};
//!
//! let config = ScanConfig::new("/path/to/project");
//! let tree = TreeScanner::new().scan(&config).unwrap();
//!
//! println!("Top-level entries: {}", tree.top_level_count());
//! println!("Files: {}", tree.total_files());
//! ```

mod matcher;
mod scanner;

pub use matcher::{GITIGNORE_FILE, IgnoreMatcher};
pub use scanner::{TreeScanner, scan_project};

// Re-export core types for convenience
pub use codebatcher_core::{Node, NodeKind, ScanConfig, ScanError, ScanTree, TreeStats};
