//! Scan result container and statistics.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::node::Node;

/// Summary statistics for a scanned tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Files kept in the tree.
    pub total_files: u64,
    /// Folders kept in the tree.
    pub total_folders: u64,
    /// Entries dropped by the static rules or ignore patterns.
    pub excluded_entries: u64,
    /// Folders dropped because nothing survived filtering inside them.
    pub pruned_folders: u64,
    /// Deepest level holding a kept entry (top level is 1).
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a kept file.
    pub fn record_file(&mut self, depth: u32) {
        self.total_files += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a kept folder.
    pub fn record_folder(&mut self, depth: u32) {
        self.total_folders += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record an excluded entry.
    pub fn record_excluded(&mut self) {
        self.excluded_entries += 1;
    }

    /// Record a folder pruned for being empty.
    pub fn record_pruned(&mut self) {
        self.pruned_folders += 1;
    }
}

/// Filtered project tree returned by a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTree {
    /// Canonical root path that was scanned.
    pub root_path: PathBuf,

    /// Top-level nodes, sorted by name.
    pub tree: Vec<Node>,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Duration of the scan.
    pub scan_duration: Duration,
}

impl ScanTree {
    /// Create a new scan tree.
    pub fn new(
        root_path: PathBuf,
        tree: Vec<Node>,
        config: ScanConfig,
        stats: TreeStats,
        scan_duration: Duration,
    ) -> Self {
        Self {
            root_path,
            tree,
            config,
            stats,
            scan_duration,
        }
    }

    /// Number of top-level nodes.
    pub fn top_level_count(&self) -> usize {
        self.tree.len()
    }

    /// Get the total number of files.
    pub fn total_files(&self) -> u64 {
        self.stats.total_files
    }

    /// True when every entry was filtered out.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Take the top-level nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.tree
    }
}
