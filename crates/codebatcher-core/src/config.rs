//! Scan and batch configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Lines per batch when the caller gives none (or zero).
pub const DEFAULT_LINES_PER_BATCH: usize = 3000;

/// Entry names that never show up in a scan, whatever the ignore patterns say.
///
/// Lockfiles, linter/formatter configs and env files.
pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &[
    ".gitignore",
    ".prettierrc",
    ".prettierrc.json",
    ".prettierrc.js",
    ".eslintrc",
    ".eslintrc.json",
    ".editorconfig",
    ".npmrc",
    ".env",
    ".env.example",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "tsconfig.build.json",
    "eslint.config.js",
];

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Entry names always skipped, independent of ignore patterns.
    #[builder(default = "default_excluded_names()")]
    #[serde(default = "default_excluded_names")]
    pub exclude_names: Vec<String>,

    /// Include entries whose name starts with a dot.
    #[builder(default = "false")]
    #[serde(default)]
    pub include_hidden: bool,

    /// Read `.gitignore` at the root.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub use_gitignore: bool,

    /// Extra patterns (gitignore syntax) applied after the root `.gitignore`.
    #[builder(default)]
    #[serde(default)]
    pub extra_ignore_patterns: Vec<String>,

    /// Follow symbolic links. Links are skipped when false.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_true() -> bool {
    true
}

fn default_excluded_names() -> Vec<String> {
    DEFAULT_EXCLUDED_NAMES.iter().map(|s| s.to_string()).collect()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with the default exclusion rules.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_names: default_excluded_names(),
            include_hidden: false,
            use_gitignore: true,
            extra_ignore_patterns: Vec::new(),
            follow_symlinks: false,
        }
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }

    /// Check the static name denylist.
    pub fn is_denied_name(&self, name: &str) -> bool {
        self.exclude_names.iter().any(|n| n == name)
    }

    /// Static exclusion rule: hidden entries and denylisted names.
    pub fn is_statically_excluded(&self, name: &str) -> bool {
        self.should_skip_hidden(name) || self.is_denied_name(name)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Configuration for combining and splitting selected files.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct BatchConfig {
    /// Lines per batch. Zero means [`DEFAULT_LINES_PER_BATCH`].
    #[builder(default = "DEFAULT_LINES_PER_BATCH")]
    #[serde(default = "default_lines_per_batch")]
    pub lines_per_batch: usize,

    /// Read selected files on the rayon pool. Output order is unaffected.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub parallel_reads: bool,
}

fn default_lines_per_batch() -> usize {
    DEFAULT_LINES_PER_BATCH
}

impl BatchConfig {
    /// Create a new config builder.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::default()
    }

    /// Config with a given batch size and default everything else.
    pub fn with_lines(lines_per_batch: usize) -> Self {
        Self {
            lines_per_batch,
            ..Self::default()
        }
    }

    /// Batch size with the zero fallback applied.
    pub fn effective_lines_per_batch(&self) -> usize {
        effective_lines_per_batch(self.lines_per_batch)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            lines_per_batch: DEFAULT_LINES_PER_BATCH,
            parallel_reads: true,
        }
    }
}

/// Apply the default for a zero batch size.
pub fn effective_lines_per_batch(requested: usize) -> usize {
    if requested == 0 {
        DEFAULT_LINES_PER_BATCH
    } else {
        requested
    }
}
