//! Selection → combine → split composition.

use std::path::{Path, PathBuf};

use codebatcher_core::{Batch, BatchConfig, BatchSummary, Node, SelectionRequest};

use crate::combine::{CombinedDocument, ContentCombiner};
use crate::select::SelectionReducer;
use crate::split::{BatchSplitter, Batches};

/// Runs a selection tree through the reducer, combiner and splitter.
#[derive(Debug, Clone)]
pub struct BatchPipeline {
    root: PathBuf,
    combiner: ContentCombiner,
    splitter: BatchSplitter,
}

impl BatchPipeline {
    /// Create a pipeline for a project root.
    pub fn new(root: impl Into<PathBuf>, config: &BatchConfig) -> Self {
        let root = root.into();
        Self {
            combiner: ContentCombiner::new(&root).with_parallel_reads(config.parallel_reads),
            splitter: BatchSplitter::new(config.lines_per_batch),
            root,
        }
    }

    /// Create a pipeline from a validated request.
    pub fn for_request(request: &SelectionRequest) -> Self {
        Self::new(&request.project_path, &request.batch_config())
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Batch size in effect.
    pub fn lines_per_batch(&self) -> usize {
        self.splitter.lines_per_batch()
    }

    /// Combine the files selected in `tree`.
    pub fn run(&self, tree: &[Node]) -> BatchOutcome {
        let files = SelectionReducer::new().flatten(tree);
        self.run_files(&files)
    }

    /// Combine every file in `tree`, ignoring selection flags.
    pub fn run_all(&self, tree: &[Node]) -> BatchOutcome {
        let files = SelectionReducer::new().collect_all_files(tree);
        self.run_files(&files)
    }

    fn run_files(&self, files: &[Node]) -> BatchOutcome {
        tracing::info!(
            "Combining {} files from {}",
            files.len(),
            self.root.display()
        );

        let combined = self.combiner.combine(files);
        if combined.has_warnings() {
            tracing::warn!(
                "{} files replaced by placeholders",
                combined.warnings.len()
            );
        }

        BatchOutcome {
            total_files: files.len(),
            combined,
            splitter: self.splitter,
        }
    }
}

/// Result of a pipeline run. Batches are produced on demand.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Files that went into the combined document.
    pub total_files: usize,
    /// The combined document.
    pub combined: CombinedDocument,
    splitter: BatchSplitter,
}

impl BatchOutcome {
    /// Combined text.
    pub fn content(&self) -> &str {
        &self.combined.content
    }

    /// Batches of the combined text, lazily.
    pub fn batches(&self) -> Batches<'_> {
        self.splitter.batches(&self.combined.content)
    }

    /// Collected batches.
    pub fn batch_list(&self) -> Vec<Batch> {
        self.batches().collect()
    }

    /// Number of batches the combined text splits into.
    pub fn total_batches(&self) -> usize {
        self.splitter.batch_count(&self.combined.content)
    }

    /// JSON summary of the run.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::new(self.total_files, self.batch_list())
    }

    /// Take the combined text.
    pub fn into_content(self) -> String {
        self.combined.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_counts_selected_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a1\na2").unwrap();
        fs::write(temp.path().join("b.txt"), "b1").unwrap();

        let tree = vec![
            Node::new_file("a.txt", temp.path().join("a.txt")).with_selected(true),
            Node::new_file("b.txt", temp.path().join("b.txt")),
        ];

        let pipeline = BatchPipeline::new(temp.path(), &BatchConfig::with_lines(2));
        let outcome = pipeline.run(&tree);

        assert_eq!(outcome.total_files, 1);
        assert!(outcome.content().contains("a1\na2"));
        assert!(!outcome.content().contains("b1"));

        let summary = outcome.summary();
        assert_eq!(summary.total_files, 1);
        assert_eq!(summary.total_batches, outcome.total_batches());
        assert!(summary.batches.iter().all(|b| b.line_count <= 2));
    }

    #[test]
    fn test_run_all_ignores_flags() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();

        let tree = vec![
            Node::new_file("a.txt", temp.path().join("a.txt")),
            Node::new_file("b.txt", temp.path().join("b.txt")),
        ];

        let outcome = BatchPipeline::new(temp.path(), &BatchConfig::default()).run_all(&tree);
        assert_eq!(outcome.total_files, 2);
        assert_eq!(outcome.total_batches(), 1);
    }

    #[test]
    fn test_empty_selection_still_yields_one_batch() {
        let temp = TempDir::new().unwrap();
        let outcome = BatchPipeline::new(temp.path(), &BatchConfig::default()).run(&[]);

        assert_eq!(outcome.total_files, 0);
        assert_eq!(outcome.batch_list(), vec![Batch::new(1, 1, "")]);
    }
}
