//! Batch types produced by splitting a combined document.

use serde::{Deserialize, Serialize};

/// One fixed-size slice of the combined document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// 1-based position, dense.
    pub batch_number: usize,
    /// Lines in this batch.
    #[serde(rename = "linesCount", alias = "lineCount")]
    pub line_count: usize,
    /// The lines joined with `\n`.
    pub content: String,
}

impl Batch {
    /// Create a batch.
    pub fn new(batch_number: usize, line_count: usize, content: impl Into<String>) -> Self {
        Self {
            batch_number,
            line_count,
            content: content.into(),
        }
    }
}

/// JSON summary returned for a batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Files that went into the combined document.
    pub total_files: usize,
    /// Number of batches.
    pub total_batches: usize,
    /// The batches, in order.
    pub batches: Vec<Batch>,
}

impl BatchSummary {
    /// Build a summary from the batch list.
    pub fn new(total_files: usize, batches: Vec<Batch>) -> Self {
        Self {
            total_files,
            total_batches: batches.len(),
            batches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_wire_names() {
        let batch = Batch::new(1, 2, "a\nb");
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["batchNumber"], 1);
        assert_eq!(json["linesCount"], 2);
        assert_eq!(json["content"], "a\nb");
    }

    #[test]
    fn test_summary_counts_batches() {
        let summary = BatchSummary::new(3, vec![Batch::new(1, 1, ""), Batch::new(2, 1, "")]);
        assert_eq!(summary.total_batches, 2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalFiles"], 3);
        assert_eq!(json["totalBatches"], 2);
    }
}
