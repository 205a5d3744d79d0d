//! Selection, combining and batching for codebatcher.
//!
//! This crate turns a selection tree into fixed-size text batches:
//!
//! - **Selection** - flatten a tree where a selected folder selects everything beneath it
//! - **Combining** - read each file and wrap it in a named frame
//! - **Splitting** - cut the combined text into numbered batches of N lines
//!
//! # Pipeline
//!
//! ```rust,no_run
//! use codebatcher_batch::BatchPipeline;
//! use codebatcher_core::BatchConfig;
//! use codebatcher_scan::scan_project;
//!
//! let mut tree = scan_project("/path/to/project").unwrap();
//! tree[0].set_selected(true);
//!
//! let pipeline = BatchPipeline::new("/path/to/project", &BatchConfig::with_lines(500));
//! let outcome = pipeline.run(&tree);
//!
//! for batch in outcome.batches() {
//!     println!("batch {}: {} lines", batch.batch_number, batch.line_count);
//! }
//! ```
//!
//! # Frame layout
//!
//! Every file becomes:
//!
//! ```text
//! *** <fileName> ***
//! *** <relativePath> ***
//! <content or placeholder>
//!
//! ----------- End of File -----------
//!
//! ```

mod combine;
mod pipeline;
mod select;
mod split;

pub use combine::{
    CombinedDocument, ContentCombiner, EMPTY_FILE_PLACEHOLDER, END_OF_FILE_MARKER,
    READ_ERROR_PLACEHOLDER, combine_files, write_frame,
};
pub use pipeline::{BatchOutcome, BatchPipeline};
pub use select::{SelectionReducer, collect_selected_files};
pub use split::{BatchSplitter, Batches, count_lines, split_into_batches};

pub use codebatcher_core::{Batch, BatchConfig, BatchSummary, Node};
