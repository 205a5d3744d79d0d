//! Output writers for codebatcher.
//!
//! Batches leave the process either as one combined text document or as a
//! zip archive holding one deflate-compressed entry per batch. Entries are
//! written as batches arrive, so the full batch list never has to be
//! materialized.

mod archive;
mod error;
mod text;

pub use archive::{
    AGGREGATE_ENTRY_PREFIX, ArchiveEmitter, ArchiveKind, ArchiveReport, BATCH_ENTRY_PREFIX,
    COMPRESSION_LEVEL, write_archive, write_archive_file,
};
pub use error::ArchiveError;
pub use text::{write_text, write_text_file};

/// Default name for the combined text download.
pub const DEFAULT_TEXT_FILE_NAME: &str = "code-batcher.txt";

/// Default name for the archive of a selection's batches.
pub const DEFAULT_BATCHES_ARCHIVE_NAME: &str = "code-batcher-batches.zip";

/// Default name for the whole-project archive.
pub const DEFAULT_AGGREGATE_ARCHIVE_NAME: &str = "code-batcher-aggregate.zip";
