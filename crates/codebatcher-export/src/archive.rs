//! Zip archives with one entry per batch.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use codebatcher_core::Batch;

use crate::error::ArchiveError;

/// Entry prefix for archives of a user selection.
pub const BATCH_ENTRY_PREFIX: &str = "code-batcher-part-";

/// Entry prefix for whole-project archives.
pub const AGGREGATE_ENTRY_PREFIX: &str = "batch-";

/// Deflate level used for every entry.
pub const COMPRESSION_LEVEL: i64 = 9;

/// Which archive is being written; decides file and entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveKind {
    /// Batches of a selection (`code-batcher-part-<n>.txt`).
    Batches,
    /// Batches of a whole project (`batch-<n>.txt`).
    Aggregate,
}

impl ArchiveKind {
    /// Entry name prefix.
    pub fn entry_prefix(&self) -> &'static str {
        match self {
            ArchiveKind::Batches => BATCH_ENTRY_PREFIX,
            ArchiveKind::Aggregate => AGGREGATE_ENTRY_PREFIX,
        }
    }

    /// Entry name for a batch number.
    pub fn entry_name(&self, batch_number: usize) -> String {
        format!("{}{batch_number}.txt", self.entry_prefix())
    }

    /// Archive file name used when the caller gives none.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ArchiveKind::Batches => crate::DEFAULT_BATCHES_ARCHIVE_NAME,
            ArchiveKind::Aggregate => crate::DEFAULT_AGGREGATE_ARCHIVE_NAME,
        }
    }
}

/// Streams batches into a zip archive, one entry at a time.
pub struct ArchiveEmitter<W: Write + Seek> {
    writer: ZipWriter<W>,
    kind: ArchiveKind,
    options: SimpleFileOptions,
    entries: usize,
    bytes: u64,
}

impl<W: Write + Seek> ArchiveEmitter<W> {
    /// Start an archive on `inner`.
    pub fn new(inner: W, kind: ArchiveKind) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL));

        Self {
            writer: ZipWriter::new(inner),
            kind,
            options,
            entries: 0,
            bytes: 0,
        }
    }

    /// Add one batch as an entry.
    pub fn write_batch(&mut self, batch: &Batch) -> Result<(), ArchiveError> {
        let name = self.kind.entry_name(batch.batch_number);
        tracing::debug!("Adding archive entry {name} ({} lines)", batch.line_count);

        self.writer.start_file(name, self.options)?;
        self.writer.write_all(batch.content.as_bytes())?;

        self.entries += 1;
        self.bytes += batch.content.len() as u64;
        Ok(())
    }

    /// Add every batch from `batches`, in order.
    pub fn write_batches<I>(&mut self, batches: I) -> Result<usize, ArchiveError>
    where
        I: IntoIterator<Item = Batch>,
    {
        let before = self.entries;
        for batch in batches {
            self.write_batch(&batch)?;
        }
        Ok(self.entries - before)
    }

    /// Entries written so far.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Write the central directory and return the inner writer.
    pub fn finish(self) -> Result<W, ArchiveError> {
        tracing::info!(
            "Finished archive: {} entries, {} uncompressed bytes",
            self.entries,
            self.bytes
        );
        Ok(self.writer.finish()?)
    }
}

/// Summary of an archive written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReport {
    /// Archive location.
    pub path: PathBuf,
    /// Entries written.
    pub entries: usize,
    /// Uncompressed bytes across all entries.
    pub uncompressed_bytes: u64,
}

/// Write `batches` as a zip archive to `inner`.
pub fn write_archive<W, I>(inner: W, kind: ArchiveKind, batches: I) -> Result<W, ArchiveError>
where
    W: Write + Seek,
    I: IntoIterator<Item = Batch>,
{
    let mut emitter = ArchiveEmitter::new(inner, kind);
    emitter.write_batches(batches)?;
    emitter.finish()
}

/// Write `batches` as a zip archive at `path`.
pub fn write_archive_file<I>(
    path: impl AsRef<Path>,
    kind: ArchiveKind,
    batches: I,
) -> Result<ArchiveReport, ArchiveError>
where
    I: IntoIterator<Item = Batch>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ArchiveError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let mut emitter = ArchiveEmitter::new(BufWriter::new(file), kind);
    emitter.write_batches(batches)?;
    let entries = emitter.entry_count();
    let uncompressed_bytes = emitter.bytes;

    let mut writer = emitter.finish()?;
    writer.flush()?;

    Ok(ArchiveReport {
        path: path.to_path_buf(),
        entries,
        uncompressed_bytes,
    })
}
