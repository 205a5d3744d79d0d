//! Single-document text export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ArchiveError;

/// Write the combined document to `writer`, returning the bytes written.
pub fn write_text<W: Write>(mut writer: W, content: &str) -> Result<u64, ArchiveError> {
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(content.len() as u64)
}

/// Write the combined document to a file at `path`.
pub fn write_text_file(path: impl AsRef<Path>, content: &str) -> Result<u64, ArchiveError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ArchiveError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let written = write_text(BufWriter::new(file), content)?;
    tracing::info!("Wrote {written} bytes to {}", path.display());
    Ok(written)
}
