//! Fixed-size line batching.

use std::iter::Peekable;
use std::str::Split;

use codebatcher_core::{Batch, effective_lines_per_batch};

/// Splits text into numbered batches of at most `lines_per_batch` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSplitter {
    lines_per_batch: usize,
}

impl BatchSplitter {
    /// Create a splitter. Zero selects the default batch size.
    pub fn new(lines_per_batch: usize) -> Self {
        Self {
            lines_per_batch: effective_lines_per_batch(lines_per_batch),
        }
    }

    /// Batch size in effect.
    pub fn lines_per_batch(&self) -> usize {
        self.lines_per_batch
    }

    /// Lazily produce the batches of `text`.
    pub fn batches<'a>(&self, text: &'a str) -> Batches<'a> {
        Batches {
            lines: text.split('\n').peekable(),
            size: self.lines_per_batch,
            next_number: 1,
        }
    }

    /// Collect every batch of `text`.
    pub fn split(&self, text: &str) -> Vec<Batch> {
        self.batches(text).collect()
    }

    /// Number of batches `text` will produce.
    pub fn batch_count(&self, text: &str) -> usize {
        count_lines(text).div_ceil(self.lines_per_batch)
    }
}

impl Default for BatchSplitter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Split `text` into batches of `lines_per_batch` lines (zero means the default).
///
/// Empty text still yields one batch holding a single empty line.
pub fn split_into_batches(text: &str, lines_per_batch: usize) -> Vec<Batch> {
    BatchSplitter::new(lines_per_batch).split(text)
}

/// Lines in `text`: the number of `\n`-separated segments.
pub fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}

/// Iterator over the batches of a text, see [`BatchSplitter::batches`].
#[derive(Debug, Clone)]
pub struct Batches<'a> {
    lines: Peekable<Split<'a, char>>,
    size: usize,
    next_number: usize,
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        let mut content = String::new();
        let mut line_count = 0;

        while line_count < self.size {
            let Some(line) = self.lines.next() else {
                break;
            };
            if line_count > 0 {
                content.push('\n');
            }
            // Only a segment ended by `\n` can end in a `\r\n` break.
            let line = if self.lines.peek().is_some() {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            };
            content.push_str(line);
            line_count += 1;
        }

        if line_count == 0 {
            return None;
        }

        let batch = Batch::new(self.next_number, line_count, content);
        self.next_number += 1;
        Some(batch)
    }
}
