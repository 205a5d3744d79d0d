//! Combining selected files into one framed text document.

use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;

use codebatcher_core::{FileWarning, Node};

/// Stands in for content that could not be read as UTF-8 text.
pub const READ_ERROR_PLACEHOLDER: &str = "Error reading file";

/// Stands in for empty or whitespace-only content.
pub const EMPTY_FILE_PLACEHOLDER: &str = "Empty File/No content";

/// Closing line of every file frame.
pub const END_OF_FILE_MARKER: &str = "----------- End of File -----------";

/// Text produced by [`ContentCombiner::combine`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedDocument {
    /// Concatenated file frames.
    pub content: String,
    /// Files framed into `content`.
    pub file_count: usize,
    /// Placeholder substitutions, in file order.
    pub warnings: Vec<FileWarning>,
}

impl CombinedDocument {
    /// Number of `\n`-separated lines, as the splitter counts them.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// True if any file was replaced by a placeholder.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Reads files and concatenates them into framed sections.
#[derive(Debug, Clone)]
pub struct ContentCombiner {
    /// Roots that relative paths are computed against, canonical form first.
    roots: Vec<PathBuf>,
    parallel_reads: bool,
}

impl ContentCombiner {
    /// Create a combiner for files under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut roots = Vec::with_capacity(2);
        if let Ok(canonical) = root.canonicalize() {
            roots.push(canonical);
        }
        let absolute = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        if !roots.contains(&absolute) {
            roots.push(absolute);
        }

        Self {
            roots,
            parallel_reads: true,
        }
    }

    /// Toggle reading files on the rayon pool.
    pub fn with_parallel_reads(mut self, parallel: bool) -> Self {
        self.parallel_reads = parallel;
        self
    }

    /// Read every file and frame it, in input order.
    ///
    /// Never fails: unreadable and empty files get a placeholder and a
    /// [`FileWarning`].
    pub fn combine(&self, files: &[Node]) -> CombinedDocument {
        let sections: Vec<(String, Option<FileWarning>)> = if self.parallel_reads {
            files.par_iter().map(|file| read_section(file.path())).collect()
        } else {
            files.iter().map(|file| read_section(file.path())).collect()
        };

        let mut document = CombinedDocument {
            content: String::new(),
            file_count: 0,
            warnings: Vec::new(),
        };

        for (file, (content, warning)) in files.iter().zip(sections) {
            let relative = self.relative_path(file.path());
            write_frame(&mut document.content, file.name(), &relative, &content);
            document.file_count += 1;
            if let Some(warning) = warning {
                document.warnings.push(warning);
            }
        }

        tracing::debug!(
            "Combined {} files into {} bytes ({} placeholders)",
            document.file_count,
            document.content.len(),
            document.warnings.len()
        );

        document
    }

    /// Path of `path` relative to the project root, with `/` separators.
    pub fn relative_path(&self, path: &Path) -> String {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let relative = self
            .roots
            .iter()
            .find_map(|root| absolute.strip_prefix(root).ok().map(Path::to_path_buf))
            .or_else(|| {
                self.roots
                    .first()
                    .and_then(|root| pathdiff::diff_paths(&absolute, root))
            })
            .unwrap_or_else(|| path.to_path_buf());

        display_with_slashes(&relative)
    }
}

/// Combine `files` under `root` and return only the text.
pub fn combine_files(files: &[Node], root: impl AsRef<Path>) -> String {
    ContentCombiner::new(root).combine(files).content
}

/// Append one file frame to `out`.
pub fn write_frame(out: &mut String, name: &str, relative_path: &str, content: &str) {
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        "*** {name} ***\n*** {relative_path} ***\n{content}\n\n{END_OF_FILE_MARKER}\n\n"
    );
}

fn read_section(path: &Path) -> (String, Option<FileWarning>) {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => {
            tracing::warn!("Empty file: {}", path.display());
            (
                EMPTY_FILE_PLACEHOLDER.to_string(),
                Some(FileWarning::empty(path)),
            )
        }
        Ok(content) => (content, None),
        Err(err) => {
            tracing::warn!("Error reading file {}: {err}", path.display());
            (
                READ_ERROR_PLACEHOLDER.to_string(),
                Some(FileWarning::unreadable(path, &err)),
            )
        }
    }
}

fn display_with_slashes(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir => None,
            Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebatcher_core::WarningKind;
    use tempfile::TempDir;

    fn file_node(root: &Path, rel: &str) -> Node {
        let path = root.join(rel);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Node::new_file(name, path)
    }

    #[test]
    fn test_frame_layout() {
        let mut out = String::new();
        write_frame(&mut out, "a.rs", "src/a.rs", "fn a() {}");
        assert_eq!(
            out,
            "*** a.rs ***\n*** src/a.rs ***\nfn a() {}\n\n----------- End of File -----------\n\n"
        );
    }

    #[test]
    fn test_empty_and_hello() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("empty.txt"), "").unwrap();
        fs::write(temp.path().join("hello.txt"), "hello").unwrap();

        let files = vec![
            file_node(temp.path(), "empty.txt"),
            file_node(temp.path(), "hello.txt"),
        ];
        let document = ContentCombiner::new(temp.path()).combine(&files);

        assert_eq!(
            document.content,
            "*** empty.txt ***\n*** empty.txt ***\nEmpty File/No content\n\n\
             ----------- End of File -----------\n\n\
             *** hello.txt ***\n*** hello.txt ***\nhello\n\n\
             ----------- End of File -----------\n\n"
        );
        assert_eq!(document.file_count, 2);
        assert_eq!(document.warnings.len(), 1);
        assert_eq!(document.warnings[0].kind, WarningKind::Empty);
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("blank.txt"), "  \n\t\n").unwrap();

        let text = combine_files(&[file_node(temp.path(), "blank.txt")], temp.path());
        assert!(text.contains(EMPTY_FILE_PLACEHOLDER));
    }

    #[test]
    fn test_unreadable_files_get_placeholder() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("binary.bin"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let files = vec![
            file_node(temp.path(), "missing.txt"),
            file_node(temp.path(), "binary.bin"),
        ];
        let document = ContentCombiner::new(temp.path()).combine(&files);

        assert_eq!(document.content.matches(READ_ERROR_PLACEHOLDER).count(), 2);
        assert!(document.has_warnings());
        assert!(
            document
                .warnings
                .iter()
                .all(|w| w.kind == WarningKind::Unreadable)
        );
    }

    #[test]
    fn test_nested_relative_path() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/b/c.rs"), "x").unwrap();

        let text = combine_files(&[file_node(temp.path(), "a/b/c.rs")], temp.path());
        assert!(text.starts_with("*** c.rs ***\n*** a/b/c.rs ***\nx\n"));
    }

    #[test]
    fn test_order_preserved_with_parallel_reads() {
        let temp = TempDir::new().unwrap();
        let mut files = Vec::new();
        for i in 0..50 {
            let name = format!("f{i:02}.txt");
            fs::write(temp.path().join(&name), format!("content {i}")).unwrap();
            files.push(file_node(temp.path(), &name));
        }

        let parallel = ContentCombiner::new(temp.path()).combine(&files);
        let serial = ContentCombiner::new(temp.path())
            .with_parallel_reads(false)
            .combine(&files);

        assert_eq!(parallel, serial);
        let first = parallel.content.find("content 0").unwrap();
        let last = parallel.content.find("content 49").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_no_files() {
        let temp = TempDir::new().unwrap();
        let document = ContentCombiner::new(temp.path()).combine(&[]);
        assert!(document.content.is_empty());
        assert_eq!(document.file_count, 0);
    }
}
