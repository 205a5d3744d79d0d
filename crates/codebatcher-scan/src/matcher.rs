//! Gitignore matching against root-relative paths.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use codebatcher_core::ScanConfig;

/// Name of the ignore file read from the scan root.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Compiled ignore patterns for one project root.
///
/// Only the root `.gitignore` is consulted; nested ignore files are not.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    matcher: Gitignore,
}

impl IgnoreMatcher {
    /// A matcher that ignores nothing.
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
        }
    }

    /// Load `<root>/.gitignore`, or match nothing when it is absent.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        Self::build(root.as_ref(), true, &[])
    }

    /// Build the matcher described by a scan config.
    pub fn for_config(config: &ScanConfig, root: &Path) -> Self {
        Self::build(root, config.use_gitignore, &config.extra_ignore_patterns)
    }

    /// Build from the root `.gitignore` (if `read_gitignore`) followed by `extra` lines.
    ///
    /// Lines that fail to compile are skipped with a warning.
    pub fn build(root: &Path, read_gitignore: bool, extra: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        if read_gitignore {
            let gitignore_path = root.join(GITIGNORE_FILE);
            match fs::read_to_string(&gitignore_path) {
                Ok(content) => {
                    for line in content.lines() {
                        add_line(&mut builder, Some(gitignore_path.clone()), line);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!("No {} at {}", GITIGNORE_FILE, root.display());
                }
                Err(e) => {
                    tracing::warn!("Could not read {}: {e}", gitignore_path.display());
                }
            }
        }

        for line in extra {
            add_line(&mut builder, None, line);
        }

        match builder.build() {
            Ok(matcher) => {
                tracing::debug!(
                    "Compiled {} ignore patterns for {}",
                    matcher.len(),
                    root.display()
                );
                Self { matcher }
            }
            Err(e) => {
                tracing::warn!("Ignore patterns for {} failed to build: {e}", root.display());
                Self::empty()
            }
        }
    }

    /// Check whether a root-relative path, or any of its parent folders, is ignored.
    ///
    /// `is_dir` lets directory-only patterns such as `build/` match.
    pub fn is_ignored(&self, relative_path: impl AsRef<Path>, is_dir: bool) -> bool {
        let relative_path = relative_path.as_ref();
        if self.matcher.is_empty() || relative_path.as_os_str().is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(relative_path, is_dir)
            .is_ignore()
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.matcher.len()
    }

    /// True when no patterns were compiled.
    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self::empty()
    }
}

fn add_line(builder: &mut GitignoreBuilder, from: Option<PathBuf>, line: &str) {
    let line = line.trim_end_matches('\r');
    if let Err(e) = builder.add_line(from, line) {
        tracing::warn!("Skipping ignore pattern {line:?}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn matcher_with(content: &str) -> (TempDir, IgnoreMatcher) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(GITIGNORE_FILE), content).unwrap();
        let matcher = IgnoreMatcher::from_root(temp.path());
        (temp, matcher)
    }

    #[test]
    fn test_missing_gitignore_matches_nothing() {
        let temp = TempDir::new().unwrap();
        let matcher = IgnoreMatcher::from_root(temp.path());
        assert!(matcher.is_empty());
        assert!(!matcher.is_ignored("anything.txt", false));
    }

    #[test]
    fn test_directory_only_pattern() {
        let (_temp, matcher) = matcher_with("node_modules/\n");
        assert!(matcher.is_ignored("node_modules", true));
        assert!(matcher.is_ignored("node_modules/pkg/index.js", false));
        assert!(!matcher.is_ignored("node_modules", false));
        assert!(!matcher.is_ignored("src/index.js", false));
    }

    #[test]
    fn test_negation_and_globs() {
        let (_temp, matcher) = matcher_with("*.log\n!keep.log\n");
        assert!(matcher.is_ignored("debug.log", false));
        assert!(matcher.is_ignored("nested/deep/trace.log", false));
        assert!(!matcher.is_ignored("keep.log", false));
    }

    #[test]
    fn test_anchored_pattern() {
        let (_temp, matcher) = matcher_with("/dist\n");
        assert!(matcher.is_ignored("dist", true));
        assert!(!matcher.is_ignored("packages/dist", true));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let (_temp, matcher) = matcher_with("# build output\n\ntarget\r\n");
        assert!(matcher.is_ignored("target", true));
        assert_eq!(matcher.len(), 1);
    }

    #[test]
    fn test_extra_patterns_apply_after_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(GITIGNORE_FILE), "*.txt\n").unwrap();
        let matcher =
            IgnoreMatcher::build(temp.path(), true, &["!notes.txt".to_string()]);
        assert!(matcher.is_ignored("other.txt", false));
        assert!(!matcher.is_ignored("notes.txt", false));
    }

    #[test]
    fn test_gitignore_disabled() {
        let (temp, _) = matcher_with("*.rs\n");
        let matcher = IgnoreMatcher::build(temp.path(), false, &[]);
        assert!(!matcher.is_ignored("main.rs", false));
    }
}
