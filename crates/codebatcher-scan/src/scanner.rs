//! JWalk-based filtered tree scanner.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use compact_str::CompactString;
use jwalk::{DirEntry, Parallelism, WalkDir};

use codebatcher_core::{Node, ScanConfig, ScanError, ScanTree, TreeStats};

use crate::matcher::IgnoreMatcher;

/// Scanner producing the filtered, name-sorted project tree.
///
/// Traversal is serial. Excluded entries are dropped while their parent is
/// being read, so an ignored directory is never opened.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeScanner;

impl TreeScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Perform a scan of the configured root.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanTree, ScanError> {
        let start = Instant::now();

        if config.root.as_os_str().is_empty() {
            return Err(ScanError::InvalidConfig {
                message: "Root path cannot be empty".to_string(),
            });
        }

        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        tracing::info!("Scanning project directory: {}", root_path.display());

        let matcher = IgnoreMatcher::for_config(config, &root_path);
        let excluded = Arc::new(AtomicU64::new(0));

        let mut entries = self.collect_entries(config, &root_path, matcher, &excluded)?;

        let mut stats = TreeStats::new();
        let tree = self.build_children(&root_path, 1, &mut entries, &mut stats);
        stats.excluded_entries = excluded.load(Ordering::Relaxed);

        tracing::info!(
            "Scan complete: found {} top-level nodes ({} files, {} folders, {} excluded)",
            tree.len(),
            stats.total_files,
            stats.total_folders,
            stats.excluded_entries
        );

        Ok(ScanTree::new(
            root_path,
            tree,
            config.clone(),
            stats,
            start.elapsed(),
        ))
    }

    /// Walk the root, grouping surviving entries by parent directory.
    fn collect_entries(
        &self,
        config: &ScanConfig,
        root_path: &Path,
        matcher: IgnoreMatcher,
        excluded: &Arc<AtomicU64>,
    ) -> Result<HashMap<PathBuf, Vec<EntryInfo>>, ScanError> {
        let filter = EntryFilter {
            config: config.clone(),
            root: root_path.to_path_buf(),
            matcher,
            excluded: Arc::clone(excluded),
        };

        let walker = WalkDir::new(root_path)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(config.follow_symlinks)
            .min_depth(0)
            .process_read_dir(move |depth, _dir, _state, children| {
                // The root itself arrives with no depth.
                if depth.is_none() {
                    return;
                }
                children.retain(|child| match child {
                    Ok(entry) => filter.keep(entry),
                    // Surfaced by the iterator below.
                    Err(_) => true,
                });
            });

        let mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>> = HashMap::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root_path.to_path_buf());
                    tracing::warn!("Directory read failed at {}: {err}", path.display());
                    return Err(ScanError::ReadDir {
                        path,
                        message: err.to_string(),
                    });
                }
            };

            // jwalk records a failed listing on the directory entry instead of
            // yielding an error, so the folder would otherwise look empty.
            if let Some(err) = &entry.read_children_error {
                let path = entry.path();
                tracing::warn!("Directory read failed at {}: {err}", path.display());
                return Err(ScanError::ReadDir {
                    path,
                    message: err.to_string(),
                });
            }

            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Folder
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                tracing::debug!("Skipping special file {}", entry.path().display());
                continue;
            };

            let path = entry.path();
            let Some(parent) = path.parent() else {
                continue;
            };

            entries_by_parent
                .entry(parent.to_path_buf())
                .or_default()
                .push(EntryInfo {
                    name: entry.file_name().to_string_lossy().as_ref().into(),
                    path: path.clone(),
                    kind,
                });
        }

        Ok(entries_by_parent)
    }

    /// Recursively build the children of `path`, pruning folders left empty.
    fn build_children(
        &self,
        path: &Path,
        depth: u32,
        entries_by_parent: &mut HashMap<PathBuf, Vec<EntryInfo>>,
        stats: &mut TreeStats,
    ) -> Vec<Node> {
        let children_entries = entries_by_parent.remove(path).unwrap_or_default();
        let mut nodes = Vec::with_capacity(children_entries.len());

        for entry in children_entries {
            match entry.kind {
                EntryKind::Folder => {
                    let children =
                        self.build_children(&entry.path, depth + 1, entries_by_parent, stats);
                    if children.is_empty() {
                        tracing::debug!("Pruning empty folder {}", entry.path.display());
                        stats.record_pruned();
                        continue;
                    }
                    stats.record_folder(depth);
                    nodes.push(Node::new_folder(entry.name, entry.path, children));
                }
                EntryKind::File => {
                    stats.record_file(depth);
                    nodes.push(Node::new_file(entry.name, entry.path));
                }
            }
        }

        nodes
    }
}

/// Scan `root` with the default rules and return the top-level nodes.
pub fn scan_project(root: impl Into<PathBuf>) -> Result<Vec<Node>, ScanError> {
    TreeScanner::new()
        .scan(&ScanConfig::new(root))
        .map(ScanTree::into_nodes)
}

/// Exclusion rules applied to each directory listing.
struct EntryFilter {
    config: ScanConfig,
    root: PathBuf,
    matcher: IgnoreMatcher,
    excluded: Arc<AtomicU64>,
}

impl EntryFilter {
    /// Static name rules first, then the ignore patterns.
    fn keep(&self, entry: &DirEntry<((), ())>) -> bool {
        let name = entry.file_name().to_string_lossy();

        if self.config.is_statically_excluded(&name) {
            tracing::debug!("Excluded by name: {name}");
            self.excluded.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let file_type = entry.file_type();
        if file_type.is_symlink() && !self.config.follow_symlinks {
            tracing::debug!("Not following symlink {}", entry.path().display());
            self.excluded.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&self.root).unwrap_or(&path);
        if self.matcher.is_ignored(relative, file_type.is_dir()) {
            tracing::debug!("Excluded by ignore pattern: {}", relative.display());
            self.excluded.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Folder,
}

/// Temporary struct for collecting entry information.
struct EntryInfo {
    name: CompactString,
    path: PathBuf,
    kind: EntryKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir(root.join("empty")).unwrap();
        fs::create_dir(root.join(".git")).unwrap();

        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::write(root.join("package-lock.json"), "{}").unwrap();
        fs::write(root.join(".env"), "SECRET=1").unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("src/nested/util.rs"), "pub fn f() {}").unwrap();

        temp
    }

    fn names(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(Node::name).collect()
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let tree = TreeScanner::new()
            .scan(&ScanConfig::new(temp.path()))
            .unwrap();

        assert_eq!(names(&tree.tree), vec!["README.md", "src"]);
        assert_eq!(tree.stats.total_files, 3);
        assert_eq!(tree.stats.total_folders, 2);
        assert_eq!(tree.stats.pruned_folders, 1);
        assert_eq!(tree.stats.max_depth, 3);
    }

    #[test]
    fn test_paths_are_absolute_and_reusable() {
        let temp = create_test_tree();
        let tree = TreeScanner::new()
            .scan(&ScanConfig::new(temp.path()))
            .unwrap();

        let readme = &tree.tree[0];
        assert!(readme.path().is_absolute());
        assert_eq!(fs::read_to_string(readme.path()).unwrap(), "# readme");
    }

    #[test]
    fn test_children_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        for name in ["zeta.txt", "alpha.txt", "mid.txt"] {
            fs::write(temp.path().join(name), "x").unwrap();
        }

        let nodes = scan_project(temp.path()).unwrap();
        assert_eq!(names(&nodes), vec!["alpha.txt", "mid.txt", "zeta.txt"]);
    }

    #[test]
    fn test_include_hidden() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .include_hidden(true)
            .build()
            .unwrap();

        let tree = TreeScanner::new().scan(&config).unwrap();
        // .git shows up, .env stays denylisted.
        assert_eq!(names(&tree.tree), vec![".git", "README.md", "src"]);
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = TreeScanner::new()
            .scan(&ScanConfig::new(temp.path().join("missing")))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_root_is_file() {
        let temp = create_test_tree();
        let err = TreeScanner::new()
            .scan(&ScanConfig::new(temp.path().join("README.md")))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped_by_default() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(
            temp.path().join("README.md"),
            temp.path().join("link.md"),
        )
        .unwrap();

        let nodes = scan_project(temp.path()).unwrap();
        assert!(!names(&nodes).contains(&"link.md"));
        assert!(names(&nodes).contains(&"README.md"));
    }
}
