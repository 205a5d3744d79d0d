//! File and folder node types.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Type of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Regular file.
    File,
    /// Directory.
    Folder,
}

/// A single file or folder in a scan or selection tree.
///
/// Serialised with an inline `type` tag so the wire shape is
/// `{ "type": "file" | "folder", "name", "path", "children", "selected" }`.
/// A file carries no children field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// Regular file.
    File {
        /// Base name of the entry.
        name: CompactString,
        /// Absolute path used for later reads.
        path: PathBuf,
        /// Caller-set selection flag.
        #[serde(default)]
        selected: bool,
    },
    /// Directory with its filtered children, in scan order.
    Folder {
        /// Base name of the entry.
        name: CompactString,
        /// Absolute path of the directory.
        path: PathBuf,
        /// Ordered child nodes.
        #[serde(default)]
        children: Vec<Node>,
        /// Caller-set selection flag. Selecting a folder selects every file below it.
        #[serde(default)]
        selected: bool,
    },
}

impl Node {
    /// Create an unselected file node.
    pub fn new_file(name: impl Into<CompactString>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
            selected: false,
        }
    }

    /// Create an unselected folder node.
    pub fn new_folder(
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        children: Vec<Node>,
    ) -> Self {
        Self::Folder {
            name: name.into(),
            path: path.into(),
            children,
            selected: false,
        }
    }

    /// Return this node with its selection flag set.
    pub fn with_selected(mut self, value: bool) -> Self {
        self.set_selected(value);
        self
    }

    /// Set the selection flag in place.
    pub fn set_selected(&mut self, value: bool) {
        match self {
            Node::File { selected, .. } | Node::Folder { selected, .. } => *selected = value,
        }
    }

    /// Entry base name.
    pub fn name(&self) -> &str {
        match self {
            Node::File { name, .. } | Node::Folder { name, .. } => name.as_str(),
        }
    }

    /// Filesystem path of the entry.
    pub fn path(&self) -> &Path {
        match self {
            Node::File { path, .. } | Node::Folder { path, .. } => path,
        }
    }

    /// Node kind without the payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File { .. } => NodeKind::File,
            Node::Folder { .. } => NodeKind::Folder,
        }
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Node::File { .. })
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder { .. })
    }

    /// Whether the caller selected this node.
    pub fn is_selected(&self) -> bool {
        match self {
            Node::File { selected, .. } | Node::Folder { selected, .. } => *selected,
        }
    }

    /// Direct children. Always empty for files.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::File { .. } => &[],
            Node::Folder { children, .. } => children,
        }
    }

    /// Number of files in this subtree (1 for a file).
    pub fn file_count(&self) -> u64 {
        match self {
            Node::File { .. } => 1,
            Node::Folder { children, .. } => children.iter().map(Node::file_count).sum(),
        }
    }

    /// Number of folders below this node, not counting itself.
    pub fn folder_count(&self) -> u64 {
        self.children()
            .iter()
            .filter(|c| c.is_folder())
            .map(|c| c.folder_count() + 1)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_node_creation() {
        let node = Node::new_file("main.rs", "/project/src/main.rs");
        assert!(node.is_file());
        assert!(!node.is_folder());
        assert!(!node.is_selected());
        assert_eq!(node.name(), "main.rs");
        assert!(node.children().is_empty());
        assert_eq!(node.file_count(), 1);
    }

    #[test]
    fn test_folder_counts() {
        let tree = Node::new_folder(
            "src",
            "/project/src",
            vec![
                Node::new_file("lib.rs", "/project/src/lib.rs"),
                Node::new_folder(
                    "bin",
                    "/project/src/bin",
                    vec![Node::new_file("cli.rs", "/project/src/bin/cli.rs")],
                ),
            ],
        );
        assert_eq!(tree.kind(), NodeKind::Folder);
        assert_eq!(tree.file_count(), 2);
        assert_eq!(tree.folder_count(), 1);
    }

    #[test]
    fn test_with_selected() {
        let node = Node::new_file("a.txt", "/a.txt").with_selected(true);
        assert!(node.is_selected());
    }
}
