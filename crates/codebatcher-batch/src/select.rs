//! Selection tree reduction.

use codebatcher_core::Node;

/// Flattens a selection tree into the ordered list of files to batch.
///
/// A selected folder selects every file beneath it regardless of the
/// children's own flags. An unselected folder contributes only the files that
/// are selected individually. The input tree is never modified.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionReducer;

impl SelectionReducer {
    /// Create a new reducer.
    pub fn new() -> Self {
        Self
    }

    /// Selected file nodes in depth-first tree order.
    ///
    /// Returned files carry `selected = true`.
    pub fn flatten(&self, tree: &[Node]) -> Vec<Node> {
        let mut files = Vec::new();
        collect(tree, false, &mut files);
        files
    }

    /// Copy of `tree` with every node selected.
    pub fn select_all(&self, tree: &[Node]) -> Vec<Node> {
        tree.iter().map(select_subtree).collect()
    }

    /// Every file node, ignoring selection flags.
    pub fn collect_all_files(&self, tree: &[Node]) -> Vec<Node> {
        let mut files = Vec::new();
        collect(tree, true, &mut files);
        files
    }
}

/// Shorthand for [`SelectionReducer::flatten`].
pub fn collect_selected_files(tree: &[Node]) -> Vec<Node> {
    SelectionReducer.flatten(tree)
}

fn collect(nodes: &[Node], inherited: bool, files: &mut Vec<Node>) {
    for node in nodes {
        let selected = inherited || node.is_selected();
        match node {
            Node::File { .. } => {
                if selected {
                    files.push(node.clone().with_selected(true));
                }
            }
            Node::Folder { children, .. } => collect(children, selected, files),
        }
    }
}

fn select_subtree(node: &Node) -> Node {
    match node {
        Node::File { name, path, .. } => Node::File {
            name: name.clone(),
            path: path.clone(),
            selected: true,
        },
        Node::Folder {
            name,
            path,
            children,
            ..
        } => Node::Folder {
            name: name.clone(),
            path: path.clone(),
            children: children.iter().map(select_subtree).collect(),
            selected: true,
        },
    }
}
