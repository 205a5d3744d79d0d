use codebatcher_batch::{
    BatchPipeline, BatchSplitter, SelectionReducer, collect_selected_files, combine_files,
    split_into_batches,
};
use codebatcher_core::{BatchConfig, Node};
use codebatcher_scan::scan_project;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("src/util/deep")).unwrap();
    fs::write(root.join("README.md"), "# Project\n\nIntro").unwrap();
    fs::write(root.join("src/main.rs"), "fn main() {\n    run();\n}").unwrap();
    fs::write(root.join("src/util/mod.rs"), "pub mod deep;").unwrap();
    fs::write(root.join("src/util/deep/leaf.rs"), "pub fn leaf() {}").unwrap();

    temp
}

fn find<'a>(nodes: &'a mut [Node], name: &str) -> &'a mut Node {
    nodes.iter_mut().find(|n| n.name() == name).unwrap()
}

fn file_names(files: &[Node]) -> Vec<String> {
    files.iter().map(|f| f.name().to_string()).collect()
}

#[test]
fn test_nested_file_at_depth_three() {
    let temp = create_project();
    let mut tree = scan_project(temp.path()).unwrap();

    {
        let src = find(&mut tree, "src");
        let Node::Folder { children, .. } = src else {
            panic!("src is a folder");
        };
        let util = find(children, "util");
        let Node::Folder { children, .. } = util else {
            panic!("util is a folder");
        };
        let deep = find(children, "deep");
        let Node::Folder { children, .. } = deep else {
            panic!("deep is a folder");
        };
        find(children, "leaf.rs").set_selected(true);
    }

    let files = collect_selected_files(&tree);
    assert_eq!(file_names(&files), vec!["leaf.rs"]);

    let text = combine_files(&files, temp.path());
    assert_eq!(
        text,
        "*** leaf.rs ***\n*** src/util/deep/leaf.rs ***\npub fn leaf() {}\n\n\
         ----------- End of File -----------\n\n"
    );
}

#[test]
fn test_folder_selection_equals_selecting_its_files() {
    let temp = create_project();
    let tree = scan_project(temp.path()).unwrap();

    let mut by_folder = tree.clone();
    find(&mut by_folder, "src").set_selected(true);

    let reducer = SelectionReducer::new();
    let src_only = vec![tree.iter().find(|n| n.name() == "src").unwrap().clone()];
    let all_src_files = reducer.collect_all_files(&src_only);

    assert_eq!(
        file_names(&reducer.flatten(&by_folder)),
        file_names(&all_src_files)
    );
    assert_eq!(
        file_names(&all_src_files),
        vec!["main.rs", "leaf.rs", "mod.rs"]
    );
}

#[test]
fn test_select_everything_is_idempotent() {
    let temp = create_project();
    let tree = scan_project(temp.path()).unwrap();
    let reducer = SelectionReducer::new();

    let once = reducer.select_all(&tree);
    let twice = reducer.select_all(&once);

    assert_eq!(once, twice);
    assert_eq!(reducer.flatten(&once), reducer.flatten(&twice));
    assert_eq!(reducer.flatten(&once).len(), 4);
}

#[test]
fn test_combine_split_round_trip() {
    let temp = create_project();
    let tree = SelectionReducer::new().select_all(&scan_project(temp.path()).unwrap());
    let files = collect_selected_files(&tree);
    let text = combine_files(&files, temp.path());

    let lines = text.split('\n').count();
    let batches = split_into_batches(&text, lines);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].content, text);

    let rejoined = split_into_batches(&text, 3)
        .into_iter()
        .map(|b| b.content)
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(rejoined, text);
}

#[test]
fn test_pipeline_summary_matches_splitter() {
    let temp = create_project();
    let mut tree = scan_project(temp.path()).unwrap();
    find(&mut tree, "README.md").set_selected(true);
    find(&mut tree, "src").set_selected(true);

    let pipeline = BatchPipeline::new(temp.path(), &BatchConfig::with_lines(5));
    let outcome = pipeline.run(&tree);
    let summary = outcome.summary();

    assert_eq!(summary.total_files, 4);
    assert_eq!(
        summary.total_batches,
        BatchSplitter::new(5).batch_count(outcome.content())
    );
    for (i, batch) in summary.batches.iter().enumerate() {
        assert_eq!(batch.batch_number, i + 1);
    }
    assert!(outcome.content().starts_with("*** README.md ***\n*** README.md ***\n"));
}

#[test]
fn test_pipeline_is_repeatable() {
    let temp = create_project();
    let tree = SelectionReducer::new().select_all(&scan_project(temp.path()).unwrap());
    let pipeline = BatchPipeline::new(temp.path(), &BatchConfig::default());

    let first = pipeline.run(&tree).summary();
    let second = pipeline.run(&tree).summary();
    assert_eq!(first, second);
}

#[test]
fn test_relative_root_paths() {
    let temp = create_project();
    let tree = SelectionReducer::new().select_all(&scan_project(temp.path()).unwrap());

    // Root given without canonicalization still yields project-relative paths.
    let root = temp.path().join("src").join("..");
    let text = combine_files(&collect_selected_files(&tree), Path::new(&root));
    assert!(text.contains("*** src/main.rs ***"));
}
