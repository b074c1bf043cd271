//! Directory trees built from a scan.

pub mod adapter;
pub mod aggregate;
pub mod arena;
pub mod extensions;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use self::adapter::FileTreeAdapter;
use self::arena::{FileNode, FileTree, NodeId};
use crate::scanner::types::RawFileEntry;

/// Build a [`FileTree`] rooted at `root` from a flat scan.
///
/// Entries outside `root` are ignored. Missing intermediate directories are
/// created, so entries may arrive in any order.
pub fn build_tree(root: &Path, entries: &[RawFileEntry]) -> FileTree {
    let mut tree = FileTree::new(root);
    let mut dirs: HashMap<PathBuf, NodeId> = HashMap::new();
    dirs.insert(root.to_path_buf(), tree.root);

    let mut outside = 0usize;
    for entry in entries.iter().filter(|e| e.is_dir) {
        if !entry.path.starts_with(root) {
            outside += 1;
            continue;
        }
        ensure_dir(&mut tree, &mut dirs, root, &entry.path);
    }

    for entry in entries.iter().filter(|e| !e.is_dir) {
        let Some(parent_path) = entry.path.parent().filter(|p| p.starts_with(root)) else {
            outside += 1;
            continue;
        };
        let parent = ensure_dir(&mut tree, &mut dirs, root, parent_path);

        let ext = entry
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext_id = tree.intern_extension(&ext);
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        tree.add_child(parent, FileNode::new(&name, entry.size, false, ext_id));
    }
    if outside > 0 {
        tracing::debug!("Ignored {} entries outside {}", outside, root.display());
    }

    aggregate::aggregate_sizes(&mut tree);
    aggregate::sort_children_by_size(&mut tree);

    tracing::info!(
        "Tree built: {} nodes, {} direct children of root, {} bytes",
        tree.len(),
        tree.children(tree.root).count(),
        tree.get(tree.root).size
    );
    tree
}

/// Directory node for `path`, creating it and any missing ancestors below
/// `root`.
fn ensure_dir(tree: &mut FileTree, dirs: &mut HashMap<PathBuf, NodeId>, root: &Path, path: &Path) -> NodeId {
    if let Some(&id) = dirs.get(path) {
        return id;
    }

    let mut missing = Vec::new();
    let mut current = path;
    while !dirs.contains_key(current) && current != root {
        missing.push(current);
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    let mut parent = dirs.get(current).copied().unwrap_or(tree.root);
    for dir in missing.into_iter().rev() {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        parent = tree.add_child(parent, FileNode::new(&name, 0, true, 0));
        dirs.insert(dir.to_path_buf(), parent);
    }
    parent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_walkdir;
    use crate::scanner::walk::tests::Scratch;

    fn names(tree: &FileTree, id: NodeId) -> Vec<String> {
        tree.children(id).map(|c| tree.get(c).name.to_string()).collect()
    }

    #[test]
    fn builds_from_unordered_entries() {
        let entries = vec![
            RawFileEntry::file("/r/a/deep/x.rs", 30),
            RawFileEntry::file("/r/top.txt", 50),
            RawFileEntry::dir("/r/a"),
            RawFileEntry::file("/r/a/y.png", 5),
            RawFileEntry::dir("/r/empty"),
            RawFileEntry::file("/elsewhere/z", 99),
        ];
        let tree = build_tree(Path::new("/r"), &entries);

        assert_eq!(tree.get(tree.root).size, 85);
        assert_eq!(names(&tree, tree.root), vec!["top.txt", "a", "empty"]);

        let a = tree.children(tree.root).nth(1).unwrap();
        assert_eq!(tree.get(a).size, 35);
        assert_eq!(names(&tree, a), vec!["deep", "y.png"]);
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn builds_from_a_real_scan() {
        let scratch = Scratch::new("tree");
        scratch.file("one.bin", 100);
        scratch.file("nested/two.txt", 40);
        scratch.file("nested/three.txt", 60);

        let entries = scan_walkdir(&scratch.0, None).unwrap();
        let tree = build_tree(&scratch.0, &entries);
        assert_eq!(tree.get(tree.root).size, 200);
        assert_eq!(names(&tree, tree.root), vec!["nested", "one.bin"]);
    }
}
