use std::path::PathBuf;

use compact_str::CompactString;

use super::extensions::{categorize_extension, FileCategory};

/// Index into the arena `Vec<FileNode>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single file or directory, linked to its siblings.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// Name only, not the full path
    pub name: CompactString,
    /// Size in bytes. For directories: sum of children after aggregation.
    pub size: u64,
    pub is_dir: bool,
    /// Index into [`FileTree::extensions`] (0 = none)
    pub extension_id: u16,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Root = 0
    pub depth: u16,
}

impl FileNode {
    pub fn new(name: &str, size: u64, is_dir: bool, extension_id: u16) -> Self {
        Self {
            name: CompactString::new(name),
            size,
            is_dir,
            extension_id,
            parent: None,
            first_child: None,
            next_sibling: None,
            depth: 0,
        }
    }
}

/// Directory tree stored as a flat arena. Children always have higher
/// indices than their parent.
#[derive(Debug)]
pub struct FileTree {
    pub nodes: Vec<FileNode>,
    pub root: NodeId,
    /// Full path of the root on disk.
    pub root_path: PathBuf,
    /// Deduplicated, lowercased extensions; index 0 is the empty extension.
    pub extensions: Vec<CompactString>,
}

impl FileTree {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        let name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root_path.to_string_lossy().to_string());

        FileTree {
            nodes: vec![FileNode::new(&name, 0, true, 0)],
            root: NodeId(0),
            root_path,
            extensions: vec![CompactString::new("")],
        }
    }

    /// Add `node` under `parent`, at the front of its child list.
    pub fn add_child(&mut self, parent: NodeId, mut node: FileNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.depth = self.nodes[parent.index()].depth + 1;
        node.next_sibling = self.nodes[parent.index()].first_child;
        self.nodes[parent.index()].first_child = Some(id);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &FileNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    /// Get or create the id of an extension, case-insensitively.
    pub fn intern_extension(&mut self, ext: &str) -> u16 {
        let lower = ext.to_ascii_lowercase();
        match self.extensions.iter().position(|e| e.as_str() == lower) {
            Some(pos) => pos as u16,
            None => {
                self.extensions.push(CompactString::new(&lower));
                (self.extensions.len() - 1) as u16
            }
        }
    }

    pub fn extension(&self, id: NodeId) -> &str {
        &self.extensions[self.get(id).extension_id as usize]
    }

    pub fn category(&self, id: NodeId) -> FileCategory {
        categorize_extension(self.extension(id))
    }

    /// Full path of a node, rebuilt by walking up to the root.
    pub fn path_of(&self, id: NodeId) -> PathBuf {
        let mut parts = Vec::new();
        let mut current = id;
        while let Some(parent) = self.get(current).parent {
            parts.push(self.get(current).name.as_str());
            current = parent;
        }
        let mut path = self.root_path.clone();
        path.extend(parts.iter().rev());
        path
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a FileTree,
    current: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}
