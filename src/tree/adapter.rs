use super::arena::{FileTree, NodeId};
use crate::adapter::TreeAdapter;
use crate::colors::{self, AppColor};
use crate::format::format_size;

/// Presents a [`FileTree`] to the layout engine, weighted by bytes.
#[derive(Debug)]
pub struct FileTreeAdapter<'a> {
    tree: &'a FileTree,
}

impl<'a> FileTreeAdapter<'a> {
    pub fn new(tree: &'a FileTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'a FileTree {
        self.tree
    }
}

impl TreeAdapter for FileTreeAdapter<'_> {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.children(node).collect()
    }

    fn value(&self, node: NodeId, _parent: Option<NodeId>) -> f64 {
        self.tree.get(node).size as f64
    }

    fn label(&self, node: NodeId) -> String {
        let n = self.tree.get(node);
        format!("{} ({})", n.name, format_size(n.size))
    }

    fn parents(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.get(node).parent.into_iter().collect()
    }

    fn background_color(&self, node: NodeId, depth: u16) -> AppColor {
        let n = self.tree.get(node);
        if n.is_dir {
            colors::directory_color(&n.name, depth)
        } else {
            colors::category_color(self.tree.category(node))
        }
    }
}
