//! The capability interface the layout engine uses to walk a tree.
//!
//! Any tree-shaped data source can be laid out by implementing
//! [`TreeAdapter`] over a cheap node handle (usually an arena index).
//! Call trees, location trees, object graphs and directory trees all go
//! through this one trait.

use std::fmt::Debug;

use crate::colors::{self, AppColor};

/// Uniform read-only view of one tree for the layout engine.
///
/// Within one layout pass, `children`, `value` and `empty` must return the
/// same answer for the same node.
pub trait TreeAdapter {
    /// Handle of a node in the adapted tree.
    type Node: Copy + Eq + Debug;

    /// Child nodes in a stable order. Empty for leaves.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Weight of `node`. With a `parent`, the weight `node` contributes under
    /// that specific parent; without, the node's own natural weight.
    ///
    /// Must be finite and non-negative.
    fn value(&self, node: Self::Node, parent: Option<Self::Node>) -> f64;

    /// Display string for the node's box.
    fn label(&self, node: Self::Node) -> String;

    /// Size of the node including its empty space.
    fn overall(&self, node: Self::Node) -> f64 {
        self.value(node, None)
    }

    /// Sum of the children's weights under `parent`.
    fn children_sum(&self, children: &[Self::Node], parent: Self::Node) -> f64 {
        children
            .iter()
            .map(|&child| self.value(child, Some(parent)))
            .sum()
    }

    /// Fraction of the node's area not covered by its children, in `0.0..=1.0`.
    fn empty(&self, node: Self::Node) -> f64 {
        let overall = self.overall(node);
        if overall > 0.0 {
            let used = self.children_sum(&self.children(node), node);
            ((overall - used) / overall).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Nodes owning `node`; empty for roots.
    fn parents(&self, _node: Self::Node) -> Vec<Self::Node> {
        Vec::new()
    }

    /// Fill color for the node's box at the given nesting depth.
    fn background_color(&self, _node: Self::Node, depth: u16) -> AppColor {
        colors::depth_color(depth)
    }
}

impl<A: TreeAdapter + ?Sized> TreeAdapter for &A {
    type Node = A::Node;

    fn children(&self, node: Self::Node) -> Vec<Self::Node> {
        (**self).children(node)
    }

    fn value(&self, node: Self::Node, parent: Option<Self::Node>) -> f64 {
        (**self).value(node, parent)
    }

    fn label(&self, node: Self::Node) -> String {
        (**self).label(node)
    }

    fn overall(&self, node: Self::Node) -> f64 {
        (**self).overall(node)
    }

    fn children_sum(&self, children: &[Self::Node], parent: Self::Node) -> f64 {
        (**self).children_sum(children, parent)
    }

    fn empty(&self, node: Self::Node) -> f64 {
        (**self).empty(node)
    }

    fn parents(&self, node: Self::Node) -> Vec<Self::Node> {
        (**self).parents(node)
    }

    fn background_color(&self, node: Self::Node, depth: u16) -> AppColor {
        (**self).background_color(node, depth)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::TestTree;
    use super::TreeAdapter;

    #[test]
    fn default_empty_is_unclaimed_share() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 100.0);
        tree.add_child(root, "a", 30.0);
        tree.add_child(root, "b", 20.0);
        assert!((tree.empty(root) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn default_empty_of_weightless_node_is_zero() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 0.0);
        assert_eq!(tree.empty(root), 0.0);
        assert!(tree.parents(root).is_empty());
    }

    #[test]
    fn value_honours_parent_specific_weight() {
        let mut tree = TestTree::default();
        let a = tree.add("a", 0.0);
        let b = tree.add("b", 0.0);
        let shared = tree.add("shared", 100.0);
        tree.link(a, shared, 40.0);
        tree.link(b, shared, 60.0);
        assert_eq!(tree.value(shared, Some(a)), 40.0);
        assert_eq!(tree.value(shared, Some(b)), 60.0);
        assert_eq!(tree.value(shared, None), 100.0);
    }
}
