//! Spatial index produced by a layout pass.
//!
//! The hot-map mirrors the visual nesting: every placed box holds the boxes
//! placed inside it. It is built once per pass and only read afterwards, so
//! a consumer can keep answering hover/selection queries against the last
//! completed layout while the next one is computed.

use crate::layout::Rect;

/// One placed box and the boxes placed inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct HotEntry<N> {
    pub node: N,
    pub rect: Rect,
    /// Nesting depth; the layout root is 0.
    pub depth: u16,
    pub children: Vec<HotEntry<N>>,
}

impl<N> HotEntry<N> {
    pub(crate) fn new(node: N, rect: Rect, depth: u16) -> Self {
        Self {
            node,
            rect,
            depth,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Result of a point query.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<N> {
    pub node: N,
    pub rect: Rect,
    pub depth: u16,
    /// Enclosing nodes, outermost first. Does not include `node`.
    pub ancestors: Vec<N>,
}

/// The placed boxes of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HotMap<N> {
    roots: Vec<HotEntry<N>>,
    max_depth: u16,
    truncated: Option<u16>,
}

impl<N: Copy + PartialEq> HotMap<N> {
    pub(crate) fn new(roots: Vec<HotEntry<N>>, max_depth: u16, truncated: Option<u16>) -> Self {
        Self {
            roots,
            max_depth,
            truncated,
        }
    }

    pub(crate) fn empty(max_depth: u16) -> Self {
        Self::new(Vec::new(), max_depth, None)
    }

    pub fn roots(&self) -> &[HotEntry<N>] {
        &self.roots
    }

    /// Depth limit the map was laid out with.
    pub fn max_depth(&self) -> u16 {
        self.max_depth
    }

    /// Deepest level whose children were withheld by the depth limit, if any.
    /// `Some` means a deeper view would show more boxes.
    pub fn truncated_depth(&self) -> Option<u16> {
        self.truncated
    }

    /// Depth-first, pre-order walk over every entry.
    pub fn iter(&self) -> Iter<'_, N> {
        Iter {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Innermost box containing the point.
    ///
    /// Returns `None` outside every root box. Padding, header and empty
    /// space belong to the enclosing node.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Hit<N>> {
        let mut level = self.roots.as_slice();
        let mut found: Option<&HotEntry<N>> = None;
        let mut ancestors = Vec::new();

        while let Some(entry) = level.iter().find(|e| e.rect.contains(x, y)) {
            if let Some(outer) = found {
                ancestors.push(outer.node);
            }
            found = Some(entry);
            level = &entry.children;
        }

        found.map(|entry| Hit {
            node: entry.node,
            rect: entry.rect,
            depth: entry.depth,
            ancestors,
        })
    }

    /// First placement of `node` in pre-order.
    pub fn find(&self, node: N) -> Option<&HotEntry<N>> {
        self.iter().find(|e| e.node == node)
    }

    /// Entries from a root down to the first placement of `node`, inclusive.
    pub fn path_to(&self, node: N) -> Option<Vec<&HotEntry<N>>> {
        let mut path = Vec::new();
        for root in &self.roots {
            if search(root, node, &mut path) {
                return Some(path);
            }
        }
        None
    }

    /// Entry enclosing the first placement of `node`.
    pub fn parent_of(&self, node: N) -> Option<&HotEntry<N>> {
        let path = self.path_to(node)?;
        path.len().checked_sub(2).map(|i| path[i])
    }

    pub fn first_child(&self, node: N) -> Option<&HotEntry<N>> {
        self.find(node)?.children.first()
    }

    pub fn last_child(&self, node: N) -> Option<&HotEntry<N>> {
        self.find(node)?.children.last()
    }

    /// Next entry after `node` among its siblings.
    pub fn next_sibling(&self, node: N) -> Option<&HotEntry<N>> {
        let (siblings, index) = self.siblings_of(node)?;
        siblings.get(index + 1)
    }

    /// Previous entry before `node` among its siblings.
    pub fn prev_sibling(&self, node: N) -> Option<&HotEntry<N>> {
        let (siblings, index) = self.siblings_of(node)?;
        index.checked_sub(1).map(|i| &siblings[i])
    }

    fn siblings_of(&self, node: N) -> Option<(&[HotEntry<N>], usize)> {
        let siblings = match self.parent_of(node) {
            Some(parent) => parent.children.as_slice(),
            None => self.roots.as_slice(),
        };
        let index = siblings.iter().position(|e| e.node == node)?;
        Some((siblings, index))
    }
}

fn search<'a, N: Copy + PartialEq>(
    entry: &'a HotEntry<N>,
    node: N,
    path: &mut Vec<&'a HotEntry<N>>,
) -> bool {
    path.push(entry);
    if entry.node == node {
        return true;
    }
    for child in &entry.children {
        if search(child, node, path) {
            return true;
        }
    }
    path.pop();
    false
}

/// Pre-order iterator over a [`HotMap`].
#[derive(Debug)]
pub struct Iter<'a, N> {
    stack: Vec<&'a HotEntry<N>>,
}

impl<'a, N> Iterator for Iter<'a, N> {
    type Item = &'a HotEntry<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        self.stack.extend(entry.children.iter().rev());
        Some(entry)
    }
}
