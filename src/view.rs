use crate::adapter::TreeAdapter;
use crate::layout::{LayoutConfig, MAX_LAYOUT_DEPTH};

/// Shallowest depth limit `shallower` will go to.
pub const MIN_VIEW_DEPTH: u16 = 1;

/// Oldest entries are dropped once history grows past this.
pub const HISTORY_LIMIT: usize = 200;

/// What part of a tree is on screen and how.
///
/// Tracks the current view root with back history, the runtime depth
/// limit, and whether labels show percentages.
#[derive(Debug, Clone)]
pub struct ViewState<N> {
    home: N,
    current: N,
    history: Vec<N>,
    max_depth: u16,
    percentage: bool,
}

impl<N: Copy + Eq> ViewState<N> {
    pub fn new(home: N, config: &LayoutConfig) -> Self {
        Self {
            home,
            current: home,
            history: Vec::new(),
            max_depth: config.depth_limit().max(MIN_VIEW_DEPTH),
            percentage: false,
        }
    }

    pub fn current_root(&self) -> N {
        self.current
    }

    /// Make `node` the view root. A leaf drills into its heaviest parent
    /// instead. Returns true if the view changed.
    pub fn drill_down<A: TreeAdapter<Node = N>>(&mut self, adapter: &A, node: N) -> bool {
        let target = if adapter.children(node).is_empty() {
            match heaviest_parent(adapter, node) {
                Some(parent) => parent,
                None => return false,
            }
        } else {
            node
        };
        if target == self.current {
            return false;
        }
        self.record(self.current);
        self.current = target;
        true
    }

    /// Return to the previous view root.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    /// Move the view root to the parent it weighs most under.
    pub fn up<A: TreeAdapter<Node = N>>(&mut self, adapter: &A) -> bool {
        match heaviest_parent(adapter, self.current) {
            Some(parent) => {
                self.record(self.current);
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Jump back to the tree root and forget history.
    pub fn home(&mut self) {
        self.history.clear();
        self.current = self.home;
    }

    /// Number of steps `back` can undo.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn max_depth(&self) -> u16 {
        self.max_depth
    }

    pub fn deeper(&mut self) {
        self.max_depth = self.max_depth.saturating_add(1).min(MAX_LAYOUT_DEPTH);
    }

    pub fn shallower(&mut self) {
        self.max_depth = self.max_depth.saturating_sub(1).max(MIN_VIEW_DEPTH);
    }

    pub fn percentage(&self) -> bool {
        self.percentage
    }

    pub fn toggle_percentage(&mut self) -> bool {
        self.percentage = !self.percentage;
        self.percentage
    }

    /// `base` with this view's depth limit applied.
    pub fn layout_config(&self, base: &LayoutConfig) -> LayoutConfig {
        LayoutConfig {
            max_depth: self.max_depth,
            ..base.clone()
        }
    }

    fn record(&mut self, node: N) {
        if self.history.last() == Some(&node) {
            return;
        }
        self.history.push(node);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}

/// The parent `node` has the largest value under; the first one on ties.
fn heaviest_parent<A: TreeAdapter>(adapter: &A, node: A::Node) -> Option<A::Node> {
    adapter
        .parents(node)
        .into_iter()
        .map(|parent| (parent, adapter.value(node, Some(parent))))
        .reduce(|best, next| if next.1.total_cmp(&best.1).is_gt() { next } else { best })
        .map(|(parent, _)| parent)
}
