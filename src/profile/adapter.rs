use super::calltree::{NodeId, NodeKind, ProfileTree};
use super::ProfileView;
use crate::adapter::TreeAdapter;
use crate::colors::{AppColor, ColorMemo};
use crate::format;

/// Presents one view of a [`ProfileTree`] to the layout engine.
#[derive(Debug)]
pub struct ProfileAdapter<'a> {
    tree: &'a ProfileTree,
    view: ProfileView,
    /// Base for percentage labels; `None` shows seconds.
    percent_of: Option<f64>,
    colors: ColorMemo<NodeId>,
}

impl<'a> ProfileAdapter<'a> {
    pub fn new(tree: &'a ProfileTree, view: ProfileView) -> Self {
        Self {
            tree,
            view,
            percent_of: None,
            colors: ColorMemo::new(),
        }
    }

    /// Show times as a share of the whole run instead of seconds.
    pub fn with_percentage(mut self, enabled: bool) -> Self {
        self.percent_of = enabled.then(|| self.tree.total_time()).filter(|&t| t > 0.0);
        self
    }

    pub fn view(&self) -> ProfileView {
        self.view
    }

    pub fn tree(&self) -> &'a ProfileTree {
        self.tree
    }

    /// Root node of this adapter's view.
    pub fn root(&self) -> NodeId {
        self.tree.root(self.view)
    }

    /// Source location for a source-preview pane, if the node is a function.
    pub fn source_location(&self, node: NodeId) -> Option<(String, u32)> {
        let n = self.tree.get(node);
        if n.is_group() {
            return None;
        }
        let path = if n.directory.is_empty() {
            n.filename.to_string()
        } else {
            format!("{}/{}", n.directory, n.filename)
        };
        Some((path, n.lineno))
    }
}

impl TreeAdapter for ProfileAdapter<'_> {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let n = self.tree.get(node);
        match self.view {
            ProfileView::Calls => n.children.clone(),
            ProfileView::Files if n.is_group() => n.children.clone(),
            ProfileView::Files => Vec::new(),
        }
    }

    fn value(&self, node: NodeId, parent: Option<NodeId>) -> f64 {
        let n = self.tree.get(node);
        let Some(parent) = parent else {
            return n.cumulative;
        };
        let p = self.tree.get(parent);
        match p.kind {
            NodeKind::Location if !n.is_group() => n.local,
            NodeKind::Location | NodeKind::Group => n.cumulative,
            NodeKind::Row => n.caller_edge(parent).map_or(0.0, |edge| edge.cumulative),
        }
    }

    fn label(&self, node: NodeId) -> String {
        let n = self.tree.get(node);
        if n.is_group() {
            return format!("{} / {}", n.filename, n.directory);
        }
        let time = match self.percent_of {
            Some(total) => format::percent(n.cumulative / total),
            None => format::seconds(n.cumulative),
        };
        format!("{}@{}:{} [{}]", n.name, n.filename, n.lineno, time)
    }

    fn overall(&self, node: NodeId) -> f64 {
        self.tree.get(node).cumulative
    }

    /// Local time is the part of a box not spent in callees.
    fn empty(&self, node: NodeId) -> f64 {
        let n = self.tree.get(node);
        if n.cumulative > 0.0 {
            (n.local / n.cumulative).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn parents(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .get(node)
            .parents
            .iter()
            .copied()
            .filter(|&p| self.tree.get(p).view() == self.view)
            .collect()
    }

    fn background_color(&self, node: NodeId, _depth: u16) -> AppColor {
        self.colors.color_for(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig, Rect};
    use crate::profile::calltree::tests::sample_records;
    use crate::profile::FuncKey;

    fn key(name: &str) -> FuncKey {
        FuncKey::new("/proj/app.py", name.len() as u32, name)
    }

    #[test]
    fn call_edges_weight_children() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let adapter = ProfileAdapter::new(&tree, ProfileView::Calls);
        let main = tree.lookup(&key("main")).unwrap();
        let work = tree.lookup(&key("work")).unwrap();
        let helper = tree.lookup(&key("helper")).unwrap();

        assert_eq!(adapter.value(helper, Some(work)), 2.0);
        assert_eq!(adapter.value(helper, Some(main)), 1.0);
        assert_eq!(adapter.value(helper, None), 3.0);
        assert_eq!(adapter.value(main, Some(adapter.root())), 10.0);
        assert!((adapter.empty(work) - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn parents_are_filtered_by_view() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let helper = tree.lookup(&key("helper")).unwrap();

        let calls = ProfileAdapter::new(&tree, ProfileView::Calls);
        assert_eq!(calls.parents(helper).len(), 2);

        let files = ProfileAdapter::new(&tree, ProfileView::Files);
        let parents = files.parents(helper);
        assert_eq!(parents.len(), 1);
        assert_eq!(tree.get(parents[0]).filename, "app.py");
        assert!(files.children(helper).is_empty());
    }

    #[test]
    fn labels_in_seconds_and_percent() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let work = tree.lookup(&key("work")).unwrap();

        let adapter = ProfileAdapter::new(&tree, ProfileView::Calls);
        assert_eq!(adapter.label(work), "work@app.py:4 [6.000s]");
        assert_eq!(adapter.label(adapter.root()), "* / *");

        let adapter = adapter.with_percentage(true);
        assert_eq!(adapter.label(work), "work@app.py:4 [53.33%]");
        assert_eq!(
            adapter.source_location(work),
            Some(("/proj/app.py".to_string(), 4))
        );
    }

    #[test]
    fn colors_are_stable_per_node() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let adapter = ProfileAdapter::new(&tree, ProfileView::Calls);
        let main = tree.lookup(&key("main")).unwrap();
        let work = tree.lookup(&key("work")).unwrap();
        let first = adapter.background_color(work, 3);
        assert_ne!(first, adapter.background_color(main, 3));
        assert_eq!(first, adapter.background_color(work, 7));
    }

    #[test]
    fn both_views_lay_out() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
        for view in [ProfileView::Calls, ProfileView::Files] {
            let adapter = ProfileAdapter::new(&tree, view);
            let map = compute_layout(&adapter, adapter.root(), bounds, &LayoutConfig::default()).unwrap();
            assert!(map.len() > 3, "{view:?} produced {} boxes", map.len());
            let (cx, cy) = map.roots()[0].children[0].rect.center();
            assert!(map.hit_test(cx, cy).is_some());
        }
    }
}
