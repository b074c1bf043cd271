use std::collections::{HashMap, HashSet};
use std::path::Path;

use compact_str::CompactString;

use super::stats::{CallerStats, FuncKey, StatsRecord};
use super::ProfileView;
use crate::error::BuildError;

/// Index into the profile arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node in the profile arena stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// One profiled function.
    Row,
    /// Synthetic umbrella over several call-tree roots.
    Group,
    /// A directory or source file in the location tree.
    Location,
}

/// A function row or a group in the profile arena.
///
/// Groups carry totals summed from their children during finalize.
#[derive(Debug, Clone)]
pub struct ProfileNode {
    pub kind: NodeKind,
    pub directory: CompactString,
    pub filename: CompactString,
    pub name: CompactString,
    pub lineno: u32,
    pub calls: u64,
    pub recursive: u64,
    pub local: f64,
    pub local_per: f64,
    pub cumulative: f64,
    pub cumulative_per: f64,
    pub children: Vec<NodeId>,
    pub parents: Vec<NodeId>,
    /// Rows folded into a location's own (empty) space, i.e. module-level code.
    pub local_children: Vec<NodeId>,
    /// Per-caller edge counters (rows only).
    pub callers: Vec<(NodeId, CallerStats)>,
}

impl ProfileNode {
    fn group(kind: NodeKind, directory: &str, filename: &str, name: &str) -> Self {
        Self {
            kind,
            directory: CompactString::new(directory),
            filename: CompactString::new(filename),
            name: CompactString::new(name),
            lineno: 0,
            calls: 0,
            recursive: 0,
            local: 0.0,
            local_per: 0.0,
            cumulative: 0.0,
            cumulative_per: 0.0,
            children: Vec::new(),
            parents: Vec::new(),
            local_children: Vec::new(),
            callers: Vec::new(),
        }
    }

    fn row(record: &StatsRecord) -> Self {
        let path = Path::new(&record.key.file);
        let directory = path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| record.key.file.clone());

        Self {
            lineno: record.key.line,
            calls: record.calls,
            recursive: record.recursive,
            local: record.local,
            local_per: record.local / nonzero(record.recursive),
            cumulative: record.cumulative,
            cumulative_per: record.cumulative / nonzero(record.calls),
            ..Self::group(NodeKind::Row, &directory, &filename, &record.key.name)
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind != NodeKind::Row
    }

    /// Which view this node belongs to.
    pub fn view(&self) -> ProfileView {
        match self.kind {
            NodeKind::Row | NodeKind::Group => ProfileView::Calls,
            NodeKind::Location => ProfileView::Files,
        }
    }

    /// Counters of the edge from `caller` into this row.
    pub fn caller_edge(&self, caller: NodeId) -> Option<&CallerStats> {
        self.callers
            .iter()
            .find(|(id, _)| *id == caller)
            .map(|(_, stats)| stats)
    }
}

fn nonzero(n: u64) -> f64 {
    if n == 0 {
        1e-14
    } else {
        n as f64
    }
}

/// Call tree and location tree over one set of profiler records.
#[derive(Debug)]
pub struct ProfileTree {
    pub(super) nodes: Vec<ProfileNode>,
    index: HashMap<FuncKey, NodeId>,
    calls_root: NodeId,
    pub(super) files_root: NodeId,
}

impl ProfileTree {
    /// Build both trees from raw records.
    ///
    /// Rows are created first, then caller links are woven in, a root is
    /// picked, the location tree is derived, and finally group totals are
    /// computed bottom-up.
    pub fn build(records: &[StatsRecord]) -> Result<Self, BuildError> {
        let mut tree = ProfileTree {
            nodes: Vec::with_capacity(records.len() + 16),
            index: HashMap::with_capacity(records.len()),
            calls_root: NodeId(0),
            files_root: NodeId(0),
        };

        let mut sources = Vec::with_capacity(records.len());
        for record in records {
            if record.is_null() {
                tracing::debug!("Null row: {:?}", record.key);
                continue;
            }
            if tree.index.contains_key(&record.key) {
                tracing::debug!("Duplicate row ignored: {:?}", record.key);
                continue;
            }
            let id = tree.push(ProfileNode::row(record));
            tree.index.insert(record.key.clone(), id);
            sources.push((id, record));
        }
        if sources.is_empty() {
            return Err(BuildError::NoRows);
        }

        for (id, record) in &sources {
            tree.weave(*id, record);
        }
        tree.calls_root = tree.find_root();
        tree.files_root = tree.build_locations();

        let mut done = HashSet::new();
        tree.finalize(tree.calls_root, &mut done);
        tree.finalize(tree.files_root, &mut done);

        tracing::info!(
            "Profile built: {} rows, {} nodes total, {:.3}s cumulative at root",
            sources.len(),
            tree.nodes.len(),
            tree.get(tree.calls_root).cumulative
        );

        Ok(tree)
    }

    pub(super) fn push(&mut self, node: ProfileNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(super) fn new_group(&mut self, kind: NodeKind, directory: &str, filename: &str, name: &str) -> NodeId {
        self.push(ProfileNode::group(kind, directory, filename, name))
    }

    fn weave(&mut self, id: NodeId, record: &StatsRecord) {
        for caller in &record.callers {
            let Some(&parent) = self.index.get(&caller.key) else {
                continue;
            };
            self.nodes[id.index()].parents.push(parent);
            self.nodes[id.index()].callers.push((parent, caller.stats));
            self.nodes[parent.index()].children.push(id);
        }
    }

    /// Pick the call-tree root.
    ///
    /// Heuristic: the row with the largest cumulative time, plus every row
    /// nobody calls. More than one candidate gets wrapped in a synthetic
    /// `<profiling run>` group. Threaded programs and disconnected cycles
    /// are not traced back to their true roots.
    fn find_root(&mut self) -> NodeId {
        let rows: Vec<NodeId> = (0..self.nodes.len() as u32).map(NodeId).collect();
        let mut best = rows[0];
        for &id in &rows[1..] {
            if self.get(id).cumulative >= self.get(best).cumulative {
                best = id;
            }
        }

        let mut roots = vec![best];
        for &id in &rows {
            if self.get(id).parents.is_empty() && id != best {
                tracing::debug!("Found node root: {:?}", self.get(id).name);
                roots.push(id);
            }
        }
        if roots.len() == 1 {
            return best;
        }

        let group = self.new_group(NodeKind::Group, "*", "*", "<profiling run>");
        self.nodes[group.index()].children = roots;
        group
    }

    /// Compute group totals bottom-up and record groups as their
    /// children's parents. Rows named `<module>` under a location become
    /// that location's local children.
    fn finalize(&mut self, id: NodeId, done: &mut HashSet<NodeId>) {
        if !self.get(id).is_group() || !done.insert(id) {
            return;
        }

        if self.get(id).kind == NodeKind::Location {
            let (local, real): (Vec<NodeId>, Vec<NodeId>) = self
                .get(id)
                .children
                .iter()
                .copied()
                .partition(|&c| !self.get(c).is_group() && self.get(c).name == "<module>");
            let node = &mut self.nodes[id.index()];
            node.children = real;
            node.local_children.extend(local);
        }

        let children = self.get(id).children.clone();
        for &child in &children {
            self.finalize(child, done);
            self.nodes[child.index()].parents.push(id);
        }

        let local_only = self.get(id).kind == NodeKind::Location;
        let mut recursive = 0;
        let mut cumulative = 0.0;
        for &child in &children {
            let c = self.get(child);
            if c.is_group() || !local_only {
                recursive += c.recursive;
                cumulative += c.cumulative;
            } else {
                recursive += c.calls;
                cumulative += c.local;
            }
        }

        let (mut local, mut calls) = (0.0, 0);
        for &child in &self.get(id).local_children {
            local += self.get(child).local;
            calls += self.get(child).calls;
        }

        let node = &mut self.nodes[id.index()];
        node.recursive = recursive;
        node.cumulative = cumulative + local;
        node.cumulative_per = if recursive > 0 {
            node.cumulative / recursive as f64
        } else {
            0.0
        };
        node.local = local;
        node.calls = calls;
        node.local_per = if calls > 0 { local / calls as f64 } else { 0.0 };
    }

    pub fn get(&self, id: NodeId) -> &ProfileNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root node of the given view.
    pub fn root(&self, view: ProfileView) -> NodeId {
        match view {
            ProfileView::Calls => self.calls_root,
            ProfileView::Files => self.files_root,
        }
    }

    pub fn lookup(&self, key: &FuncKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Cumulative time of the call-tree root; the base for percentages.
    pub fn total_time(&self) -> f64 {
        self.get(self.calls_root).cumulative
    }

    /// Every function row, in input order.
    pub fn rows(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Row)
            .map(|(i, _)| NodeId(i as u32))
    }

    /// All nodes reachable through `children`, each once.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.reachable(id, |n| &n.children)
    }

    /// All nodes reachable through `parents`, each once.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        self.reachable(id, |n| &n.parents)
    }

    fn reachable(&self, start: NodeId, next: impl Fn(&ProfileNode) -> &Vec<NodeId>) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = next(self.get(start)).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            stack.extend(next(self.get(id)).iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn key(name: &str) -> FuncKey {
        FuncKey::new("/proj/app.py", name.len() as u32, name)
    }

    fn record(name: &str, calls: u64, local: f64, cumulative: f64) -> StatsRecord {
        StatsRecord {
            key: key(name),
            calls,
            recursive: calls,
            local,
            cumulative,
            callers: Vec::new(),
        }
    }

    fn edge(cumulative: f64) -> CallerStats {
        CallerStats {
            calls: 1,
            recursive: 1,
            local: 0.0,
            cumulative,
        }
    }

    /// main → work → helper, main → helper, plus a disconnected `atexit`.
    pub(crate) fn sample_records() -> Vec<StatsRecord> {
        vec![
            record("main", 1, 1.0, 10.0),
            record("work", 1, 4.0, 6.0).called_by(key("main"), edge(6.0)),
            record("helper", 2, 3.0, 3.0)
                .called_by(key("work"), edge(2.0))
                .called_by(key("main"), edge(1.0)),
            record("atexit", 1, 0.5, 0.5),
            StatsRecord {
                key: FuncKey::new("~", 0, "<method 'append'>"),
                ..record("append", 3, 0.25, 0.25)
            }
            .called_by(key("helper"), edge(0.25)),
            StatsRecord {
                key: FuncKey::new("/proj/app.py", 1, "<module>"),
                ..record("module", 1, 0.75, 0.75)
            },
            record("unused", 0, 0.0, 0.0),
        ]
    }

    #[test]
    fn rows_are_woven_both_ways() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let main = tree.lookup(&key("main")).unwrap();
        let work = tree.lookup(&key("work")).unwrap();
        let helper = tree.lookup(&key("helper")).unwrap();

        assert_eq!(tree.get(main).children, vec![work, helper]);
        assert!(tree.get(helper).parents.contains(&work));
        assert!(tree.get(helper).parents.contains(&main));
        assert_eq!(tree.get(helper).caller_edge(work).unwrap().cumulative, 2.0);
        assert!(tree.lookup(&key("unused")).is_none());
    }

    #[test]
    fn per_call_values() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let helper = tree.get(tree.lookup(&key("helper")).unwrap());
        assert_eq!(helper.local_per, 1.5);
        assert_eq!(helper.cumulative_per, 1.5);
        assert_eq!(helper.directory, "/proj");
        assert_eq!(helper.filename, "app.py");
    }

    #[test]
    fn disconnected_roots_get_an_umbrella_group() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let root = tree.get(tree.root(ProfileView::Calls));
        assert_eq!(root.kind, NodeKind::Group);
        assert_eq!(root.name, "<profiling run>");
        // main (max cumulative), atexit and <module> have no callers.
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0], tree.lookup(&key("main")).unwrap());
        assert!((root.cumulative - 11.25).abs() < 1e-12);
        assert_eq!(tree.total_time(), root.cumulative);
    }

    #[test]
    fn single_root_is_used_directly() {
        let records = vec![
            record("main", 1, 1.0, 2.0),
            record("work", 1, 1.0, 1.0).called_by(key("main"), edge(1.0)),
        ];
        let tree = ProfileTree::build(&records).unwrap();
        assert_eq!(tree.root(ProfileView::Calls), tree.lookup(&key("main")).unwrap());
    }

    #[test]
    fn recursive_rows_still_get_a_root() {
        // a calls itself; the max-cumulative row is picked even though it
        // has a parent.
        let records = vec![record("a", 1, 1.0, 3.0).called_by(key("a"), edge(2.0))];
        let tree = ProfileTree::build(&records).unwrap();
        assert_eq!(tree.root(ProfileView::Calls), tree.lookup(&key("a")).unwrap());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            ProfileTree::build(&[record("zero", 0, 0.0, 0.0)]),
            Err(BuildError::NoRows)
        ));
    }

    #[test]
    fn descendants_and_ancestors_are_distinct() {
        let tree = ProfileTree::build(&sample_records()).unwrap();
        let main = tree.lookup(&key("main")).unwrap();
        let helper = tree.lookup(&key("helper")).unwrap();
        let below = tree.descendants(main);
        assert_eq!(below.len(), 3);
        assert_eq!(below.iter().filter(|&&id| id == helper).count(), 1);

        let above = tree.ancestors(helper);
        assert!(above.contains(&main));
        assert!(above.contains(&tree.root(ProfileView::Calls)));
    }
}
