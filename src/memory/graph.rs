use std::collections::{HashMap, HashSet};

use compact_str::CompactString;

use super::record::ObjectRecord;
use crate::error::BuildError;

/// Index into the object arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32);

impl ObjId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An object in the reference graph.
#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub address: u64,
    pub type_name: CompactString,
    pub name: Option<String>,
    pub value: Option<String>,
    pub module: Option<String>,
    pub size: u64,
    /// Own size plus an even share of every child's total.
    pub total_size: u64,
    /// Referenced objects, back edges removed.
    pub children: Vec<ObjId>,
    /// Every object whose `children` holds this one.
    pub parents: Vec<ObjId>,
}

impl MemoryObject {
    fn from_record(record: &ObjectRecord) -> Self {
        Self {
            address: record.address,
            type_name: CompactString::new(&record.type_name),
            name: record.name.clone(),
            value: record.value.clone(),
            module: record.module.clone(),
            size: record.size,
            total_size: 0,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    fn synthetic_root() -> Self {
        Self {
            address: 0,
            type_name: CompactString::new("<memory>"),
            name: None,
            value: None,
            module: None,
            size: 0,
            total_size: 0,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Object reference graph with a single root.
#[derive(Debug)]
pub struct MemoryGraph {
    objects: Vec<MemoryObject>,
    index: HashMap<u64, ObjId>,
    root: ObjId,
}

impl MemoryGraph {
    /// Build the graph from dump records.
    ///
    /// Objects are created first and references resolved against them,
    /// then a depth-first walk from every unreferenced object (and from
    /// whatever is left, which is only reachable through cycles) keeps
    /// tree, forward and cross edges and drops back edges. Totals that the
    /// dump did not provide are computed bottom-up.
    pub fn build(records: &[ObjectRecord]) -> Result<Self, BuildError> {
        let mut objects = Vec::with_capacity(records.len() + 1);
        let mut index = HashMap::with_capacity(records.len());
        let mut sources = Vec::with_capacity(records.len());
        for record in records {
            if index.contains_key(&record.address) {
                tracing::debug!("Duplicate object ignored: {:#x}", record.address);
                continue;
            }
            index.insert(record.address, ObjId(objects.len() as u32));
            objects.push(MemoryObject::from_record(record));
            sources.push(record);
        }
        if objects.is_empty() {
            return Err(BuildError::NoRows);
        }

        let mut unknown = 0usize;
        let mut refs: Vec<Vec<ObjId>> = Vec::with_capacity(sources.len());
        let mut referred = vec![false; sources.len()];
        for record in &sources {
            let mut seen = HashSet::new();
            let mut out = Vec::with_capacity(record.refs.len());
            for address in &record.refs {
                match index.get(address) {
                    Some(&id) => {
                        if seen.insert(id) {
                            referred[id.index()] = true;
                            out.push(id);
                        }
                    }
                    None => unknown += 1,
                }
            }
            refs.push(out);
        }
        if unknown > 0 {
            tracing::debug!("Dropped {} references to objects missing from the dump", unknown);
        }

        let mut walk = Walk {
            refs: &refs,
            state: vec![Visit::New; sources.len()],
            children: vec![Vec::new(); sources.len()],
            finished: Vec::with_capacity(sources.len()),
            back_edges: 0,
        };
        let mut roots = Vec::new();
        for (i, &has_referrer) in referred.iter().enumerate() {
            if !has_referrer {
                roots.push(ObjId(i as u32));
                walk.visit(ObjId(i as u32));
            }
        }
        for i in 0..sources.len() {
            if walk.state[i] == Visit::New {
                tracing::debug!("Object {:#x} only reachable through a cycle, used as root", sources[i].address);
                roots.push(ObjId(i as u32));
                walk.visit(ObjId(i as u32));
            }
        }
        if walk.back_edges > 0 {
            tracing::debug!("Dropped {} back edges to break reference cycles", walk.back_edges);
        }

        for (i, children) in walk.children.into_iter().enumerate() {
            for &child in &children {
                objects[child.index()].parents.push(ObjId(i as u32));
            }
            objects[i].children = children;
        }

        for &id in &walk.finished {
            let total = match sources[id.index()].total_size {
                Some(total) => total,
                None => {
                    let node = &objects[id.index()];
                    node.size
                        + node
                            .children
                            .iter()
                            .map(|&c| share(&objects[c.index()]))
                            .sum::<u64>()
                }
            };
            objects[id.index()].total_size = total;
        }

        let root = if roots.len() == 1 {
            roots[0]
        } else {
            let id = ObjId(objects.len() as u32);
            let mut group = MemoryObject::synthetic_root();
            group.total_size = roots.iter().map(|&r| objects[r.index()].total_size).sum();
            for &r in &roots {
                objects[r.index()].parents.push(id);
            }
            group.children = roots;
            objects.push(group);
            id
        };

        let graph = MemoryGraph { objects, index, root };
        tracing::info!(
            "Memory graph built: {} objects, {} roots, {} bytes total",
            sources.len(),
            graph.roots().len(),
            graph.get(root).total_size
        );
        Ok(graph)
    }

    pub fn root(&self) -> ObjId {
        self.root
    }

    /// Top-level objects: the children of the synthetic root, or the
    /// single real root.
    pub fn roots(&self) -> &[ObjId] {
        if self.is_synthetic(self.root) {
            &self.get(self.root).children
        } else {
            std::slice::from_ref(&self.root)
        }
    }

    pub fn is_synthetic(&self, id: ObjId) -> bool {
        id == self.root && self.index.len() < self.objects.len()
    }

    pub fn get(&self, id: ObjId) -> &MemoryObject {
        &self.objects[id.index()]
    }

    pub fn lookup(&self, address: u64) -> Option<ObjId> {
        self.index.get(&address).copied()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjId, &MemoryObject)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjId(i as u32), o))
    }
}

/// The part of an object's total attributed to each of its parents.
fn share(object: &MemoryObject) -> u64 {
    object.total_size / object.parents.len().max(1) as u64
}

struct Walk<'a> {
    refs: &'a [Vec<ObjId>],
    state: Vec<Visit>,
    children: Vec<Vec<ObjId>>,
    /// Post-order; every kept child precedes its parents.
    finished: Vec<ObjId>,
    back_edges: usize,
}

impl Walk<'_> {
    fn visit(&mut self, start: ObjId) {
        self.state[start.index()] = Visit::Active;
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (id, next) = *top;
            match self.refs[id.index()].get(next) {
                Some(&child) => {
                    top.1 += 1;
                    match self.state[child.index()] {
                        Visit::Active => self.back_edges += 1,
                        Visit::Done => self.children[id.index()].push(child),
                        Visit::New => {
                            self.children[id.index()].push(child);
                            self.state[child.index()] = Visit::Active;
                            stack.push((child, 0));
                        }
                    }
                }
                None => {
                    self.state[id.index()] = Visit::Done;
                    self.finished.push(id);
                    stack.pop();
                }
            }
        }
    }
}
