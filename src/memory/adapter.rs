use compact_str::CompactString;

use super::graph::{MemoryGraph, ObjId};
use crate::adapter::TreeAdapter;
use crate::colors::{AppColor, ColorMemo};
use crate::format;

/// Presents a [`MemoryGraph`] to the layout engine.
///
/// Objects shared by several referrers show up under each of them with an
/// even share of their total size.
#[derive(Debug)]
pub struct MemoryAdapter<'a> {
    graph: &'a MemoryGraph,
    colors: ColorMemo<CompactString>,
}

impl<'a> MemoryAdapter<'a> {
    pub fn new(graph: &'a MemoryGraph) -> Self {
        Self {
            graph,
            colors: ColorMemo::new(),
        }
    }

    pub fn graph(&self) -> &'a MemoryGraph {
        self.graph
    }

    /// Type objects are colored per type name, everything else per type.
    fn color_key(&self, node: ObjId) -> CompactString {
        let object = self.graph.get(node);
        match &object.name {
            Some(name) if object.type_name == "type" => CompactString::new(name),
            _ => object.type_name.clone(),
        }
    }
}

impl TreeAdapter for MemoryAdapter<'_> {
    type Node = ObjId;

    fn children(&self, node: ObjId) -> Vec<ObjId> {
        self.graph.get(node).children.clone()
    }

    fn value(&self, node: ObjId, _parent: Option<ObjId>) -> f64 {
        let object = self.graph.get(node);
        object.total_size as f64 / object.parents.len().max(1) as f64
    }

    fn label(&self, node: ObjId) -> String {
        let object = self.graph.get(node);
        let size = format::compact_size(object.total_size);
        [
            Some(object.type_name.as_str()),
            object.name.as_deref(),
            object.value.as_deref(),
            object.module.as_deref(),
            Some(size.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(":")
    }

    fn overall(&self, node: ObjId) -> f64 {
        self.graph.get(node).total_size as f64
    }

    fn empty(&self, node: ObjId) -> f64 {
        let object = self.graph.get(node);
        if object.total_size == 0 {
            return 0.0;
        }
        (object.size as f64 / object.total_size as f64).clamp(0.0, 1.0)
    }

    fn parents(&self, node: ObjId) -> Vec<ObjId> {
        self.graph.get(node).parents.clone()
    }

    fn background_color(&self, node: ObjId, _depth: u16) -> AppColor {
        self.colors.color_for(self.color_key(node))
    }
}
