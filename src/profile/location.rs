//! Grouping of profile rows by directory and source file.

use std::collections::HashMap;
use std::path::Path;

use compact_str::CompactString;

use super::calltree::{NodeId, NodeKind, ProfileTree};

impl ProfileTree {
    /// Derive the location tree from the rows and return its root.
    ///
    /// One location per directory and one per (directory, file); rows hang
    /// under their file. Each directory links to its nearest ancestor
    /// directory that also holds rows, or else to the root.
    pub(super) fn build_locations(&mut self) -> NodeId {
        let root = self.new_group(NodeKind::Location, "/", "PYTHONPATH", "");
        let rows: Vec<NodeId> = self.rows().collect();

        let mut directories: HashMap<CompactString, NodeId> = HashMap::new();
        let mut dir_order: Vec<CompactString> = Vec::new();
        let mut files: HashMap<(CompactString, CompactString), NodeId> = HashMap::new();

        for row in rows {
            let directory = self.get(row).directory.clone();
            let mut filename = self.get(row).filename.clone();
            if filename == "~" {
                filename = CompactString::new("<built-in>");
            }

            let current = match directories.get(&directory) {
                Some(&id) => id,
                None => {
                    let id = if directory.is_empty() {
                        root
                    } else {
                        self.new_group(NodeKind::Location, &directory, "", "")
                    };
                    directories.insert(directory.clone(), id);
                    dir_order.push(directory.clone());
                    id
                }
            };

            let file_key = (directory.clone(), filename.clone());
            let file = match files.get(&file_key) {
                Some(&id) => id,
                None => {
                    let id = self.new_group(NodeKind::Location, &directory, &filename, "");
                    files.insert(file_key, id);
                    self.nodes[current.index()].children.push(id);
                    id
                }
            };
            self.nodes[file.index()].children.push(row);
        }

        for directory in &dir_order {
            let id = directories[directory];
            if id == root {
                continue;
            }
            let parent = Path::new(directory.as_str())
                .ancestors()
                .skip(1)
                .find_map(|p| directories.get(&*p.to_string_lossy()).copied())
                .unwrap_or(root);
            self.nodes[parent.index()].children.push(id);
        }

        root
    }
}
