use super::arena::{FileTree, NodeId};

/// Set every directory's size to the sum of its children, bottom-up.
///
/// Relies on children having higher arena indices than their parent.
pub fn aggregate_sizes(tree: &mut FileTree) {
    for i in (0..tree.nodes.len()).rev() {
        if !tree.nodes[i].is_dir {
            continue;
        }
        let total: u64 = tree
            .children(NodeId(i as u32))
            .map(|c| tree.get(c).size)
            .sum();
        tree.nodes[i].size = total;
    }
}

/// Re-link every directory's children largest first; ties by name.
pub fn sort_children_by_size(tree: &mut FileTree) {
    for i in 0..tree.nodes.len() {
        if !tree.nodes[i].is_dir {
            continue;
        }
        let mut children: Vec<NodeId> = tree.children(NodeId(i as u32)).collect();
        if children.len() < 2 {
            continue;
        }
        children.sort_by(|&a, &b| {
            let (a, b) = (tree.get(a), tree.get(b));
            b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name))
        });

        tree.nodes[i].first_child = Some(children[0]);
        for pair in children.windows(2) {
            tree.nodes[pair[0].index()].next_sibling = Some(pair[1]);
        }
        if let Some(last) = children.last() {
            tree.nodes[last.index()].next_sibling = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::arena::FileNode;

    #[test]
    fn sizes_roll_up_and_sort() {
        let mut tree = FileTree::new("/r");
        let dir = tree.add_child(tree.root, FileNode::new("d", 0, true, 0));
        let small = tree.add_child(tree.root, FileNode::new("small", 5, false, 0));
        let x = tree.add_child(dir, FileNode::new("x", 7, false, 0));
        let y = tree.add_child(dir, FileNode::new("y", 7, false, 0));

        aggregate_sizes(&mut tree);
        assert_eq!(tree.get(dir).size, 14);
        assert_eq!(tree.get(tree.root).size, 19);

        sort_children_by_size(&mut tree);
        assert_eq!(tree.children(tree.root).collect::<Vec<_>>(), vec![dir, small]);
        assert_eq!(tree.children(dir).collect::<Vec<_>>(), vec![x, y]);
    }
}
