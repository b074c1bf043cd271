use crate::adapter::TreeAdapter;
use crate::error::LayoutError;
use crate::layout::hotmap::{HotEntry, HotMap};
use crate::layout::{LayoutConfig, Rect, SplitStrategy};

/// Lay out `root` and its descendants inside `bounds`.
///
/// Every box placed, including zero-weight children, ends up in the
/// returned [`HotMap`]. A degenerate `bounds` yields an empty map. The pass
/// aborts on the first negative/non-finite weight or out-of-range empty
/// fraction reported by the adapter.
pub fn compute_layout<A: TreeAdapter>(
    adapter: &A,
    root: A::Node,
    bounds: Rect,
    config: &LayoutConfig,
) -> Result<HotMap<A::Node>, LayoutError> {
    if bounds.is_empty() || !bounds.w.is_finite() || !bounds.h.is_finite() {
        tracing::debug!(
            "Skipping layout of {:?}: degenerate bounds {:.1}x{:.1}",
            root,
            bounds.w,
            bounds.h
        );
        return Ok(HotMap::empty(config.depth_limit()));
    }

    let root_weight = adapter.value(root, None);
    check_weight(adapter, root, root_weight)?;

    let mut pass = Pass {
        adapter,
        config,
        path: Vec::new(),
        truncated: None,
        placed: 0,
    };
    let entry = pass.place(root, bounds, 0)?;

    tracing::debug!(
        "Laid out '{}' (weight={:.3}) in {:.0}x{:.0}: {} boxes",
        adapter.label(root),
        root_weight,
        bounds.w,
        bounds.h,
        pass.placed
    );

    Ok(HotMap::new(vec![entry], config.depth_limit(), pass.truncated))
}

/// State of one layout pass.
struct Pass<'a, A: TreeAdapter> {
    adapter: &'a A,
    config: &'a LayoutConfig,
    /// Ancestors of the node being subdivided, root first.
    path: Vec<A::Node>,
    truncated: Option<u16>,
    placed: usize,
}

impl<A: TreeAdapter> Pass<'_, A> {
    fn place(
        &mut self,
        node: A::Node,
        rect: Rect,
        depth: u16,
    ) -> Result<HotEntry<A::Node>, LayoutError> {
        self.placed += 1;
        let mut entry = HotEntry::new(node, rect, depth);
        if rect.is_empty() {
            return Ok(entry);
        }

        let mut content = rect.inset(self.config.padding, self.config.header);
        if content.is_empty() {
            return Ok(entry);
        }

        let children = self.adapter.children(node);
        if children.is_empty() {
            return Ok(entry);
        }
        if depth >= self.config.depth_limit() {
            self.truncated = Some(self.truncated.map_or(depth, |d| d.max(depth)));
            return Ok(entry);
        }

        let empty = self.adapter.empty(node);
        if !(0.0..=1.0).contains(&empty) {
            return Err(LayoutError::InvalidEmpty {
                label: self.adapter.label(node),
                fraction: empty,
            });
        }
        // The blank share sits under the header; children fill the bottom.
        let blank = content.h * empty;
        content.y += blank;
        content.h -= blank;
        if content.w <= self.config.min_side || content.h <= self.config.min_side {
            return Ok(entry);
        }

        self.path.push(node);
        let mut weighted = Vec::with_capacity(children.len());
        for child in children {
            if self.path.contains(&child) {
                tracing::debug!("Dropping {:?} under {:?}: already an ancestor", child, node);
                continue;
            }
            let weight = self.adapter.value(child, Some(node));
            check_weight(self.adapter, child, weight)?;
            weighted.push((child, weight));
        }
        // Stable: equal weights keep the adapter's order.
        weighted.sort_by(|a, b| a.1.total_cmp(&b.1));

        let placements = match self.config.strategy {
            SplitStrategy::Greedy => split_greedy(&weighted, content),
            SplitStrategy::Rows => split_rows(&weighted, content),
        };

        entry.children.reserve(placements.len());
        for (child, child_rect) in placements {
            let child_entry = self.place(child, child_rect, depth + 1)?;
            entry.children.push(child_entry);
        }
        self.path.pop();

        Ok(entry)
    }
}

fn check_weight<A: TreeAdapter>(adapter: &A, node: A::Node, weight: f64) -> Result<(), LayoutError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidWeight {
            label: adapter.label(node),
            weight,
        })
    }
}

/// Largest-first split along the longer side.
///
/// `weighted` must be sorted ascending. The result lists the largest child
/// first; zero-weight children get an empty rectangle where the placed
/// region ends.
pub(crate) fn split_greedy<N: Copy>(weighted: &[(N, f64)], bounds: Rect) -> Vec<(N, Rect)> {
    // prefix[i] = sum of the i smallest weights
    let mut prefix = Vec::with_capacity(weighted.len() + 1);
    let mut sum = 0.0;
    prefix.push(0.0);
    for &(_, weight) in weighted {
        sum += weight;
        prefix.push(sum);
    }

    let mut result = Vec::with_capacity(weighted.len());
    let mut rest = bounds;
    for (i, &(node, weight)) in weighted.iter().enumerate().rev() {
        let remaining = prefix[i + 1];
        if weight <= 0.0 || remaining <= 0.0 {
            result.push((node, Rect::new(rest.x, rest.y, 0.0, 0.0)));
            continue;
        }

        let fraction = (weight / remaining).min(1.0);
        if rest.w >= rest.h {
            let w = rest.w * fraction;
            result.push((node, Rect::new(rest.x, rest.y, w, rest.h)));
            rest.x += w;
            rest.w = (rest.w - w).max(0.0);
        } else {
            let h = rest.h * fraction;
            result.push((node, Rect::new(rest.x, rest.y, rest.w, h)));
            rest.y += h;
            rest.h = (rest.h - h).max(0.0);
        }
    }

    result
}

/// Row-based squarified split (Bruls, Huizing & van Wijk).
///
/// `weighted` must be sorted ascending. Rows run along the shorter side of
/// the remaining space and grow while the worst aspect ratio improves.
pub(crate) fn split_rows<N: Copy>(weighted: &[(N, f64)], bounds: Rect) -> Vec<(N, Rect)> {
    let total: f64 = weighted.iter().map(|&(_, w)| w).sum();
    let mut result = Vec::with_capacity(weighted.len());
    let mut rest = bounds;

    if total > 0.0 {
        let scale = bounds.area() / total;
        let items: Vec<(N, f64)> = weighted
            .iter()
            .rev()
            .filter(|&&(_, w)| w > 0.0)
            .map(|&(node, w)| (node, w * scale))
            .collect();

        let mut start = 0;
        while start < items.len() {
            let vertical = rest.w >= rest.h;
            let short = if vertical { rest.h } else { rest.w };
            if short <= 0.0 {
                for &(node, _) in &items[start..] {
                    result.push((node, Rect::new(rest.x, rest.y, 0.0, 0.0)));
                }
                break;
            }

            let mut end = start + 1;
            let mut row_sum = items[start].1;
            let mut best = worst_aspect_ratio(&items[start..end], row_sum, short);
            while end < items.len() {
                let candidate = row_sum + items[end].1;
                let score = worst_aspect_ratio(&items[start..=end], candidate, short);
                if score > best {
                    break;
                }
                best = score;
                row_sum = candidate;
                end += 1;
            }

            let long = if vertical { rest.w } else { rest.h };
            let thickness = if end == items.len() {
                long
            } else {
                (row_sum / short).min(long)
            };

            let mut offset = 0.0;
            for (k, &(node, area)) in items[start..end].iter().enumerate() {
                let length = if start + k + 1 == end {
                    short - offset
                } else {
                    area / thickness
                };
                let r = if vertical {
                    Rect::new(rest.x, rest.y + offset, thickness, length)
                } else {
                    Rect::new(rest.x + offset, rest.y, length, thickness)
                };
                result.push((node, r));
                offset += length;
            }

            if vertical {
                rest.x += thickness;
                rest.w = (rest.w - thickness).max(0.0);
            } else {
                rest.y += thickness;
                rest.h = (rest.h - thickness).max(0.0);
            }
            start = end;
        }
    }

    for &(node, weight) in weighted.iter().rev() {
        if weight <= 0.0 || total <= 0.0 {
            result.push((node, Rect::new(rest.x, rest.y, 0.0, 0.0)));
        }
    }

    result
}

fn worst_aspect_ratio<N>(row: &[(N, f64)], sum: f64, side: f64) -> f64 {
    if row.is_empty() || sum <= 0.0 || side <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    let max_r = row.iter().map(|&(_, a)| a).fold(0.0, f64::max);
    let min_r = row.iter().map(|&(_, a)| a).fold(f64::INFINITY, f64::min);
    let a = (side_sq * max_r) / sum_sq;
    let b = sum_sq / (side_sq * min_r);
    a.max(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::testing::TestTree;
    use crate::adapter::TreeAdapter;
    use crate::layout::MAX_LAYOUT_DEPTH;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn three_children() -> (TestTree, usize) {
        let mut tree = TestTree::default();
        let root = tree.add("root", 100.0);
        tree.add_child(root, "a", 50.0);
        tree.add_child(root, "b", 30.0);
        tree.add_child(root, "c", 20.0);
        (tree, root)
    }

    #[test]
    fn first_split_runs_along_the_wider_side() {
        let (tree, root) = three_children();
        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 100.0, 50.0), &LayoutConfig::flush())
            .unwrap();
        let kids = &map.roots()[0].children;
        assert_eq!(kids.len(), 3);

        assert_eq!(tree.label(kids[0].node), "a");
        assert_eq!(kids[0].rect, Rect::new(0.0, 0.0, 50.0, 50.0));

        // The 50x50 rest is square, so it is cut along the width again.
        assert_eq!(tree.label(kids[1].node), "b");
        assert!(close(kids[1].rect.w, 30.0) && close(kids[1].rect.h, 50.0));
        assert!(close(kids[1].rect.x, 50.0));

        assert_eq!(tree.label(kids[2].node), "c");
        assert!(close(kids[2].rect.w, 20.0) && close(kids[2].rect.h, 50.0));
        assert!(close(kids[2].rect.x, 80.0));
    }

    #[test]
    fn empty_fraction_leaves_top_half_blank() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 10.0);
        let child = tree.add_child(root, "only", 10.0);
        tree.nodes[root].empty = Some(0.5);

        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 40.0, 40.0), &LayoutConfig::flush())
            .unwrap();
        let kid = &map.roots()[0].children[0];
        assert_eq!(kid.node, child);
        assert_eq!(kid.rect, Rect::new(0.0, 20.0, 40.0, 20.0));
    }

    #[test]
    fn shared_node_uses_each_parents_weight() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 200.0);
        let a = tree.add_child(root, "A", 100.0);
        let b = tree.add_child(root, "B", 100.0);
        let shared = tree.add("shared", 100.0);
        tree.link(a, shared, 40.0);
        tree.add_child(a, "a-own", 60.0);
        tree.link(b, shared, 60.0);
        tree.add_child(b, "b-own", 40.0);

        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 200.0, 100.0), &LayoutConfig::flush())
            .unwrap();
        assert_eq!(map.iter().filter(|e| e.node == shared).count(), 2);

        let entry_a = map.find(a).unwrap();
        let entry_b = map.find(b).unwrap();
        let under_a = entry_a.children.iter().find(|e| e.node == shared).unwrap();
        let under_b = entry_b.children.iter().find(|e| e.node == shared).unwrap();
        let (area_a, area_b) = (entry_a.rect.area(), entry_b.rect.area());
        assert!(close(under_a.rect.area() / area_a, 0.4));
        assert!(close(under_b.rect.area() / area_b, 0.6));
        // The parents' boxes themselves split the root evenly.
        assert!(close(area_a, area_b));
    }

    #[test]
    fn zero_weight_child_is_recorded_without_area() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 10.0);
        tree.add_child(root, "big", 6.0);
        let zero = tree.add_child(root, "nothing", 0.0);
        tree.add_child(root, "small", 4.0);

        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 4.0), &LayoutConfig::flush())
            .unwrap();
        let kids = &map.roots()[0].children;
        assert_eq!(kids.len(), 3);
        let z = kids.iter().find(|e| e.node == zero).unwrap();
        assert_eq!(z.rect.area(), 0.0);
        assert!(z.children.is_empty());
        assert!(close(kids[0].rect.w, 6.0));
        assert!(close(kids[1].rect.w, 4.0));
    }

    #[test]
    fn all_zero_children_render_parent_flat() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 0.0);
        tree.add_child(root, "a", 0.0);
        tree.add_child(root, "b", 0.0);

        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), &LayoutConfig::flush())
            .unwrap();
        let kids = &map.roots()[0].children;
        assert_eq!(kids.len(), 2);
        assert!(kids.iter().all(|e| e.rect.area() == 0.0));
        assert_eq!(map.hit_test(5.0, 5.0).unwrap().node, root);
    }

    #[test]
    fn negative_weight_fails_fast() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 10.0);
        tree.add_child(root, "ok", 5.0);
        tree.add_child(root, "bad", -1.0);

        let err = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), &LayoutConfig::flush())
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidWeight { ref label, .. } if label == "bad"));
    }

    #[test]
    fn nan_weight_fails_fast() {
        let mut tree = TestTree::default();
        let root = tree.add("root", f64::NAN);
        let err = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), &LayoutConfig::flush())
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidWeight { .. }));
    }

    #[test]
    fn out_of_range_empty_fraction_is_rejected() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 10.0);
        tree.add_child(root, "a", 10.0);
        tree.nodes[root].empty = Some(1.5);
        let err = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), &LayoutConfig::flush())
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidEmpty { .. }));
    }

    #[test]
    fn degenerate_bounds_give_empty_map() {
        let (tree, root) = three_children();
        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 0.0, 50.0), &LayoutConfig::flush())
            .unwrap();
        assert!(map.is_empty());
        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 30.0, -2.0), &LayoutConfig::flush())
            .unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn depth_limit_stops_subdivision_and_reports_truncation() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 10.0);
        let mid = tree.add_child(root, "mid", 10.0);
        tree.add_child(mid, "leaf", 10.0);

        let config = LayoutConfig {
            max_depth: 1,
            ..LayoutConfig::flush()
        };
        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), &config).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.truncated_depth(), Some(1));

        let config = LayoutConfig {
            max_depth: 2,
            ..LayoutConfig::flush()
        };
        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), &config).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.truncated_depth(), None);
    }

    #[test]
    fn depth_is_clamped_on_long_chains() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 1.0);
        let mut tip = root;
        for _ in 0..2000 {
            tip = tree.add_child(tip, "link", 1.0);
        }

        let config = LayoutConfig {
            max_depth: u16::MAX,
            ..LayoutConfig::flush()
        };
        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), &config).unwrap();
        assert_eq!(map.max_depth(), MAX_LAYOUT_DEPTH);
        assert_eq!(map.truncated_depth(), Some(MAX_LAYOUT_DEPTH));
        assert_eq!(map.len(), usize::from(MAX_LAYOUT_DEPTH) + 1);
    }

    #[test]
    fn padding_and_header_are_reserved() {
        let mut tree = TestTree::default();
        let root = tree.add("root", 1.0);
        tree.add_child(root, "only", 1.0);
        let config = LayoutConfig {
            padding: 2.0,
            header: 10.0,
            ..LayoutConfig::default()
        };
        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 100.0, 50.0), &config).unwrap();
        let kid = &map.roots()[0].children[0];
        assert_eq!(kid.rect, Rect::new(2.0, 12.0, 96.0, 36.0));
    }

    #[test]
    fn tiny_content_is_not_subdivided() {
        let (tree, root) = three_children();
        let config = LayoutConfig {
            padding: 2.0,
            header: 0.0,
            min_side: 1.0,
            ..LayoutConfig::default()
        };
        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 4.5, 50.0), &config).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn recursive_child_is_not_revisited() {
        let mut tree = TestTree::default();
        let root = tree.add("recurse", 10.0);
        tree.nodes[root].children.push(root);
        tree.add_child(root, "other", 5.0);

        let map = compute_layout(&tree, root, Rect::new(0.0, 0.0, 10.0, 10.0), &LayoutConfig::flush())
            .unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn rows_strategy_conserves_area() {
        let weighted = [(0usize, 1.0), (1, 2.0), (2, 3.0), (3, 6.0), (4, 6.0)];
        let bounds = Rect::new(0.0, 0.0, 60.0, 40.0);
        let placed = split_rows(&weighted, bounds);
        assert_eq!(placed.len(), 5);
        let total: f64 = placed.iter().map(|(_, r)| r.area()).sum();
        assert!((total - bounds.area()).abs() < 1e-6);
        for (node, rect) in &placed {
            let share = weighted[*node].1 / 18.0;
            assert!((rect.area() / bounds.area() - share).abs() < 1e-9);
        }
        for (i, (_, a)) in placed.iter().enumerate() {
            for (_, b) in &placed[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn rows_strategy_single_item_fills_bounds() {
        let placed = split_rows(&[(7u8, 3.0)], Rect::new(0.0, 0.0, 1920.0, 1080.0));
        assert_eq!(placed, vec![(7u8, Rect::new(0.0, 0.0, 1920.0, 1080.0))]);
    }

    #[test]
    fn greedy_ties_keep_input_order() {
        let placed = split_greedy(&[(0u8, 1.0), (1, 1.0)], Rect::new(0.0, 0.0, 2.0, 1.0));
        // Largest-first walks from the back, so the later of two equal
        // weights is placed first.
        assert_eq!(placed[0].0, 1);
        assert_eq!(placed[1].0, 0);
    }
}
