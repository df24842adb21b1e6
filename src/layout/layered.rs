//! Layered top-down layout for the visible family forest.
//!
//! Ranks are generations in the visible tree (roots on rank 0). Horizontal
//! positions come from a bottom-up contour merge in the Reingold–Tilford
//! family:
//!
//! 1. **First walk (bottom-up):** each subtree reports its left and right
//!    contour, the outermost box edges per rank relative to its root. Sibling
//!    subtrees are packed left to right, each shifted just far enough that
//!    its left contour clears the accumulated right contour by
//!    `node_separation` on every shared rank. The parent is centered over
//!    its first and last child.
//! 2. **Second walk (top-down):** accumulate relative offsets into absolute
//!    center x-coordinates.
//! 3. **Normalize:** shift everything so the leftmost box edge sits at x = 0.
//!
//! Root trees are packed the same way under a virtual super-root, so a
//! forest comes out as adjacent, non-overlapping trees.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::Serialize;

use super::{LayoutConfig, Point};
use crate::graph::{EdgeKey, MemberId, VisibleTree};

/// Internal node data used during the layout walks.
#[derive(Debug)]
struct LayoutNode {
    /// Member laid out here (None for the virtual super-root).
    id: Option<MemberId>,
    /// Rank in the visible tree (virtual root = 0, real roots = 1).
    depth: usize,
    /// Children in sibling order.
    children: Vec<usize>,
    /// Center x relative to the parent's center (from the first walk).
    offset: f32,
}

/// Outer box edges of a subtree, one entry per rank below its root.
#[derive(Debug)]
struct Contour {
    left: Vec<f32>,
    right: Vec<f32>,
}

impl Contour {
    /// Merge a subtree placed `shift` to the right of everything merged so
    /// far. Its right edges become the new right contour; its left edges only
    /// matter on ranks deeper than anything merged before.
    fn absorb(&mut self, other: Contour, shift: f32) {
        for (depth, (l, r)) in other.left.into_iter().zip(other.right).enumerate() {
            if depth < self.right.len() {
                self.right[depth] = r + shift;
            } else {
                self.left.push(l + shift);
                self.right.push(r + shift);
            }
        }
    }
}

/// Result of the layered layout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeLayout {
    /// Center of each visible member's card.
    pub positions: HashMap<MemberId, Point>,
    /// Father→child edges between visible members.
    pub edges: Vec<EdgeKey>,
    /// Anchor of each generation label, ascending by generation.
    pub generation_labels: BTreeMap<i32, Point>,
    pub node_width: f32,
    pub node_height: f32,
}

impl TreeLayout {
    pub fn center(&self, id: MemberId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Top-left corner of a member's card, for renderers anchored there.
    pub fn top_left(&self, id: MemberId) -> Option<Point> {
        self.center(id).map(|c| {
            Point::new(c.x - self.node_width / 2.0, c.y - self.node_height / 2.0)
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lay out the visible forest.
pub fn compute_layout(visible: &VisibleTree<'_>, config: &LayoutConfig) -> TreeLayout {
    let mut layout = TreeLayout {
        node_width: config.node_width,
        node_height: config.node_height,
        ..TreeLayout::default()
    };
    if visible.is_empty() {
        return layout;
    }

    let mut nodes = build_layout_tree(visible);
    let engine = LayeredLayout { config };
    engine.first_walk(0, &mut nodes);

    let mut center_x = vec![0.0f32; nodes.len()];
    engine.second_walk(0, 0.0, &nodes, &mut center_x);

    let min_x = nodes
        .iter()
        .zip(&center_x)
        .filter(|(node, _)| node.id.is_some())
        .map(|(_, &x)| x)
        .fold(f32::INFINITY, f32::min);
    let x_offset = config.node_width / 2.0 - min_x;
    let rank_height = config.node_height + config.rank_separation;

    for (node, &x) in nodes.iter().zip(&center_x) {
        let Some(id) = node.id else { continue };
        let rank = (node.depth - 1) as f32;
        layout.positions.insert(
            id,
            Point::new(x + x_offset, rank * rank_height + config.node_height / 2.0),
        );
    }

    layout.edges = visible.edges();
    layout.generation_labels = generation_label_positions(visible, &layout, config);

    log::debug!(
        "layered layout: {} cards, {} edges, {} generation labels",
        layout.positions.len(),
        layout.edges.len(),
        layout.generation_labels.len()
    );
    layout
}

/// Label anchors: left of the whole tree, at the mean center y of each
/// generation's visible members.
fn generation_label_positions(
    visible: &VisibleTree<'_>,
    layout: &TreeLayout,
    config: &LayoutConfig,
) -> BTreeMap<i32, Point> {
    let mut sums: BTreeMap<i32, (f32, usize)> = BTreeMap::new();
    for member in &visible.members {
        let (Some(generation), Some(center)) = (member.generation, layout.center(member.id))
        else {
            continue;
        };
        // Generation 0 is a placeholder, not a real generation
        if generation == 0 {
            continue;
        }
        let entry = sums.entry(generation).or_insert((0.0, 0));
        entry.0 += center.y;
        entry.1 += 1;
    }

    let min_left = layout
        .positions
        .values()
        .map(|c| c.x - config.node_width / 2.0)
        .fold(f32::INFINITY, f32::min);
    let label_x = min_left - config.generation_label_offset_x;

    sums.into_iter()
        .map(|(generation, (total, count))| {
            let mean = total / count as f32;
            (
                generation,
                Point::new(label_x, mean - config.generation_label_offset_y),
            )
        })
        .collect()
}

/// Build the layout arena breadth-first under a virtual super-root at index 0.
fn build_layout_tree(visible: &VisibleTree<'_>) -> Vec<LayoutNode> {
    let mut nodes = vec![LayoutNode {
        id: None,
        depth: 0,
        children: Vec::new(),
        offset: 0.0,
    }];
    let mut queue: VecDeque<(MemberId, usize)> = VecDeque::new();

    for root in visible.roots() {
        let index = nodes.len();
        nodes.push(LayoutNode {
            id: Some(root),
            depth: 1,
            children: Vec::new(),
            offset: 0.0,
        });
        nodes[0].children.push(index);
        queue.push_back((root, index));
    }

    while let Some((id, index)) = queue.pop_front() {
        let depth = nodes[index].depth + 1;
        for child in visible.visible_children(id) {
            let child_index = nodes.len();
            nodes.push(LayoutNode {
                id: Some(child),
                depth,
                children: Vec::new(),
                offset: 0.0,
            });
            nodes[index].children.push(child_index);
            queue.push_back((child, child_index));
        }
    }

    nodes
}

struct LayeredLayout<'c> {
    config: &'c LayoutConfig,
}

impl LayeredLayout<'_> {
    /// Bottom-up pass: set each child's offset and return the subtree contour.
    fn first_walk(&self, v: usize, nodes: &mut [LayoutNode]) -> Contour {
        let half = if nodes[v].id.is_some() {
            self.config.node_width / 2.0
        } else {
            0.0
        };
        // Clone children indices to avoid borrow conflict during recursion
        let children = nodes[v].children.clone();

        let Some((&first, rest)) = children.split_first() else {
            return Contour {
                left: vec![-half],
                right: vec![half],
            };
        };

        let mut merged = self.first_walk(first, nodes);
        let mut placed = Vec::with_capacity(children.len());
        placed.push(0.0f32);

        for &child in rest {
            let contour = self.first_walk(child, nodes);
            let shift = self.separate(&merged, &contour);
            merged.absorb(contour, shift);
            placed.push(shift);
        }

        // Center parent over first and last children
        let center = (placed[0] + placed[placed.len() - 1]) / 2.0;
        for (&child, &x) in children.iter().zip(&placed) {
            nodes[child].offset = x - center;
        }

        let mut left = Vec::with_capacity(merged.left.len() + 1);
        let mut right = Vec::with_capacity(merged.right.len() + 1);
        left.push(-half);
        right.push(half);
        left.extend(merged.left.iter().map(|x| x - center));
        right.extend(merged.right.iter().map(|x| x - center));
        Contour { left, right }
    }

    /// Smallest shift that keeps `next` clear of `placed` on every shared rank.
    fn separate(&self, placed: &Contour, next: &Contour) -> f32 {
        placed
            .right
            .iter()
            .zip(&next.left)
            .map(|(r, l)| r + self.config.node_separation - l)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Top-down pass: absolute center x from accumulated offsets.
    fn second_walk(&self, v: usize, parent_x: f32, nodes: &[LayoutNode], center_x: &mut [f32]) {
        let x = parent_x + nodes[v].offset;
        center_x[v] = x;
        for &child in &nodes[v].children {
            self.second_walk(child, x, nodes, center_x);
        }
    }
}
