//! R-tree over member cards using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Point hit testing (which card is under the cursor)
//! - Rectangle intersection (marquee selection, viewport culling)

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use crate::graph::MemberId;
use crate::layout::Point;

/// A member card's box in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberBox {
    pub id: MemberId,
    /// Top-left corner.
    pub min: [f32; 2],
    /// Bottom-right corner.
    pub max: [f32; 2],
}

impl MemberBox {
    /// Box of a card given its top-left corner and size.
    pub fn new(id: MemberId, top_left: Point, width: f32, height: f32) -> Self {
        Self {
            id,
            min: [top_left.x, top_left.y],
            max: [top_left.x + width, top_left.y + height],
        }
    }

    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }

    fn center_distance_2(&self, point: &[f32; 2]) -> f32 {
        let [cx, cy] = self.center();
        let dx = cx - point[0];
        let dy = cy - point[1];
        dx * dx + dy * dy
    }
}

impl RTreeObject for MemberBox {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PointDistance for MemberBox {
    /// Squared distance to the box; zero inside it.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        self.envelope().distance_2(point)
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.envelope().contains_point(point)
    }
}

/// Spatial index for the member cards of the last built scene.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<MemberBox>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Card under a point. When cards overlap there, the one whose center is
    /// nearest wins.
    pub fn member_at(&self, x: f32, y: f32) -> Option<MemberId> {
        let point = [x, y];
        self.tree
            .locate_all_at_point(&point)
            .min_by(|a, b| {
                a.center_distance_2(&point)
                    .total_cmp(&b.center_distance_2(&point))
                    .then(a.id.cmp(&b.id))
            })
            .map(|card| card.id)
    }

    /// Cards intersecting a rectangle, ascending by id.
    pub fn members_in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<MemberId> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut ids: Vec<MemberId> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|card| card.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Replace the index contents with `boxes`.
    ///
    /// This is more efficient than incremental inserts for bulk updates.
    pub fn rebuild(&mut self, boxes: Vec<MemberBox>) {
        self.tree = RTree::bulk_load(boxes);
    }

    /// Clear all cards from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
