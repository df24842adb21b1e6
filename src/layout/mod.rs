//! Layout algorithms for the family views.
//!
//! This module provides CPU-side layouts that compute target positions for
//! the host's renderers: the layered family tree and the lifespan timeline.

pub mod layered;
pub mod timeline;

use serde::{Deserialize, Serialize};

pub use layered::{compute_layout, TreeLayout};
pub use timeline::{compute_timeline, Timeline, TimelineConfig, TimelineHit};

/// A 2D position in layout space. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Smallest rectangle covering both.
    pub fn union(self, other: Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Configuration for the layered tree layout.
///
/// Every field has a default, so hosts can pass a partial object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of a member card.
    pub node_width: f32,
    /// Height of a member card.
    pub node_height: f32,
    /// Minimum horizontal gap between two cards on the same rank.
    pub node_separation: f32,
    /// Vertical gap between ranks.
    pub rank_separation: f32,
    /// Distance from the leftmost card edge to the generation labels.
    pub generation_label_offset_x: f32,
    /// Upward shift of a generation label from its rank's mean center.
    pub generation_label_offset_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 120.0,
            node_separation: 80.0,
            rank_separation: 120.0,
            generation_label_offset_x: 140.0,
            generation_label_offset_y: 40.0,
        }
    }
}
