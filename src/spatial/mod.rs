//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree based spatial index over the member cards
//! of the last built scene.

mod rtree;

pub use rtree::{MemberBox, SpatialIndex};
