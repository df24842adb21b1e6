//! Family member records and the forest built from them.
//!
//! This module provides the member model and the validated father→child
//! forest, stored in petgraph's StableGraph with an explicitly ordered
//! children map for deterministic traversal.

mod edge;
mod forest;
mod member;

pub use edge::EdgeKey;
pub use forest::{Ancestors, FamilyForest, VisibleTree};
pub use member::{FamilyMember, Gender, MemberId};
