//! Father→child edge key.
//!
//! Edges carry no data of their own: an edge exists for every member whose
//! father is also a member. The key renders as `e{father}-{child}`, which is
//! the id the host graph widget uses for edges.

use std::fmt;

use serde::{Serialize, Serializer};

use super::member::MemberId;

/// Stable edge identifier, derived from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub father: MemberId,
    pub child: MemberId,
}

impl EdgeKey {
    /// Create a new EdgeKey from its endpoints.
    #[inline]
    pub fn new(father: MemberId, child: MemberId) -> Self {
        Self { father, child }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}-{}", self.father, self.child)
    }
}

impl Serialize for EdgeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
