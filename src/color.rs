//! Branch coloring.
//!
//! Each direct child of a root opens a branch and takes the next palette
//! color; every descendant inherits the branch color. Deeper generations are
//! drawn in progressively lighter shades of the same hue, while edges keep
//! the unshaded base color so each branch reads as one trunk.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::graph::{EdgeKey, FamilyForest, FamilyMember, MemberId};

/// Lightness added per generation below the branch head.
pub const SHADE_STEP: u8 = 6;

/// Shades never get lighter than this.
pub const MAX_LIGHTNESS: u8 = 88;

/// A color in HSL space. Hue in degrees, saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HslColor {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl HslColor {
    pub const fn new(h: u16, s: u8, l: u8) -> Self {
        Self { h, s, l }
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

impl Serialize for HslColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Branch palette. Neighbouring entries are far apart in hue so adjacent
/// branches stay distinguishable.
const PALETTE: [HslColor; 12] = [
    HslColor::new(210, 65, 38),
    HslColor::new(0, 62, 42),
    HslColor::new(140, 50, 32),
    HslColor::new(30, 75, 40),
    HslColor::new(270, 45, 42),
    HslColor::new(180, 55, 30),
    HslColor::new(330, 55, 42),
    HslColor::new(50, 70, 35),
    HslColor::new(100, 45, 32),
    HslColor::new(240, 50, 45),
    HslColor::new(15, 60, 35),
    HslColor::new(195, 70, 32),
];

/// Base color of the `index`-th branch. Wraps around the palette.
pub fn branch_base_color(index: usize) -> HslColor {
    PALETTE[index % PALETTE.len()]
}

/// Lighten a base color by `depth_offset` generations.
pub fn shade_for(base: HslColor, depth_offset: u32) -> HslColor {
    let lifted = u32::from(base.l) + depth_offset.saturating_mul(u32::from(SHADE_STEP));
    let l = lifted.min(u32::from(MAX_LIGHTNESS.max(base.l))) as u8;
    HslColor { l, ..base }
}

/// Base color per member, keyed by member id. Roots have none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchColors {
    base: HashMap<MemberId, HslColor>,
}

impl BranchColors {
    pub fn base(&self, id: MemberId) -> Option<HslColor> {
        self.base.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Displayed color of a member: its branch color lightened by generation.
    pub fn node_color(&self, forest: &FamilyForest, member: &FamilyMember) -> Option<HslColor> {
        let base = self.base(member.id)?;
        Some(shade_for(base, depth_offset(forest, member)))
    }

    /// Edge stroke color: the unshaded base color of the child.
    pub fn edge_color(&self, edge: EdgeKey) -> Option<HslColor> {
        self.base(edge.child).map(|base| shade_for(base, 0))
    }
}

/// Generations between a member and the head of its branch.
///
/// Measured on recorded generations against the member's own root (a root
/// without a generation counts as generation 1). A member without a
/// generation is treated as the root's generation, so it gets no shading.
pub fn depth_offset(forest: &FamilyForest, member: &FamilyMember) -> u32 {
    let root_generation = forest
        .root_of(member.id)
        .and_then(|root| forest.get(root))
        .and_then(|root| root.generation)
        .unwrap_or(1);
    let generation = member.generation.unwrap_or(root_generation);
    (generation - root_generation - 1).max(0) as u32
}

/// Assign branch colors for the whole forest.
///
/// The first color that reaches a member wins; later branches never repaint
/// it.
pub fn compute_branch_colors(forest: &FamilyForest) -> BranchColors {
    let heads = forest.roots().iter().flat_map(|&root| {
        forest
            .children(root)
            .iter()
            .enumerate()
            .map(|(index, &head)| (head, branch_base_color(index)))
    });

    let base = heads.fold(HashMap::<MemberId, HslColor>::new(), |mut acc, (head, color)| {
        let mut stack = vec![head];
        while let Some(id) = stack.pop() {
            if acc.contains_key(&id) {
                continue;
            }
            acc.insert(id, color);
            stack.extend(forest.children(id).iter().rev().copied());
        }
        acc
    });

    BranchColors { base }
}
