//! Tour planning: the path between two members.
//!
//! In a forest there is at most one path between two members, running up
//! from the start to the lowest common ancestor and back down to the end.

use std::collections::HashMap;

use crate::error::{LineageError, Result};
use crate::graph::{FamilyForest, FamilyMember, MemberId};

/// Members on the path from `start` to `end`, both inclusive.
///
/// Fails with `NotFound` when either id is unknown (start is checked first)
/// and with `NoPath` when the two belong to different root trees.
pub fn find_path(
    forest: &FamilyForest,
    start: MemberId,
    end: MemberId,
) -> Result<Vec<&FamilyMember>> {
    let ids = find_path_ids(forest, start, end)?;
    ids.into_iter().map(|id| forest.require(id)).collect()
}

/// Id-only variant of [`find_path`].
pub fn find_path_ids(forest: &FamilyForest, start: MemberId, end: MemberId) -> Result<Vec<MemberId>> {
    forest.require(start)?;
    forest.require(end)?;

    // Chains run from the member itself up to its root.
    let up: Vec<MemberId> = std::iter::once(start).chain(forest.ancestors(start)).collect();
    let down: Vec<MemberId> = std::iter::once(end).chain(forest.ancestors(end)).collect();

    let up_position: HashMap<MemberId, usize> =
        up.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    // The first id of the end chain that also lies on the start chain is
    // the deepest shared ancestor.
    let (down_len, up_len) = down
        .iter()
        .enumerate()
        .find_map(|(j, id)| up_position.get(id).map(|&i| (j, i)))
        .ok_or(LineageError::NoPath { start, end })?;

    let mut path = up[..=up_len].to_vec();
    path.extend(down[..down_len].iter().rev());

    log::debug!(
        "tour {start} → {end}: {} members via {}",
        path.len(),
        up[up_len]
    );
    Ok(path)
}
