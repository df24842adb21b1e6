//! Highlight paths and search-and-reveal.
//!
//! Focusing a member highlights its whole lineage: every ancestor up to the
//! root and every descendant, plus the edges connecting them. Collapse state
//! is ignored here; the caller expands collapsed ancestors first (see
//! [`collapsed_ancestors`]) so the highlighted member is actually on screen.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use crate::graph::{EdgeKey, FamilyForest, FamilyMember, MemberId};

/// Nodes and edges on the focused member's lineage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightPath {
    pub focus: Option<MemberId>,
    pub node_ids: BTreeSet<MemberId>,
    pub edge_ids: BTreeSet<EdgeKey>,
}

impl HighlightPath {
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    pub fn contains_node(&self, id: MemberId) -> bool {
        self.node_ids.contains(&id)
    }

    pub fn contains_edge(&self, edge: EdgeKey) -> bool {
        self.edge_ids.contains(&edge)
    }
}

/// Ancestors and descendants of `focus`, with the edges between them.
///
/// Returns an empty path when nothing is focused or the id is unknown.
pub fn compute_highlight_path(forest: &FamilyForest, focus: Option<MemberId>) -> HighlightPath {
    let Some(focus) = focus.filter(|&id| forest.contains(id)) else {
        return HighlightPath::default();
    };

    let mut path = HighlightPath {
        focus: Some(focus),
        ..HighlightPath::default()
    };
    path.node_ids.insert(focus);

    let mut child = focus;
    for father in forest.ancestors(focus) {
        path.node_ids.insert(father);
        path.edge_ids.insert(EdgeKey::new(father, child));
        child = father;
    }

    let mut queue = VecDeque::from([focus]);
    while let Some(father) = queue.pop_front() {
        for edge in forest.child_edges(father) {
            path.node_ids.insert(edge.child);
            path.edge_ids.insert(edge);
            queue.push_back(edge.child);
        }
    }

    path
}

/// Collapsed ancestors that hide `id`, nearest first.
pub fn collapsed_ancestors(
    forest: &FamilyForest,
    id: MemberId,
    collapsed: &BTreeSet<MemberId>,
) -> Vec<MemberId> {
    forest
        .ancestors(id)
        .filter(|ancestor| collapsed.contains(ancestor))
        .collect()
}

/// First member, in load order, whose name contains `query`.
///
/// Matching ignores case and surrounding whitespace in the query. A blank
/// query matches nothing.
pub fn find_by_name<'a>(forest: &'a FamilyForest, query: &str) -> Option<&'a FamilyMember> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    forest
        .members()
        .iter()
        .find(|member| member.name.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root(1) → p1(2) → p2(3) → focus(4) → c1(5) → c2(6), plus a side
    /// branch 1 → 7 and a sibling 3 → 8.
    fn chain() -> FamilyForest {
        FamilyForest::new(vec![
            FamilyMember::new(1, "Root"),
            FamilyMember::new(2, "P1").with_father(1),
            FamilyMember::new(3, "P2").with_father(2),
            FamilyMember::new(4, "Focus").with_father(3),
            FamilyMember::new(5, "C1").with_father(4),
            FamilyMember::new(6, "C2").with_father(5),
            FamilyMember::new(7, "Uncle").with_father(1),
            FamilyMember::new(8, "Sibling").with_father(3),
        ])
        .unwrap()
    }

    fn edge(f: u32, c: u32) -> EdgeKey {
        EdgeKey::new(MemberId(f), MemberId(c))
    }

    #[test]
    fn test_lineage_exact() {
        let forest = chain();
        let path = compute_highlight_path(&forest, Some(MemberId(4)));

        let nodes: Vec<u32> = path.node_ids.iter().map(|id| id.0).collect();
        assert_eq!(nodes, vec![1, 2, 3, 4, 5, 6]);

        let expected: BTreeSet<EdgeKey> =
            [edge(1, 2), edge(2, 3), edge(3, 4), edge(4, 5), edge(5, 6)]
                .into_iter()
                .collect();
        assert_eq!(path.edge_ids, expected);
        assert!(!path.contains_node(MemberId(7)));
        assert!(!path.contains_node(MemberId(8)));
    }

    #[test]
    fn test_isolated_focus_contains_itself() {
        let forest = FamilyForest::new(vec![FamilyMember::new(1, "Alone")]).unwrap();
        let path = compute_highlight_path(&forest, Some(MemberId(1)));
        assert_eq!(path.node_ids.len(), 1);
        assert!(path.edge_ids.is_empty());
    }

    #[test]
    fn test_no_focus_is_empty() {
        let forest = chain();
        assert!(compute_highlight_path(&forest, None).is_empty());
        assert!(compute_highlight_path(&forest, Some(MemberId(99))).is_empty());
    }

    #[test]
    fn test_edge_ids_render_like_graph_edges() {
        let forest = chain();
        let path = compute_highlight_path(&forest, Some(MemberId(6)));
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json["edge_ids"][0], "e1-2");
        assert_eq!(json["focus"], 6);
    }

    #[test]
    fn test_collapsed_ancestors() {
        let forest = chain();
        let collapsed: BTreeSet<_> = [MemberId(2), MemberId(5), MemberId(7)].into_iter().collect();
        assert_eq!(
            collapsed_ancestors(&forest, MemberId(4), &collapsed),
            vec![MemberId(2)]
        );
        assert!(collapsed_ancestors(&forest, MemberId(1), &collapsed).is_empty());
    }

    #[test]
    fn test_find_by_name() {
        let forest = chain();
        assert_eq!(find_by_name(&forest, "  foc ").map(|m| m.id), Some(MemberId(4)));
        assert_eq!(find_by_name(&forest, "c").map(|m| m.id), Some(MemberId(4)));
        assert_eq!(find_by_name(&forest, "   "), None);
        assert_eq!(find_by_name(&forest, "nobody"), None);
    }
}
