//! FamilyForest - validated father→child forest over the member table.
//!
//! The forest stores the topology in petgraph's StableGraph (one node per
//! member, one edge per resolvable `father_id`) and keeps an explicitly
//! ordered children map next to it, since petgraph's neighbor order is an
//! implementation detail.
//!
//! Construction rejects data that would make traversals diverge: a
//! `father_id` cycle, a duplicated id, or a blank name. Once built, every
//! walk over the forest terminates.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::Bfs;
use petgraph::{Directed, Direction};

use super::edge::EdgeKey;
use super::member::{FamilyMember, MemberId};
use crate::error::{LineageError, Result};

/// Validated family forest.
pub struct FamilyForest {
    /// Member records in load order.
    members: Vec<FamilyMember>,

    /// Father→child topology. Nodes store their MemberId.
    graph: StableGraph<MemberId, (), Directed>,

    /// Map from MemberId to petgraph NodeIndex
    id_to_index: HashMap<MemberId, NodeIndex>,

    /// Map from MemberId to its slot in `members`
    id_to_slot: HashMap<MemberId, usize>,

    /// Father id → children ordered by sibling_order, then id
    children: HashMap<MemberId, Vec<MemberId>>,

    /// Members without a resolvable father, in load order
    roots: Vec<MemberId>,
}

impl FamilyForest {
    /// Build a forest from member records.
    ///
    /// A `father_id` that points at no member is not an error: that member
    /// becomes a root.
    pub fn new(members: Vec<FamilyMember>) -> Result<Self> {
        let mut graph = StableGraph::with_capacity(members.len(), members.len());
        let mut id_to_index = HashMap::with_capacity(members.len());
        let mut id_to_slot = HashMap::with_capacity(members.len());

        for (slot, member) in members.iter().enumerate() {
            if member.name.trim().is_empty() {
                return Err(LineageError::InvalidMember {
                    member_id: member.id,
                    reason: "name is empty".to_string(),
                });
            }
            if id_to_slot.insert(member.id, slot).is_some() {
                return Err(LineageError::DuplicateMember {
                    member_id: member.id,
                });
            }
            id_to_index.insert(member.id, graph.add_node(member.id));
        }

        let mut children: HashMap<MemberId, Vec<MemberId>> = HashMap::new();
        let mut roots = Vec::new();
        let mut dangling = 0usize;

        for member in &members {
            match member.father_id {
                Some(father) if father == member.id => {
                    return Err(LineageError::CyclicData {
                        member_id: member.id,
                    });
                }
                Some(father) if id_to_index.contains_key(&father) => {
                    graph.add_edge(id_to_index[&father], id_to_index[&member.id], ());
                    children.entry(father).or_default().push(member.id);
                }
                Some(_) => {
                    dangling += 1;
                    roots.push(member.id);
                }
                None => roots.push(member.id),
            }
        }

        if let Err(cycle) = petgraph::algo::toposort(&graph, None) {
            let member_id = graph[cycle.node_id()];
            log::warn!("rejecting member list: father_id cycle through {member_id}");
            return Err(LineageError::CyclicData { member_id });
        }

        for siblings in children.values_mut() {
            siblings.sort_by(|&a, &b| {
                sibling_cmp(&members[id_to_slot[&a]], &members[id_to_slot[&b]])
            });
        }

        log::debug!(
            "family forest built: {} members, {} roots, {} dangling father references",
            members.len(),
            roots.len(),
            dangling
        );

        Ok(Self {
            members,
            graph,
            id_to_index,
            id_to_slot,
            children,
            roots,
        })
    }

    /// Create an empty forest.
    pub fn empty() -> Self {
        Self {
            members: Vec::new(),
            graph: StableGraph::new(),
            id_to_index: HashMap::new(),
            id_to_slot: HashMap::new(),
            children: HashMap::new(),
            roots: Vec::new(),
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// All members in load order.
    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: MemberId) -> Option<&FamilyMember> {
        self.id_to_slot.get(&id).map(|&slot| &self.members[slot])
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.id_to_slot.contains_key(&id)
    }

    /// Look up a member or fail with `NotFound`.
    pub fn require(&self, id: MemberId) -> Result<&FamilyMember> {
        self.get(id).ok_or(LineageError::NotFound { member_id: id })
    }

    /// Roots in load order: members with no father or a dangling one.
    pub fn roots(&self) -> &[MemberId] {
        &self.roots
    }

    /// The father of a member, if the father is itself a member.
    pub fn father(&self, id: MemberId) -> Option<MemberId> {
        let index = *self.id_to_index.get(&id)?;
        self.graph
            .neighbors_directed(index, Direction::Incoming)
            .next()
            .map(|father| self.graph[father])
    }

    /// Ordered children of a member. Empty for leaves and unknown ids.
    pub fn children(&self, id: MemberId) -> &[MemberId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Full children adjacency (father id → ordered child ids).
    pub fn children_map(&self) -> &HashMap<MemberId, Vec<MemberId>> {
        &self.children
    }

    pub fn has_children(&self, id: MemberId) -> bool {
        !self.children(id).is_empty()
    }

    /// Number of father→child edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Walk from a member's father up to its root. Excludes the member itself.
    pub fn ancestors(&self, id: MemberId) -> Ancestors<'_> {
        Ancestors {
            forest: self,
            current: if self.contains(id) { Some(id) } else { None },
        }
    }

    /// The root of the tree a member belongs to.
    pub fn root_of(&self, id: MemberId) -> Option<MemberId> {
        if !self.contains(id) {
            return None;
        }
        Some(self.ancestors(id).last().unwrap_or(id))
    }

    /// All descendants of a member in breadth-first order, excluding itself.
    pub fn descendants(&self, id: MemberId) -> Vec<MemberId> {
        let Some(&start) = self.id_to_index.get(&id) else {
            return Vec::new();
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut result = Vec::new();
        while let Some(index) = bfs.next(&self.graph) {
            if index != start {
                result.push(self.graph[index]);
            }
        }
        result
    }

    /// Father→child edges out of a member, in children order.
    pub fn child_edges(&self, id: MemberId) -> impl Iterator<Item = EdgeKey> + '_ {
        self.children(id)
            .iter()
            .map(move |&child| EdgeKey::new(id, child))
    }

    /// Suggested generation for a new child of `father_id`.
    pub fn suggest_generation(&self, father_id: MemberId) -> Option<i32> {
        self.get(father_id)?.generation.map(|g| g + 1)
    }

    // =========================================================================
    // Visible tree assembly
    // =========================================================================

    /// Breadth-first expansion from all roots, skipping the subtrees of
    /// collapsed members. Collapsed members stay visible themselves.
    pub fn assemble_visible(&self, collapsed: &BTreeSet<MemberId>) -> VisibleTree<'_> {
        let mut queue: VecDeque<MemberId> = self.roots.iter().copied().collect();
        let mut visited: HashSet<MemberId> = HashSet::with_capacity(self.members.len());
        let mut members = Vec::with_capacity(self.members.len());

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(member) = self.get(id) else {
                continue;
            };
            members.push(member);

            if !collapsed.contains(&id) {
                queue.extend(self.children(id).iter().copied());
            }
        }

        VisibleTree {
            forest: self,
            members,
            visible: visited,
        }
    }
}

impl Default for FamilyForest {
    fn default() -> Self {
        Self::empty()
    }
}

/// Missing sibling_order sorts after any present one; ties fall back to id.
fn sibling_cmp(a: &FamilyMember, b: &FamilyMember) -> Ordering {
    match (a.sibling_order, b.sibling_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

/// Iterator over a member's ancestors, nearest first.
pub struct Ancestors<'a> {
    forest: &'a FamilyForest,
    current: Option<MemberId>,
}

impl Iterator for Ancestors<'_> {
    type Item = MemberId;

    fn next(&mut self) -> Option<MemberId> {
        let father = self.forest.father(self.current?);
        self.current = father;
        father
    }
}

/// Collapse-aware view of the forest.
pub struct VisibleTree<'a> {
    forest: &'a FamilyForest,
    /// Visible members in breadth-first order.
    pub members: Vec<&'a FamilyMember>,
    visible: HashSet<MemberId>,
}

impl<'a> VisibleTree<'a> {
    pub fn forest(&self) -> &'a FamilyForest {
        self.forest
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_visible(&self, id: MemberId) -> bool {
        self.visible.contains(&id)
    }

    /// Visible member ids in breadth-first order.
    pub fn ids(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.members.iter().map(|m| m.id)
    }

    /// Full children adjacency of the underlying forest.
    pub fn children_map(&self) -> &'a HashMap<MemberId, Vec<MemberId>> {
        self.forest.children_map()
    }

    /// Children of a member that are visible.
    pub fn visible_children(&self, id: MemberId) -> impl Iterator<Item = MemberId> + '_ {
        self.forest
            .children(id)
            .iter()
            .copied()
            .filter(move |child| self.visible.contains(child))
    }

    /// Visible roots, in load order.
    pub fn roots(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.forest
            .roots()
            .iter()
            .copied()
            .filter(move |root| self.visible.contains(root))
    }

    /// Edges whose endpoints are both visible, in visible order of the child.
    pub fn edges(&self) -> Vec<EdgeKey> {
        self.members
            .iter()
            .filter_map(|member| {
                let father = self.forest.father(member.id)?;
                self.visible
                    .contains(&father)
                    .then(|| EdgeKey::new(father, member.id))
            })
            .collect()
    }
}
