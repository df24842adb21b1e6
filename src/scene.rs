//! Render-ready scene: positioned member cards, generation labels and edges
//! with their colors and highlight state.
//!
//! The scene is rebuilt from scratch on every call. It combines the visible
//! tree, the layered layout, branch colors and the focus lineage into plain
//! data a renderer can draw without further lookups.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::color::{compute_branch_colors, HslColor};
use crate::graph::{EdgeKey, FamilyForest, FamilyMember, MemberId};
use crate::highlight::compute_highlight_path;
use crate::layout::{compute_layout, LayoutConfig, Point, Rect};
use crate::numerals::generation_label;
use crate::spatial::MemberBox;

/// Interactive state a scene depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Members whose descendants are hidden.
    pub collapsed: BTreeSet<MemberId>,
    /// Member whose lineage is highlighted.
    pub focus: Option<MemberId>,
}

/// A member card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberNode {
    pub id: MemberId,
    /// Top-left corner of the card.
    pub position: Point,
    pub data: FamilyMember,
    pub has_children: bool,
    pub collapsed: bool,
    /// Shaded branch color; roots have none.
    pub branch_color: Option<HslColor>,
    /// The focused member itself.
    pub is_highlighted: bool,
    /// On the focused member's lineage.
    pub is_path_highlighted: bool,
    /// A focus exists and this card is off its lineage.
    pub is_dimmed: bool,
}

/// A `第N世` label to the left of a rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationLabelNode {
    pub generation: i32,
    pub label: String,
    pub position: Point,
    pub is_dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TreeNode {
    FamilyMember(MemberNode),
    GenerationLabel(GenerationLabelNode),
}

impl TreeNode {
    pub fn as_member(&self) -> Option<&MemberNode> {
        match self {
            Self::FamilyMember(node) => Some(node),
            Self::GenerationLabel(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&GenerationLabelNode> {
        match self {
            Self::GenerationLabel(label) => Some(label),
            Self::FamilyMember(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeEdge {
    /// `e{father}-{child}`.
    pub id: EdgeKey,
    pub source: MemberId,
    pub target: MemberId,
    /// Unshaded branch color of the target.
    pub color: Option<HslColor>,
    pub is_path_highlighted: bool,
    pub is_dimmed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeScene {
    /// Member cards in visible order, then labels by ascending generation.
    pub nodes: Vec<TreeNode>,
    pub edges: Vec<TreeEdge>,
    pub node_width: f32,
    pub node_height: f32,
}

impl TreeScene {
    pub fn members(&self) -> impl Iterator<Item = &MemberNode> {
        self.nodes.iter().filter_map(TreeNode::as_member)
    }

    pub fn labels(&self) -> impl Iterator<Item = &GenerationLabelNode> {
        self.nodes.iter().filter_map(TreeNode::as_label)
    }

    pub fn member(&self, id: MemberId) -> Option<&MemberNode> {
        self.members().find(|node| node.id == id)
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&TreeEdge> {
        self.edges.iter().find(|edge| edge.id == key)
    }

    /// Bounding rectangle of all member cards, or None for an empty scene.
    pub fn bounds(&self) -> Option<Rect> {
        self.member_boxes()
            .into_iter()
            .map(|card| Rect {
                min_x: card.min[0],
                min_y: card.min[1],
                max_x: card.max[0],
                max_y: card.max[1],
            })
            .reduce(Rect::union)
    }

    /// Card boxes for hit testing.
    pub fn member_boxes(&self) -> Vec<MemberBox> {
        self.members()
            .map(|node| MemberBox::new(node.id, node.position, self.node_width, self.node_height))
            .collect()
    }
}

/// Build the scene for the current view state.
pub fn build_scene(forest: &FamilyForest, state: &ViewState, config: &LayoutConfig) -> TreeScene {
    let visible = forest.assemble_visible(&state.collapsed);
    let layout = compute_layout(&visible, config);
    let colors = compute_branch_colors(forest);
    let path = compute_highlight_path(forest, state.focus);
    let has_focus = !path.is_empty();

    let mut nodes: Vec<TreeNode> = visible
        .members
        .iter()
        .filter_map(|member| {
            let position = layout.top_left(member.id)?;
            let on_path = path.contains_node(member.id);
            Some(TreeNode::FamilyMember(MemberNode {
                id: member.id,
                position,
                data: (*member).clone(),
                has_children: forest.has_children(member.id),
                collapsed: state.collapsed.contains(&member.id),
                branch_color: colors.node_color(forest, member),
                is_highlighted: path.focus == Some(member.id),
                is_path_highlighted: on_path,
                is_dimmed: has_focus && !on_path,
            }))
        })
        .collect();

    nodes.extend(layout.generation_labels.iter().map(|(&generation, &position)| {
        TreeNode::GenerationLabel(GenerationLabelNode {
            generation,
            label: generation_label(generation),
            position,
            is_dimmed: has_focus,
        })
    }));

    let edges = layout
        .edges
        .iter()
        .map(|&edge| {
            let on_path = path.contains_edge(edge);
            TreeEdge {
                id: edge,
                source: edge.father,
                target: edge.child,
                color: colors.edge_color(edge),
                is_path_highlighted: on_path,
                is_dimmed: has_focus && !on_path,
            }
        })
        .collect();

    TreeScene {
        nodes,
        edges,
        node_width: layout.node_width,
        node_height: layout.node_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> FamilyForest {
        FamilyForest::new(vec![
            FamilyMember::new(1, "始祖").with_generation(1),
            FamilyMember::new(2, "长子").with_father(1).with_generation(2),
            FamilyMember::new(3, "次子").with_father(1).with_generation(2),
            FamilyMember::new(4, "长孙").with_father(2).with_generation(3),
        ])
        .unwrap()
    }

    fn scene(state: &ViewState) -> TreeScene {
        build_scene(&forest(), state, &LayoutConfig::default())
    }

    #[test]
    fn test_members_then_labels() {
        let scene = scene(&ViewState::default());

        let kinds: Vec<&str> = scene
            .nodes
            .iter()
            .map(|node| match node {
                TreeNode::FamilyMember(_) => "member",
                TreeNode::GenerationLabel(_) => "label",
            })
            .collect();
        assert_eq!(kinds, vec!["member", "member", "member", "member", "label", "label", "label"]);

        let labels: Vec<&str> = scene.labels().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["第一世", "第二世", "第三世"]);
        assert_eq!(scene.edges.len(), 3);
    }

    #[test]
    fn test_colors_and_flags_without_focus() {
        let scene = scene(&ViewState::default());

        let root = scene.member(MemberId(1)).unwrap();
        assert!(root.branch_color.is_none());
        assert!(root.has_children);
        assert!(!root.is_dimmed);

        let head = scene.member(MemberId(2)).unwrap();
        let grandson = scene.member(MemberId(4)).unwrap();
        assert_eq!(head.branch_color.map(|c| c.h), grandson.branch_color.map(|c| c.h));
        assert!(!grandson.has_children);

        let edge = scene.edge(EdgeKey::new(MemberId(2), MemberId(4))).unwrap();
        assert_eq!(edge.color, head.branch_color);
        assert!(!edge.is_dimmed);
    }

    #[test]
    fn test_focus_dims_off_path() {
        let state = ViewState {
            focus: Some(MemberId(2)),
            ..ViewState::default()
        };
        let scene = scene(&state);

        let focused = scene.member(MemberId(2)).unwrap();
        assert!(focused.is_highlighted && focused.is_path_highlighted && !focused.is_dimmed);
        assert!(scene.member(MemberId(1)).unwrap().is_path_highlighted);
        assert!(scene.member(MemberId(4)).unwrap().is_path_highlighted);
        assert!(scene.member(MemberId(3)).unwrap().is_dimmed);
        assert!(scene.labels().all(|label| label.is_dimmed));

        let off = scene.edge(EdgeKey::new(MemberId(1), MemberId(3))).unwrap();
        assert!(off.is_dimmed && !off.is_path_highlighted);
        let on = scene.edge(EdgeKey::new(MemberId(1), MemberId(2))).unwrap();
        assert!(on.is_path_highlighted && !on.is_dimmed);
    }

    #[test]
    fn test_collapsed_member() {
        let state = ViewState {
            collapsed: [MemberId(2)].into_iter().collect(),
            ..ViewState::default()
        };
        let scene = scene(&state);

        assert!(scene.member(MemberId(4)).is_none());
        let collapsed = scene.member(MemberId(2)).unwrap();
        assert!(collapsed.collapsed && collapsed.has_children);
        assert_eq!(scene.labels().count(), 2);
    }

    #[test]
    fn test_bounds() {
        let scene = scene(&ViewState::default());
        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(bounds.max_y, 2.0 * 240.0 + 120.0);
        assert_eq!(scene.member_boxes().len(), 4);

        let empty = build_scene(&FamilyForest::empty(), &ViewState::default(), &LayoutConfig::default());
        assert!(empty.bounds().is_none());
        assert!(empty.nodes.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let scene = scene(&ViewState::default());
        let json = serde_json::to_value(&scene).unwrap();

        assert_eq!(json["nodes"][0]["type"], "familyMember");
        assert_eq!(json["nodes"][0]["data"]["name"], "始祖");
        assert_eq!(json["nodes"][4]["type"], "generationLabel");
        assert_eq!(json["edges"][0]["id"], "e1-2");
        assert!(json["edges"][0]["color"].as_str().unwrap().starts_with("hsl("));
    }
}
