//! TreeExplorer - one interactive session over a loaded family.
//!
//! The explorer owns the forest, the collapse/focus state and the layout
//! configuration, and recomputes derived views on demand. The only thing it
//! keeps between calls is the spatial index of the last built scene, used
//! for hit testing.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::graph::{FamilyForest, FamilyMember, MemberId};
use crate::highlight::{collapsed_ancestors, compute_highlight_path, find_by_name, HighlightPath};
use crate::layout::{compute_timeline, LayoutConfig, Timeline, TimelineConfig, TimelineHit};
use crate::scene::{build_scene, TreeScene, ViewState};
use crate::spatial::SpatialIndex;
use crate::statistics::{compute_statistics, Statistics};
use crate::tour;

/// Interactive exploration session.
#[derive(Default)]
pub struct TreeExplorer {
    forest: FamilyForest,
    state: ViewState,
    layout_config: LayoutConfig,
    timeline_config: TimelineConfig,
    index: SpatialIndex,
}

impl TreeExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the family data.
    ///
    /// Collapsed and focused ids that no longer exist are dropped; the rest
    /// of the view state carries over. On error the previous data is kept.
    pub fn load_members(&mut self, members: Vec<FamilyMember>) -> Result<()> {
        let forest = FamilyForest::new(members)?;

        let before = self.state.collapsed.len();
        self.state.collapsed.retain(|id| forest.contains(*id));
        self.state.focus = self.state.focus.filter(|id| forest.contains(*id));
        if self.state.collapsed.len() != before {
            log::debug!(
                "dropped {} collapsed ids missing from new data",
                before - self.state.collapsed.len()
            );
        }

        log::info!(
            "loaded {} members, {} roots",
            forest.len(),
            forest.roots().len()
        );
        self.forest = forest;
        self.index.clear();
        Ok(())
    }

    pub fn forest(&self) -> &FamilyForest {
        &self.forest
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout_config
    }

    /// Replace the layout configuration. Hit testing is unavailable until
    /// the next [`scene`](Self::scene).
    pub fn set_layout_config(&mut self, config: LayoutConfig) {
        self.layout_config = config;
        self.index.clear();
    }

    pub fn set_timeline_config(&mut self, config: TimelineConfig) {
        self.timeline_config = config;
    }

    // =========================================================================
    // Collapse state
    // =========================================================================

    /// Flip a member's collapsed flag. Returns the new flag.
    pub fn toggle_collapse(&mut self, id: MemberId) -> Result<bool> {
        self.forest.require(id)?;
        if self.state.collapsed.remove(&id) {
            Ok(false)
        } else {
            self.state.collapsed.insert(id);
            Ok(true)
        }
    }

    pub fn collapse(&mut self, id: MemberId) -> Result<()> {
        self.forest.require(id)?;
        self.state.collapsed.insert(id);
        Ok(())
    }

    pub fn expand(&mut self, id: MemberId) -> Result<()> {
        self.forest.require(id)?;
        self.state.collapsed.remove(&id);
        Ok(())
    }

    pub fn expand_all(&mut self) {
        self.state.collapsed.clear();
    }

    /// Collapse every member that has children.
    pub fn collapse_all(&mut self) {
        self.state.collapsed = self
            .forest
            .members()
            .iter()
            .map(|m| m.id)
            .filter(|&id| self.forest.has_children(id))
            .collect();
    }

    pub fn is_collapsed(&self, id: MemberId) -> bool {
        self.state.collapsed.contains(&id)
    }

    pub fn collapsed_ids(&self) -> &BTreeSet<MemberId> {
        &self.state.collapsed
    }

    // =========================================================================
    // Focus and search
    // =========================================================================

    pub fn focus(&mut self, id: MemberId) -> Result<()> {
        self.forest.require(id)?;
        self.state.focus = Some(id);
        Ok(())
    }

    pub fn clear_focus(&mut self) {
        self.state.focus = None;
    }

    pub fn focused(&self) -> Option<MemberId> {
        self.state.focus
    }

    /// Find a member by name, expand whatever hides it and focus it.
    ///
    /// Clears the focus when nothing matches.
    pub fn search(&mut self, query: &str) -> Option<MemberId> {
        let Some(found) = find_by_name(&self.forest, query).map(|m| m.id) else {
            log::debug!("search {query:?}: no match");
            self.state.focus = None;
            return None;
        };

        for ancestor in collapsed_ancestors(&self.forest, found, &self.state.collapsed) {
            self.state.collapsed.remove(&ancestor);
        }
        self.state.focus = Some(found);
        log::debug!("search {query:?}: focused {found}");
        Some(found)
    }

    pub fn highlight_path(&self) -> HighlightPath {
        compute_highlight_path(&self.forest, self.state.focus)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Build the scene for the current state and refresh the hit-test index.
    pub fn scene(&mut self) -> TreeScene {
        let scene = build_scene(&self.forest, &self.state, &self.layout_config);
        self.index.rebuild(scene.member_boxes());
        scene
    }

    /// Member card at a point of the last built scene.
    pub fn member_at(&self, x: f32, y: f32) -> Option<MemberId> {
        self.index.member_at(x, y)
    }

    /// Member cards of the last built scene intersecting a rectangle.
    pub fn members_in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<MemberId> {
        self.index.members_in_rect(min_x, min_y, max_x, max_y)
    }

    pub fn find_path(&self, start: MemberId, end: MemberId) -> Result<Vec<&FamilyMember>> {
        tour::find_path(&self.forest, start, end)
    }

    pub fn suggest_generation(&self, father_id: MemberId) -> Option<i32> {
        self.forest.suggest_generation(father_id)
    }

    pub fn timeline(&self, current_year: i32) -> Timeline {
        compute_timeline(self.forest.members(), current_year, &self.timeline_config)
    }

    /// First timeline bar whose name contains the query. Unlike
    /// [`search`](Self::search) this is case-sensitive and leaves the tree
    /// state alone.
    pub fn search_timeline(&self, query: &str, current_year: i32) -> Option<TimelineHit> {
        let timeline = self.timeline(current_year);
        let hit = timeline.find_by_name(query).map(TimelineHit::from);
        log::debug!("timeline search {query:?}: {:?}", hit.map(|h| h.id));
        hit
    }

    pub fn statistics(&self, current_year: i32) -> Statistics {
        compute_statistics(self.forest.members(), current_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineageError;

    fn members() -> Vec<FamilyMember> {
        vec![
            FamilyMember::new(1, "王祖").with_generation(1),
            FamilyMember::new(2, "王大").with_father(1).with_generation(2),
            FamilyMember::new(3, "王二").with_father(1).with_generation(2),
            FamilyMember::new(4, "王小明").with_father(2).with_generation(3),
            FamilyMember::new(5, "王小红").with_father(4).with_generation(4),
        ]
    }

    fn explorer() -> TreeExplorer {
        let mut explorer = TreeExplorer::new();
        explorer.load_members(members()).unwrap();
        explorer
    }

    #[test]
    fn test_toggle_collapse() {
        let mut explorer = explorer();
        assert_eq!(explorer.toggle_collapse(MemberId(2)), Ok(true));
        assert!(explorer.is_collapsed(MemberId(2)));
        assert_eq!(explorer.toggle_collapse(MemberId(2)), Ok(false));
        assert_eq!(
            explorer.toggle_collapse(MemberId(99)),
            Err(LineageError::NotFound { member_id: MemberId(99) })
        );
    }

    #[test]
    fn test_collapse_all_and_expand_all() {
        let mut explorer = explorer();
        explorer.collapse_all();
        let collapsed: Vec<u32> = explorer.collapsed_ids().iter().map(|id| id.0).collect();
        assert_eq!(collapsed, vec![1, 2, 4]);

        let scene = explorer.scene();
        assert_eq!(scene.members().count(), 1);

        explorer.expand_all();
        assert!(explorer.collapsed_ids().is_empty());
        assert_eq!(explorer.scene().members().count(), 5);
    }

    #[test]
    fn test_search_expands_and_focuses() {
        let mut explorer = explorer();
        explorer.collapse_all();

        assert_eq!(explorer.search("小红"), Some(MemberId(5)));
        assert_eq!(explorer.focused(), Some(MemberId(5)));
        // Ancestors 1, 2, 4 were collapsed and hid member 5
        assert!(explorer.collapsed_ids().is_empty());
        assert!(explorer.scene().member(MemberId(5)).is_some());
    }

    #[test]
    fn test_search_miss_clears_focus() {
        let mut explorer = explorer();
        explorer.focus(MemberId(3)).unwrap();
        assert_eq!(explorer.search("李"), None);
        assert_eq!(explorer.focused(), None);
    }

    #[test]
    fn test_highlight_path_follows_focus() {
        let mut explorer = explorer();
        assert!(explorer.highlight_path().is_empty());

        explorer.focus(MemberId(4)).unwrap();
        let path = explorer.highlight_path();
        assert!(path.contains_node(MemberId(1)));
        assert!(path.contains_node(MemberId(5)));
        assert!(!path.contains_node(MemberId(3)));

        explorer.clear_focus();
        assert!(explorer.highlight_path().is_empty());
    }

    #[test]
    fn test_reload_prunes_state() {
        let mut explorer = explorer();
        explorer.collapse(MemberId(2)).unwrap();
        explorer.collapse(MemberId(4)).unwrap();
        explorer.focus(MemberId(4)).unwrap();

        let mut reduced = members();
        reduced.truncate(3);
        explorer.load_members(reduced).unwrap();

        assert_eq!(explorer.collapsed_ids().iter().copied().collect::<Vec<_>>(), vec![MemberId(2)]);
        assert_eq!(explorer.focused(), None);
    }

    #[test]
    fn test_failed_load_keeps_previous_data() {
        let mut explorer = explorer();
        let bad = vec![FamilyMember::new(1, "A"), FamilyMember::new(1, "B")];
        assert!(explorer.load_members(bad).is_err());
        assert_eq!(explorer.forest().len(), 5);
    }

    #[test]
    fn test_member_at_uses_last_scene() {
        let mut explorer = explorer();
        assert_eq!(explorer.member_at(10.0, 10.0), None);

        let scene = explorer.scene();
        let root = scene.member(MemberId(1)).unwrap();
        let (x, y) = (root.position.x + 5.0, root.position.y + 5.0);
        assert_eq!(explorer.member_at(x, y), Some(MemberId(1)));

        explorer.set_layout_config(LayoutConfig::default());
        assert_eq!(explorer.member_at(x, y), None);
    }

    #[test]
    fn test_find_path_and_suggest_generation() {
        let explorer = explorer();
        let path: Vec<u32> = explorer
            .find_path(MemberId(5), MemberId(3))
            .unwrap()
            .iter()
            .map(|m| m.id.0)
            .collect();
        assert_eq!(path, vec![5, 4, 2, 1, 3]);

        assert_eq!(explorer.suggest_generation(MemberId(4)), Some(4));
        assert_eq!(explorer.suggest_generation(MemberId(99)), None);
    }

    #[test]
    fn test_search_timeline() {
        let mut dated = members();
        dated[3].birthday = chrono::NaiveDate::from_ymd_opt(1990, 3, 1);
        let mut explorer = TreeExplorer::new();
        explorer.load_members(dated).unwrap();
        explorer.collapse(MemberId(2)).unwrap();

        let hit = explorer.search_timeline("小明", 2024).unwrap();
        assert_eq!(hit.id, MemberId(4));
        let timeline = explorer.timeline(2024);
        let bar = &timeline.items[0];
        assert_eq!(hit.focus.x, bar.position.x + bar.width / 2.0);
        assert_eq!(hit.focus.y, bar.position.y);

        // Tree state is untouched, and undated members have no bar
        assert!(explorer.is_collapsed(MemberId(2)));
        assert_eq!(explorer.focused(), None);
        assert_eq!(explorer.search_timeline("王大", 2024), None);
    }

    #[test]
    fn test_timeline_and_statistics() {
        let explorer = explorer();
        assert!(explorer.timeline(2024).is_empty());

        let stats = explorer.statistics(2024);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.generations.len(), 4);
    }
}
