//! Lineage Graph - WASM Module
//!
//! This module provides the core data structures and algorithms for the
//! Lineage Graph family tree viewer. It is compiled to WebAssembly and
//! exposes a JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Validated father→child forest on petgraph's StableGraph
//! - `layout`: Layered tree layout and lifespan timeline (CPU-side)
//! - `color`, `highlight`, `tour`: Branch colors, lineage highlight, paths
//! - `scene`: Render-ready nodes and edges for the tree view
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing
//! - `explorer`: One interactive session tying the above together

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod explorer;
pub mod graph;
pub mod highlight;
pub mod layout;
pub mod logging;
pub mod numerals;
pub mod scene;
pub mod spatial;
pub mod statistics;
pub mod tour;

pub use error::LineageError;
pub use explorer::TreeExplorer;
pub use graph::{FamilyForest, FamilyMember, MemberId};

use layout::{LayoutConfig, TimelineConfig};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init_console_logger();
}

/// Thrown as a JS `Error`; errors about one member also carry `memberId`.
impl From<LineageError> for JsValue {
    fn from(err: LineageError) -> Self {
        let js_err = js_sys::Error::new(&err.to_string());
        if let Some(member_id) = err.member_id() {
            // Setting a property on a fresh Error cannot fail
            let _ = js_sys::Reflect::set(
                &js_err,
                &JsValue::from_str("memberId"),
                &JsValue::from(member_id.raw()),
            );
        }
        js_err.into()
    }
}

/// Serialize into plain JS objects and arrays.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| LineageError::from(err).into())
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|err| LineageError::from(err).into())
}

/// Main entry point for the family tree viewer.
///
/// This struct wraps the internal TreeExplorer and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct LineageGraph {
    explorer: TreeExplorer,
}

#[wasm_bindgen]
impl LineageGraph {
    /// Create an explorer with no members.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            explorer: TreeExplorer::new(),
        }
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Load member rows (an array of plain objects, one per table row).
    ///
    /// Throws on duplicate ids, blank names or a `father_id` cycle; the
    /// previously loaded data stays in place.
    #[wasm_bindgen(js_name = loadMembers)]
    pub fn load_members(&mut self, members: JsValue) -> Result<(), JsValue> {
        let members: Vec<FamilyMember> = from_js(members)?;
        self.explorer.load_members(members)?;
        Ok(())
    }

    /// Get the number of loaded members.
    #[wasm_bindgen(js_name = memberCount)]
    pub fn member_count(&self) -> u32 {
        self.explorer.forest().len() as u32
    }

    /// Override layout settings. Missing fields keep their defaults.
    #[wasm_bindgen(js_name = setLayoutConfig)]
    pub fn set_layout_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: LayoutConfig = from_js(config)?;
        self.explorer.set_layout_config(config);
        Ok(())
    }

    /// Override timeline settings. Missing fields keep their defaults.
    #[wasm_bindgen(js_name = setTimelineConfig)]
    pub fn set_timeline_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: TimelineConfig = from_js(config)?;
        self.explorer.set_timeline_config(config);
        Ok(())
    }

    // =========================================================================
    // Collapse State
    // =========================================================================

    /// Flip a member's collapsed flag. Returns the new flag.
    #[wasm_bindgen(js_name = toggleCollapse)]
    pub fn toggle_collapse(&mut self, member_id: u32) -> Result<bool, JsValue> {
        Ok(self.explorer.toggle_collapse(MemberId(member_id))?)
    }

    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) {
        self.explorer.expand_all();
    }

    #[wasm_bindgen(js_name = collapseAll)]
    pub fn collapse_all(&mut self) {
        self.explorer.collapse_all();
    }

    /// Collapsed member ids, ascending.
    #[wasm_bindgen(js_name = collapsedIds)]
    pub fn collapsed_ids(&self) -> Vec<u32> {
        self.explorer.collapsed_ids().iter().map(|id| id.raw()).collect()
    }

    // =========================================================================
    // Focus & Search
    // =========================================================================

    pub fn focus(&mut self, member_id: u32) -> Result<(), JsValue> {
        Ok(self.explorer.focus(MemberId(member_id))?)
    }

    #[wasm_bindgen(js_name = clearFocus)]
    pub fn clear_focus(&mut self) {
        self.explorer.clear_focus();
    }

    /// Find a member by name, reveal and focus it.
    ///
    /// Returns the member id, or undefined when nothing matches.
    pub fn search(&mut self, query: &str) -> Option<u32> {
        self.explorer.search(query).map(MemberId::raw)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Compute the tree scene: `{ nodes, edges, node_width, node_height }`.
    ///
    /// Also refreshes the index behind `memberAt`.
    #[wasm_bindgen(js_name = computeScene)]
    pub fn compute_scene(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.explorer.scene())
    }

    /// Lineage of the focused member: `{ focus, node_ids, edge_ids }`.
    #[wasm_bindgen(js_name = computeHighlightPath)]
    pub fn compute_highlight_path(&self) -> Result<JsValue, JsValue> {
        to_js(&self.explorer.highlight_path())
    }

    /// Members on the path between two members, both inclusive.
    #[wasm_bindgen(js_name = findPath)]
    pub fn find_path(&self, start: u32, end: u32) -> Result<JsValue, JsValue> {
        let path = self.explorer.find_path(MemberId(start), MemberId(end))?;
        to_js(&path)
    }

    #[wasm_bindgen(js_name = computeTimeline)]
    pub fn compute_timeline(&self, current_year: i32) -> Result<JsValue, JsValue> {
        to_js(&self.explorer.timeline(current_year))
    }

    /// Find a timeline bar by name: `{ id, focus }`, or null.
    #[wasm_bindgen(js_name = searchTimeline)]
    pub fn search_timeline(&self, query: &str, current_year: i32) -> Result<JsValue, JsValue> {
        to_js(&self.explorer.search_timeline(query, current_year))
    }

    #[wasm_bindgen(js_name = computeStatistics)]
    pub fn compute_statistics(&self, current_year: i32) -> Result<JsValue, JsValue> {
        to_js(&self.explorer.statistics(current_year))
    }

    // =========================================================================
    // Hit Testing
    // =========================================================================

    /// Member card under a point of the last computed scene.
    #[wasm_bindgen(js_name = memberAt)]
    pub fn member_at(&self, x: f32, y: f32) -> Option<u32> {
        self.explorer.member_at(x, y).map(MemberId::raw)
    }

    /// Member cards of the last computed scene intersecting a rectangle.
    #[wasm_bindgen(js_name = membersInRect)]
    pub fn members_in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<u32> {
        self.explorer
            .members_in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(MemberId::raw)
            .collect()
    }

    /// Generation for a new child of `father_id`, if the father has one.
    #[wasm_bindgen(js_name = suggestGeneration)]
    pub fn suggest_generation(&self, father_id: u32) -> Option<i32> {
        self.explorer.suggest_generation(MemberId(father_id))
    }
}

impl Default for LineageGraph {
    fn default() -> Self {
        Self::new()
    }
}
