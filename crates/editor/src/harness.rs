//! Headless harness for driving the editor without a window.
//!
//! Wraps an [`Editor`] and a lazily started [`ModelLoader`]. Model loads
//! block until their outcome arrives, so scripts and tests see results in
//! order.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::Serialize;
use shared::{EditorMode, Rgb, RoomDimensions};

use crate::loader::ModelLoader;
use crate::scene::NodeId;
use crate::state::{ClickEvent, ClickOutcome, Editor, EditorSettings};
use crate::validation::MeshValidator;

/// One wall in an [`EditorSummary`]
#[derive(Debug, Clone, Serialize)]
pub struct WallSummary {
    pub id: String,
    pub name: String,
    pub position: [f32; 3],
    pub triangles: usize,
    /// Mesh problems found by [`MeshValidator`]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
}

/// One model root in an [`EditorSummary`]
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    pub position: [f32; 3],
    pub nodes: usize,
}

/// Serializable snapshot of the editor
#[derive(Debug, Clone, Serialize)]
pub struct EditorSummary {
    pub room: RoomDimensions,
    pub mode: EditorMode,
    pub walls: Vec<WallSummary>,
    pub models: Vec<ModelSummary>,
    pub clickables: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_wall_start: Option<[f32; 3]>,
    pub wall_color: Rgb,
}

/// Headless editor driver
pub struct EditorHarness {
    pub editor: Editor,
    loader: Option<ModelLoader>,
}

impl EditorHarness {
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            editor: Editor::new(settings),
            loader: None,
        }
    }

    // ── Room ──────────────────────────────────────────────────

    /// Regenerate the room from dimension field text
    pub fn generate_room(&mut self, width: &str, depth: &str, height: &str) -> Result<RoomDimensions, String> {
        self.editor
            .generate_room_from_text(width, depth, height)
            .map_err(|e| e.to_string())
    }

    /// Edit the room height field as the controls panel does
    pub fn set_height_field(&mut self, text: &str) {
        self.editor.set_height_input(text);
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.editor.set_mode(mode);
    }

    // ── Clicks ────────────────────────────────────────────────

    /// Click at normalized device coordinates
    pub fn click_ndc(&mut self, x: f32, y: f32) -> ClickOutcome {
        self.editor.handle_click(ClickEvent::at(Vec2::new(x, y)))
    }

    /// Click on the screen position of a world point.
    /// A point behind the camera or off screen misses.
    pub fn click_world(&mut self, point: Vec3) -> ClickOutcome {
        match self.editor.host.camera.project_ndc(point) {
            Some(ndc) if ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 => {
                self.editor.handle_click(ClickEvent::at(ndc))
            }
            _ => ClickOutcome::Missed,
        }
    }

    // ── Walls ─────────────────────────────────────────────────

    pub fn add_interior_wall(&mut self, start: Vec3, end: Vec3) -> NodeId {
        self.editor.add_interior_wall(start, end)
    }

    /// Wall id at `index` in the wall collection
    pub fn wall(&self, index: usize) -> Option<NodeId> {
        self.editor.registry.walls().get(index).copied()
    }

    /// Carve an opening into the wall at `index`. `Ok(None)` when the index
    /// or the kind name is unknown.
    pub fn carve_opening(&mut self, index: usize, point: Vec3, kind: &str) -> Result<Option<NodeId>, String> {
        let Some(wall) = self.wall(index) else {
            return Ok(None);
        };
        self.editor
            .carve_opening_by_name(wall, point, kind)
            .map_err(|e| e.to_string())
    }

    pub fn set_wall_color(&mut self, hex: &str) -> Result<Rgb, String> {
        let color = Rgb::from_hex(hex)?;
        self.editor.set_wall_color(color);
        Ok(color)
    }

    // ── Models ────────────────────────────────────────────────

    /// Import a model and place it at `position`, waiting for the result
    pub fn load_model(&mut self, path: &Path, position: Vec3) -> Result<NodeId, String> {
        if self.loader.is_none() {
            let loader = ModelLoader::new().map_err(|e| format!("Failed to start loader: {e}"))?;
            self.loader = Some(loader);
        }
        let Some(loader) = self.loader.as_mut() else {
            return Err("Loader unavailable".to_string());
        };

        let ticket = loader.load(path, position);
        while let Some(outcome) = loader.wait() {
            let mine = outcome.ticket == ticket;
            let placed = self.editor.apply_load_outcome(outcome);
            if mine {
                return placed.ok_or_else(|| {
                    self.editor
                        .last_load_error()
                        .unwrap_or("Load failed")
                        .to_string()
                });
            }
        }
        Err("Load never finished".to_string())
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn wall_count(&self) -> usize {
        self.editor.registry.walls().len()
    }

    pub fn model_count(&self) -> usize {
        self.editor.models().len()
    }

    pub fn attached(&self) -> Option<NodeId> {
        self.editor.gizmo.attached()
    }

    pub fn summary(&self) -> EditorSummary {
        let graph = &self.editor.host.graph;

        let walls = self
            .editor
            .registry
            .walls()
            .iter()
            .filter_map(|id| graph.get(*id))
            .map(|node| {
                let (triangles, problems) = match &node.mesh {
                    Some(mesh) => (mesh.triangle_count(), MeshValidator::new(mesh).validate_all()),
                    None => (0, vec!["Wall has no mesh".to_string()]),
                };
                WallSummary {
                    id: node.id.to_string(),
                    name: node.name.clone(),
                    position: node.transform.position.to_array(),
                    triangles,
                    problems,
                }
            })
            .collect();

        let models = self
            .editor
            .models()
            .into_iter()
            .filter_map(|id| graph.get(id))
            .map(|node| ModelSummary {
                id: node.id.to_string(),
                name: node.name.clone(),
                position: node.transform.position.to_array(),
                nodes: graph.subtree(node.id).len(),
            })
            .collect();

        EditorSummary {
            room: self.editor.room(),
            mode: self.editor.mode(),
            walls,
            models,
            clickables: self.editor.registry.clickables().len(),
            attached: self.attached().map(|id| id.to_string()),
            pending_wall_start: self.editor.pending_wall_start().map(|p| p.to_array()),
            wall_color: self.editor.host.wall_material.color,
        }
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_has_room() {
        let h = EditorHarness::new();
        assert_eq!(h.wall_count(), 3);
        assert_eq!(h.model_count(), 0);
        let summary = h.summary();
        assert_eq!(summary.walls.len(), 3);
        assert!(summary.walls.iter().all(|w| w.problems.is_empty()));
    }

    #[test]
    fn test_generate_room_rejects_text() {
        let mut h = EditorHarness::new();
        let before = h.editor.room();
        assert!(h.generate_room("abc", "6", "3").is_err());
        assert_eq!(h.editor.room(), before);
    }

    #[test]
    fn test_carve_by_index_out_of_range() {
        let mut h = EditorHarness::new();
        assert_eq!(h.carve_opening(9, Vec3::ZERO, "window"), Ok(None));
    }

    #[test]
    fn test_set_wall_color_invalid() {
        let mut h = EditorHarness::new();
        assert!(h.set_wall_color("not-a-color").is_err());
        assert_eq!(h.set_wall_color("#112233"), Ok(Rgb([0x11, 0x22, 0x33])));
    }

    #[test]
    fn test_summary_serializes() {
        let h = EditorHarness::new();
        let json = serde_json::to_value(h.summary()).unwrap();
        assert_eq!(json["mode"], "translate");
        assert_eq!(json["walls"].as_array().unwrap().len(), 3);
        assert!(json.get("pending_wall_start").is_none());
    }
}
