//! 3D viewport panel with OpenGL rendering

mod gizmo;
mod gl_renderer;
mod overlays;
pub use room_editor_lib::viewport::{camera, mesh, picking};

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use egui::Ui;
use glam::{Vec2, Vec3};

use crate::scene::{shadow_matrix, DrawItem, NodeId, SceneGraph, SHADOW_PLANE_Y};
use crate::state::{ClickEvent, Editor};
use gizmo::{build_gizmo_lines, drag_amount, gizmo_hit_test, gizmo_size};
use gl_renderer::GlRenderer;
use mesh::{LineMeshData, MeshData};
use overlays::{to_ndc, to_screen};

/// Base gizmo line width in logical points
const OVERLAY_LINE_WIDTH: f32 = 2.0;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Pointer position at the previous gizmo drag step
    drag_last: Option<Vec2>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            gl_renderer: None,
            drag_last: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("GL renderer init failed: {e}"),
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, editor: &mut Editor) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        editor.resize(rect.width(), rect.height(), ui.ctx().pixels_per_point());

        // ── Gizmo and camera controls ─────────────────────────────
        self.handle_gizmo_and_camera(&response, ui, rect, editor);

        // ── Scroll zoom ─────────────────────────────
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                editor.host.camera.zoom(scroll * 0.002);
            }
        }

        // ── Clicks ──────────────────────────────────────
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                // Another layer (a floating window or popup) owns this point
                let over_controls = ui
                    .ctx()
                    .layer_id_at(pos)
                    .is_some_and(|layer| layer != ui.layer_id());
                let outcome = editor.handle_click(ClickEvent {
                    ndc: to_ndc(rect, pos),
                    over_controls,
                });
                tracing::debug!("click {:?}: {:?}", editor.mode(), outcome);
            }
        }

        if response.hovered() && editor.shows_crosshair() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        let overlay_lines = self.build_overlay_lines(&response, rect, editor);
        self.render_gl(ui, rect, editor, overlay_lines);
        self.draw_overlays(ui, rect, editor);
    }

    /// World position of the node the gizmo is attached to
    fn gizmo_center(editor: &Editor) -> Option<Vec3> {
        let id = editor.gizmo.attached()?;
        Some(editor.host.graph.world_matrix(id).transform_point3(Vec3::ZERO))
    }

    fn handle_gizmo_and_camera(
        &mut self,
        response: &egui::Response,
        ui: &Ui,
        rect: egui::Rect,
        editor: &mut Editor,
    ) {
        let pointer = response.interact_pointer_pos().map(|p| Vec2::new(p.x, p.y));

        // ── Gizmo drag start on LMB drag ───────────────────
        if response.drag_started_by(egui::PointerButton::Primary) && editor.gizmo.enabled {
            if let (Some(center), Some(pos)) = (Self::gizmo_center(editor), pointer) {
                let camera = &editor.host.camera;
                let ray = camera.ray_from_ndc(to_ndc(rect, egui::pos2(pos.x, pos.y)));
                let size = gizmo_size(camera, center);
                if let Some(axis) = gizmo_hit_test(editor.gizmo.mode, &ray, center, size) {
                    if editor.gizmo.begin_drag(axis) {
                        self.drag_last = Some(pos);
                    }
                }
            }
        }

        if let Some(axis) = editor.gizmo.dragging() {
            if response.dragged_by(egui::PointerButton::Primary) {
                if let (Some(center), Some(from), Some(to)) =
                    (Self::gizmo_center(editor), self.drag_last, pointer)
                {
                    let camera = &editor.host.camera;
                    let amount = drag_amount(editor.gizmo.mode, axis, camera, center, from, to, |p| {
                        to_screen(camera, rect, p)
                    });
                    editor.gizmo.apply_drag(&mut editor.host.graph, amount);
                    self.drag_last = Some(to);
                }
            }
            // End drag when button released
            if response.drag_stopped() || !response.dragged_by(egui::PointerButton::Primary) {
                editor.gizmo.end_drag();
                self.drag_last = None;
            }
            return;
        }

        // ── Camera controls (only when not dragging gizmo) ──
        let delta = response.drag_delta();
        if response.dragged_by(egui::PointerButton::Primary) {
            editor.host.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let speed = editor.host.camera.distance * 0.002;
            editor.host.camera.pan(-delta.x * speed, delta.y * speed);
        }

        if ui.input(|i| i.pointer.any_released()) {
            self.drag_last = None;
        }
    }

    /// Gizmo handles plus the add-wall preview, merged into one line set
    fn build_overlay_lines(
        &self,
        response: &egui::Response,
        rect: egui::Rect,
        editor: &Editor,
    ) -> Option<LineMeshData> {
        let mut lines = LineMeshData::default();

        if editor.gizmo.enabled {
            if let Some(center) = Self::gizmo_center(editor) {
                let size = gizmo_size(&editor.host.camera, center);
                let handles =
                    build_gizmo_lines(editor.gizmo.mode, center, size, editor.gizmo.dragging());
                lines.vertices.extend(handles.vertices);
            }
        }

        if let Some(start) = editor.pending_wall_start() {
            let hover = response
                .hover_pos()
                .map(|pos| editor.host.camera.ray_from_ndc(to_ndc(rect, pos)))
                .and_then(|ray| editor.floor_hit(&ray));
            lines.vertices.extend(overlays::wall_preview(start, hover).vertices);
        }

        (lines.vertex_count() > 0).then_some(lines)
    }

    fn render_gl(
        &self,
        ui: &mut Ui,
        rect: egui::Rect,
        editor: &Editor,
        overlay_lines: Option<LineMeshData>,
    ) {
        let Some(gl_renderer) = &self.gl_renderer else {
            return;
        };

        let host = &editor.host;
        let items = host.draw_items();

        let live: HashSet<NodeId> = items.iter().map(|item| item.node).collect();
        let fresh = match gl_renderer.lock() {
            Ok(r) => meshes_to_upload(&items, &host.graph, |id| r.has_mesh(id)),
            Err(_) => Vec::new(),
        };

        let lights = &host.lights;
        let scale = |c: [f32; 3], k: f32| c.map(|v| v * k);
        let ambient = scale(lights.ambient_color.to_f32(), lights.ambient_intensity);
        let light_color = scale(lights.directional_color.to_f32(), lights.directional_intensity);
        let light_dir = lights.direction_to_light();
        let shadow = host
            .shadows
            .then(|| shadow_matrix(light_dir, SHADOW_PLANE_Y))
            .flatten();

        let view_proj = host.camera.view_projection();
        let background = host.background;
        let grid_settings = editor.settings.viewport.grid.clone();
        let overlay_width = OVERLAY_LINE_WIDTH * host.viewport.pixel_ratio;
        let target_size = host.viewport.physical();

        let renderer_clone = gl_renderer.clone();
        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let vp = info.viewport_in_pixels();
                let viewport = [
                    vp.left_px as f32,
                    vp.from_bottom_px as f32,
                    vp.width_px as f32,
                    vp.height_px as f32,
                ];

                if let Ok(mut r) = renderer_clone.lock() {
                    r.update_grid(gl, &grid_settings);
                    r.sync_meshes(gl, &fresh, &live);
                    r.sync_overlay(gl, overlay_lines.as_ref());

                    let render_params = gl_renderer::RenderParams {
                        viewport,
                        target_size,
                        view_proj,
                        background,
                        ambient,
                        light_color,
                        light_dir,
                        shadow,
                        grid_visible: grid_settings.visible,
                        overlay_width,
                    };
                    r.paint(gl, painter.intermediate_fbo(), &items, &render_params);
                }
            })),
        };

        ui.painter().add(callback);
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, editor: &Editor) {
        let painter = ui.painter_at(rect);
        let camera = &editor.host.camera;

        overlays::draw_axis_labels(&painter, rect, camera);
        overlays::draw_camera_info(&painter, rect, camera);
        overlays::draw_mode_hint(&painter, rect, editor);
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Geometry for every drawn node the GPU cache lacks.
///
/// Node meshes are immutable, so only missing ids need their geometry sent
/// over. A pass that never paints leaves them missing, and they go out
/// again next frame.
fn meshes_to_upload(
    items: &[DrawItem],
    graph: &SceneGraph,
    uploaded: impl Fn(NodeId) -> bool,
) -> Vec<(NodeId, MeshData)> {
    items
        .iter()
        .filter(|item| !uploaded(item.node))
        .filter_map(|item| {
            let mesh = graph.get(item.node)?.mesh.clone()?;
            Some((item.node, mesh))
        })
        .collect()
}
