//! Viewport overlay drawing (axis labels, hints, wall preview)

use egui::Painter;
use glam::{Vec2, Vec3};
use shared::EditorMode;

use super::camera::OrbitCamera;
use super::mesh::{floor_marker, LineMeshData};
use crate::i18n::t;
use crate::state::Editor;

const PREVIEW_COLOR: [f32; 4] = [1.0, 0.8, 0.2, 1.0];

/// Screen position of a world point inside `rect`
pub fn to_screen(camera: &OrbitCamera, rect: egui::Rect, point: Vec3) -> Option<Vec2> {
    let ndc = camera.project_ndc(point)?;
    Some(Vec2::new(
        rect.left() + (ndc.x + 1.0) * 0.5 * rect.width(),
        rect.top() + (1.0 - ndc.y) * 0.5 * rect.height(),
    ))
}

/// Normalized device coordinates of a screen position inside `rect`
pub fn to_ndc(rect: egui::Rect, pos: egui::Pos2) -> Vec2 {
    Vec2::new(
        (pos.x - rect.left()) / rect.width() * 2.0 - 1.0,
        1.0 - (pos.y - rect.top()) / rect.height() * 2.0,
    )
}

/// Marker on the pending wall start plus a rubber band to the hovered
/// floor point
pub fn wall_preview(start: Vec3, hover: Option<Vec3>) -> LineMeshData {
    let mut lines = floor_marker(start, 0.2, PREVIEW_COLOR);
    if let Some(end) = hover {
        let lift = Vec3::new(0.0, 0.01, 0.0);
        lines.push_segment(start + lift, end + lift, PREVIEW_COLOR);
    }
    lines
}

/// Draw axis labels in the viewport
pub fn draw_axis_labels(painter: &Painter, rect: egui::Rect, camera: &OrbitCamera) {
    let labels = [
        (Vec3::new(1.6, 0.0, 0.0), "X", egui::Color32::from_rgb(220, 70, 70)),
        (Vec3::new(0.0, 1.6, 0.0), "Y", egui::Color32::from_rgb(70, 200, 70)),
        (Vec3::new(0.0, 0.0, 1.6), "Z", egui::Color32::from_rgb(70, 110, 220)),
    ];

    for (pos, label, color) in labels {
        if let Some(screen) = to_screen(camera, rect, pos) {
            let screen = egui::pos2(screen.x, screen.y);
            if rect.contains(screen) {
                painter.text(
                    screen,
                    egui::Align2::LEFT_BOTTOM,
                    label,
                    egui::FontId::monospace(12.0),
                    color,
                );
            }
        }
    }
}

/// One-line instruction for the active tool along the bottom edge
pub fn draw_mode_hint(painter: &Painter, rect: egui::Rect, editor: &Editor) {
    let hint = match editor.mode() {
        EditorMode::AddWall if editor.pending_wall_start().is_some() => t("hint.add_wall_end"),
        EditorMode::AddWall => t("hint.add_wall_start"),
        EditorMode::AddWindow => t("hint.add_window"),
        EditorMode::AddDoor => t("hint.add_door"),
        EditorMode::Select => t("hint.select"),
        _ if editor.gizmo.attached().is_some() => t("hint.gizmo"),
        _ => return,
    };

    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 20.0),
        egui::Align2::CENTER_BOTTOM,
        hint,
        egui::FontId::proportional(12.0),
        egui::Color32::from_rgb(200, 200, 210),
    );
}

pub fn draw_camera_info(painter: &Painter, rect: egui::Rect, camera: &OrbitCamera) {
    let overlay_rect = egui::Rect::from_min_size(
        egui::pos2(rect.right() - 140.0, rect.top() + 4.0),
        egui::vec2(136.0, 44.0),
    );
    painter.rect_filled(
        overlay_rect,
        4.0,
        egui::Color32::from_rgba_premultiplied(0, 0, 0, 140),
    );
    painter.text(
        overlay_rect.min + egui::vec2(6.0, 4.0),
        egui::Align2::LEFT_TOP,
        format!(
            "Dist: {:.1}\nYaw: {:.0}  Pitch: {:.0}",
            camera.distance,
            camera.yaw.to_degrees(),
            camera.pitch.to_degrees(),
        ),
        egui::FontId::monospace(10.0),
        egui::Color32::from_rgb(160, 160, 170),
    );
}
