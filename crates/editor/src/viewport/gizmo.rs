//! Gizmo handle geometry, hit testing and drag mapping

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use shared::GizmoMode;

use super::camera::OrbitCamera;
use super::mesh::LineMeshData;
use super::picking::Ray;
use crate::state::GizmoAxis;

/// Handle length as a fraction of the camera distance
const SIZE_FACTOR: f32 = 0.15;
/// Pick tolerance as a fraction of the handle length
const PICK_FACTOR: f32 = 0.08;
const RING_SEGMENTS: usize = 48;

/// World-space handle length for a gizmo at `center`, constant on screen
pub fn gizmo_size(camera: &OrbitCamera, center: Vec3) -> f32 {
    (camera.eye_position() - center).length() * SIZE_FACTOR
}

fn axis_color(axis: GizmoAxis, highlight: bool) -> [f32; 4] {
    if highlight {
        return [1.0, 0.85, 0.1, 1.0];
    }
    match axis {
        GizmoAxis::X => [0.9, 0.2, 0.2, 1.0],
        GizmoAxis::Y => [0.2, 0.8, 0.2, 1.0],
        GizmoAxis::Z => [0.2, 0.3, 0.9, 1.0],
    }
}

/// Two unit vectors spanning the plane perpendicular to `axis`
fn ring_basis(axis: GizmoAxis) -> (Vec3, Vec3) {
    match axis {
        GizmoAxis::X => (Vec3::Y, Vec3::Z),
        GizmoAxis::Y => (Vec3::Z, Vec3::X),
        GizmoAxis::Z => (Vec3::X, Vec3::Y),
    }
}

/// Handle lines for `mode` at `center`: arrows for translate, rings for
/// rotate, box-tipped stems for scale. `active` is drawn highlighted.
pub fn build_gizmo_lines(
    mode: GizmoMode,
    center: Vec3,
    size: f32,
    active: Option<GizmoAxis>,
) -> LineMeshData {
    let mut lines = LineMeshData::default();

    for axis in GizmoAxis::all() {
        let color = axis_color(axis, active == Some(axis));
        let dir = axis.direction();
        let tip = center + dir * size;
        let (u, v) = ring_basis(axis);

        match mode {
            GizmoMode::Translate => {
                lines.push_segment(center, tip, color);
                let arrow = size * 0.15;
                let back = tip - dir * arrow;
                lines.push_segment(tip, back + u * arrow * 0.5, color);
                lines.push_segment(tip, back - u * arrow * 0.5, color);
                lines.push_segment(tip, back + v * arrow * 0.5, color);
                lines.push_segment(tip, back - v * arrow * 0.5, color);
            }
            GizmoMode::Rotate => {
                let point = |i: usize| {
                    let a = i as f32 / RING_SEGMENTS as f32 * TAU;
                    center + (u * a.cos() + v * a.sin()) * size
                };
                for i in 0..RING_SEGMENTS {
                    lines.push_segment(point(i), point(i + 1), color);
                }
            }
            GizmoMode::Scale => {
                lines.push_segment(center, tip, color);
                let h = size * 0.06;
                let corners = [u * h + v * h, u * h - v * h, -u * h - v * h, -u * h + v * h];
                for i in 0..4 {
                    lines.push_segment(tip + corners[i], tip + corners[(i + 1) % 4], color);
                }
            }
        }
    }

    lines
}

/// Which handle the ray grabs, if any
pub fn gizmo_hit_test(mode: GizmoMode, ray: &Ray, center: Vec3, size: f32) -> Option<GizmoAxis> {
    let threshold = size * PICK_FACTOR;
    let mut best: Option<(GizmoAxis, f32)> = None;

    for axis in GizmoAxis::all() {
        let dist = match mode {
            GizmoMode::Translate | GizmoMode::Scale => {
                ray_line_distance(ray, center, center + axis.direction() * size)
            }
            GizmoMode::Rotate => ray_ring_distance(ray, center, axis.direction(), size),
        };
        let Some(dist) = dist else {
            continue;
        };
        if dist < threshold && best.as_ref().is_none_or(|(_, d)| dist < *d) {
            best = Some((axis, dist));
        }
    }

    best.map(|(axis, _)| axis)
}

/// Map a pointer move from `from` to `to` (screen pixels, y down) onto
/// a drag amount for [`crate::state::TransformGizmo::apply_drag`].
///
/// Translate and scale project the move onto the axis as it appears on
/// screen; rotate uses the angle swept around the gizmo center.
pub fn drag_amount(
    mode: GizmoMode,
    axis: GizmoAxis,
    camera: &OrbitCamera,
    center: Vec3,
    from: Vec2,
    to: Vec2,
    to_screen: impl Fn(Vec3) -> Option<Vec2>,
) -> f32 {
    let Some(c) = to_screen(center) else {
        return 0.0;
    };

    match mode {
        GizmoMode::Translate | GizmoMode::Scale => {
            let Some(p1) = to_screen(center + axis.direction()) else {
                return 0.0;
            };
            let screen_axis = p1 - c;
            let len = screen_axis.length();
            if len < 1.0 {
                return 0.0;
            }
            // 1 world unit = len pixels
            (to - from).dot(screen_axis / len) / len
        }
        GizmoMode::Rotate => {
            let a = from - c;
            let b = to - c;
            if a.length_squared() < 1.0 || b.length_squared() < 1.0 {
                return 0.0;
            }
            // Screen y points down, so a positive perp_dot is clockwise
            let swept = -a.perp_dot(b).atan2(a.dot(b));
            let facing = axis.direction().dot(camera.eye_position() - center);
            if facing >= 0.0 {
                swept
            } else {
                -swept
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────

/// Minimum distance between a ray and a line segment.
fn ray_line_distance(ray: &Ray, line_start: Vec3, line_end: Vec3) -> Option<f32> {
    let u = ray.direction;
    let v = line_end - line_start;
    let w = ray.origin - line_start;

    let a = u.dot(u);
    let b = u.dot(v);
    let c = v.dot(v);
    let d = u.dot(w);
    let e = v.dot(w);

    if a < 1e-12 || c < 1e-12 {
        return None;
    }

    let denom = a * c - b * b;
    let (sc, tc) = if denom < 1e-7 {
        // Nearly parallel
        (0.0, e / c)
    } else {
        ((b * e - c * d) / denom, (a * e - b * d) / denom)
    };

    let tc = tc.clamp(0.0, 1.0);
    let sc = sc.max(0.0);

    let closest_ray = ray.origin + u * sc;
    let closest_line = line_start + v * tc;
    Some((closest_ray - closest_line).length())
}

/// Distance from the ring of `radius` around `normal` to where the ray
/// crosses the ring's plane
fn ray_ring_distance(ray: &Ray, center: Vec3, normal: Vec3, radius: f32) -> Option<f32> {
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (center - ray.origin).dot(normal) / denom;
    if t <= 0.0 {
        return None;
    }
    let hit = ray.at(t);
    Some(((hit - center).length() - radius).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_hit_on_x_handle() {
        let ray = Ray {
            origin: Vec3::new(0.5, 5.0, 0.0),
            direction: Vec3::NEG_Y,
        };
        assert_eq!(
            gizmo_hit_test(GizmoMode::Translate, &ray, Vec3::ZERO, 1.0),
            Some(GizmoAxis::X)
        );
    }

    #[test]
    fn test_translate_miss() {
        let ray = Ray {
            origin: Vec3::new(3.0, 5.0, 3.0),
            direction: Vec3::NEG_Y,
        };
        assert_eq!(gizmo_hit_test(GizmoMode::Translate, &ray, Vec3::ZERO, 1.0), None);
    }

    #[test]
    fn test_rotate_hit_on_y_ring() {
        let ray = Ray {
            origin: Vec3::new(1.0, 5.0, 0.0),
            direction: Vec3::NEG_Y,
        };
        assert_eq!(
            gizmo_hit_test(GizmoMode::Rotate, &ray, Vec3::ZERO, 1.0),
            Some(GizmoAxis::Y)
        );
    }

    #[test]
    fn test_line_counts_per_mode() {
        let t = build_gizmo_lines(GizmoMode::Translate, Vec3::ZERO, 1.0, None);
        assert_eq!(t.vertex_count(), 3 * 5 * 2);
        let r = build_gizmo_lines(GizmoMode::Rotate, Vec3::ZERO, 1.0, Some(GizmoAxis::X));
        assert_eq!(r.vertex_count(), 3 * RING_SEGMENTS * 2);
        let s = build_gizmo_lines(GizmoMode::Scale, Vec3::ZERO, 1.0, None);
        assert_eq!(s.vertex_count(), 3 * 5 * 2);
    }

    #[test]
    fn test_drag_along_screen_axis() {
        let camera = OrbitCamera::default();
        // Orthographic stand-in: x maps to +100 px per unit
        let to_screen = |p: Vec3| Some(Vec2::new(p.x * 100.0, -p.y * 100.0));
        let amount = drag_amount(
            GizmoMode::Translate,
            GizmoAxis::X,
            &camera,
            Vec3::ZERO,
            Vec2::ZERO,
            Vec2::new(50.0, 0.0),
            to_screen,
        );
        assert!((amount - 0.5).abs() < 1e-5);
    }
}
