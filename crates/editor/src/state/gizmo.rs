//! Transform gizmo state

use glam::{Quat, Vec3};
use shared::GizmoMode;

use crate::scene::{NodeId, SceneGraph};

/// Smallest scale a drag can shrink an axis to
const MIN_SCALE: f32 = 0.01;

/// Which axis a gizmo handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub fn all() -> [GizmoAxis; 3] {
        [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z]
    }

    pub fn direction(&self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }
}

/// Attachment, mode and drag state of the transform gizmo
#[derive(Debug, Default)]
pub struct TransformGizmo {
    pub mode: GizmoMode,
    /// Disabled gizmos ignore drags and are not drawn
    pub enabled: bool,
    attached: Option<NodeId>,
    dragging: Option<GizmoAxis>,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn attached(&self) -> Option<NodeId> {
        self.attached
    }

    pub fn attach(&mut self, id: NodeId) {
        self.attached = Some(id);
    }

    pub fn detach(&mut self) {
        self.attached = None;
        self.dragging = None;
    }

    /// Axis being dragged, if any
    pub fn dragging(&self) -> Option<GizmoAxis> {
        self.dragging
    }

    /// Start dragging `axis`. Refused when disabled or unattached.
    pub fn begin_drag(&mut self, axis: GizmoAxis) -> bool {
        if !self.enabled || self.attached.is_none() {
            return false;
        }
        tracing::debug!("gizmo drag start: {:?} {:?}", self.mode, axis);
        self.dragging = Some(axis);
        true
    }

    pub fn end_drag(&mut self) {
        if self.dragging.take().is_some() {
            tracing::debug!("gizmo drag end");
        }
    }

    /// Apply `amount` along the dragged axis to the attached node.
    ///
    /// Translate moves by `amount` units, rotate turns by `amount` radians
    /// about the world axis, scale adds `amount` to that scale component.
    pub fn apply_drag(&self, graph: &mut SceneGraph, amount: f32) -> bool {
        let (Some(id), Some(axis)) = (self.attached, self.dragging) else {
            return false;
        };
        let Some(node) = graph.get_mut(id) else {
            return false;
        };

        let t = &mut node.transform;
        match self.mode {
            GizmoMode::Translate => t.position += axis.direction() * amount,
            GizmoMode::Rotate => {
                t.rotation = (Quat::from_axis_angle(axis.direction(), amount) * t.rotation).normalize();
            }
            GizmoMode::Scale => {
                let component = match axis {
                    GizmoAxis::X => &mut t.scale.x,
                    GizmoAxis::Y => &mut t.scale.y,
                    GizmoAxis::Z => &mut t.scale.z,
                };
                *component = (*component + amount).max(MIN_SCALE);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;

    fn setup() -> (SceneGraph, NodeId, TransformGizmo) {
        let mut g = SceneGraph::new();
        let id = g.add_root(SceneNode::group("model"));
        let mut gizmo = TransformGizmo::new();
        gizmo.attach(id);
        (g, id, gizmo)
    }

    #[test]
    fn test_translate_drag() {
        let (mut g, id, mut gizmo) = setup();
        assert!(gizmo.begin_drag(GizmoAxis::X));
        assert!(gizmo.apply_drag(&mut g, 2.0));
        assert_eq!(g.get(id).unwrap().transform.position, Vec3::new(2.0, 0.0, 0.0));
        gizmo.end_drag();
        assert!(!gizmo.apply_drag(&mut g, 1.0));
    }

    #[test]
    fn test_rotate_drag() {
        let (mut g, id, mut gizmo) = setup();
        gizmo.mode = GizmoMode::Rotate;
        gizmo.begin_drag(GizmoAxis::Y);
        gizmo.apply_drag(&mut g, std::f32::consts::FRAC_PI_2);
        let r = g.get(id).unwrap().transform.rotation;
        assert!((r * Vec3::X).abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_scale_drag_clamps() {
        let (mut g, id, mut gizmo) = setup();
        gizmo.mode = GizmoMode::Scale;
        gizmo.begin_drag(GizmoAxis::Z);
        gizmo.apply_drag(&mut g, -5.0);
        assert_eq!(g.get(id).unwrap().transform.scale, Vec3::new(1.0, 1.0, MIN_SCALE));
    }

    #[test]
    fn test_disabled_gizmo_refuses_drag() {
        let (_, _, mut gizmo) = setup();
        gizmo.enabled = false;
        assert!(!gizmo.begin_drag(GizmoAxis::X));
        assert!(gizmo.dragging().is_none());
    }

    #[test]
    fn test_detach_ends_drag() {
        let (_, _, mut gizmo) = setup();
        gizmo.begin_drag(GizmoAxis::X);
        gizmo.detach();
        assert!(gizmo.attached().is_none());
        assert!(gizmo.dragging().is_none());
    }
}
