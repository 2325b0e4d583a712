//! Viewport click dispatch

use glam::{Vec2, Vec3};
use shared::EditorMode;

use super::Editor;
use crate::build::CsgError;
use crate::scene::NodeId;
use crate::viewport::picking::{raycast, Ray};

/// A primary click in the viewport
#[derive(Debug, Clone, Copy)]
pub struct ClickEvent {
    /// Normalized device coordinates, x right and y up in -1..=1
    pub ndc: Vec2,
    /// The pointer was over the controls panel
    pub over_controls: bool,
}

impl ClickEvent {
    pub fn at(ndc: Vec2) -> Self {
        Self {
            ndc,
            over_controls: false,
        }
    }
}

/// What a click did
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The click landed on the controls panel
    Ignored,
    /// First add-wall click recorded this floor point
    WallStarted(Vec3),
    /// Second add-wall click built this wall
    WallBuilt(NodeId),
    /// A window or door replaced the hit wall with this one
    OpeningCarved(NodeId),
    /// The hit wall could not be carved and is unchanged
    CarveFailed(CsgError),
    /// The gizmo is now attached here
    Selected(NodeId),
    /// Nothing clickable was hit; the gizmo was detached
    Deselected,
    /// A placement click hit nothing it could use
    Missed,
}

impl Editor {
    /// Handle a click: ignore it over the controls, otherwise cast a ray
    /// from the camera through the click position.
    pub fn handle_click(&mut self, event: ClickEvent) -> ClickOutcome {
        if event.over_controls {
            return ClickOutcome::Ignored;
        }
        let ray = self.host.camera.ray_from_ndc(event.ndc);
        self.handle_ray(&ray)
    }

    /// Dispatch a pick ray according to the active mode
    pub fn handle_ray(&mut self, ray: &Ray) -> ClickOutcome {
        match self.mode {
            EditorMode::AddWall => self.click_add_wall(ray),
            EditorMode::AddWindow | EditorMode::AddDoor => self.click_add_opening(ray),
            EditorMode::Translate | EditorMode::Rotate | EditorMode::Scale | EditorMode::Select => {
                self.click_select(ray)
            }
        }
    }

    /// Nearest point where `ray` meets the floor
    pub fn floor_hit(&self, ray: &Ray) -> Option<Vec3> {
        let floor = self.host.floor?;
        raycast(&self.host.graph, ray, &[floor], false)
            .into_iter()
            .next()
            .map(|hit| hit.point)
    }

    fn click_add_wall(&mut self, ray: &Ray) -> ClickOutcome {
        let Some(point) = self.floor_hit(ray) else {
            return ClickOutcome::Missed;
        };

        match self.pending_wall_start.take() {
            None => {
                tracing::debug!("Wall start at ({:.2}, {:.2})", point.x, point.z);
                self.pending_wall_start = Some(point);
                ClickOutcome::WallStarted(point)
            }
            Some(start) => {
                let id = self.add_interior_wall(start, point);
                self.set_mode(EditorMode::Translate);
                ClickOutcome::WallBuilt(id)
            }
        }
    }

    fn click_add_opening(&mut self, ray: &Ray) -> ClickOutcome {
        let Some(kind) = self.mode.opening_kind() else {
            return ClickOutcome::Missed;
        };
        let walls = self.registry.walls().to_vec();
        let Some(hit) = raycast(&self.host.graph, ray, &walls, false).into_iter().next() else {
            return ClickOutcome::Missed;
        };

        let outcome = match self.carve_opening(hit.node, hit.point, kind) {
            Ok(Some(id)) => ClickOutcome::OpeningCarved(id),
            Ok(None) => ClickOutcome::Missed,
            Err(e) => ClickOutcome::CarveFailed(e),
        };
        self.set_mode(EditorMode::Translate);
        outcome
    }

    fn click_select(&mut self, ray: &Ray) -> ClickOutcome {
        let clickables = self.registry.clickables().to_vec();
        match raycast(&self.host.graph, ray, &clickables, true).into_iter().next() {
            Some(hit) => {
                let target = self.selection_target(hit.node);
                tracing::debug!("Picked {} -> {}", hit.node.short(), target.short());
                self.gizmo.attach(target);
                ClickOutcome::Selected(target)
            }
            None => {
                self.gizmo.detach();
                ClickOutcome::Deselected
            }
        }
    }

    /// Walk up from a hit node to the object the gizmo should grab: the
    /// first wall, or else the top-level scene child.
    pub fn selection_target(&self, hit: NodeId) -> NodeId {
        let graph = &self.host.graph;
        let mut current = hit;
        while let Some(node) = graph.get(current) {
            if node.is_wall() {
                break;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ray_down;
    use crate::state::Editor;

    #[test]
    fn test_click_over_controls_ignored() {
        let mut editor = Editor::default();
        let event = ClickEvent {
            ndc: Vec2::ZERO,
            over_controls: true,
        };
        assert_eq!(editor.handle_click(event), ClickOutcome::Ignored);
    }

    #[test]
    fn test_two_click_wall() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::AddWall);

        let first = editor.handle_ray(&ray_down(-1.0, 0.0));
        assert!(matches!(first, ClickOutcome::WallStarted(_)));
        assert!(editor.pending_wall_start().is_some());

        let second = editor.handle_ray(&ray_down(1.0, 0.0));
        let ClickOutcome::WallBuilt(id) = second else {
            panic!("expected a wall, got {second:?}");
        };
        assert!(editor.registry.is_wall(id));
        assert!(editor.pending_wall_start().is_none());
        assert_eq!(editor.mode(), EditorMode::Translate);
    }

    #[test]
    fn test_add_wall_off_floor_misses() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::AddWall);
        assert_eq!(editor.handle_ray(&ray_down(50.0, 50.0)), ClickOutcome::Missed);
        assert!(editor.pending_wall_start().is_none());
    }

    #[test]
    fn test_leaving_add_wall_drops_pending_start() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::AddWall);
        editor.handle_ray(&ray_down(0.0, 0.0));
        assert!(editor.pending_wall_start().is_some());
        editor.set_mode(EditorMode::Select);
        assert!(editor.pending_wall_start().is_none());
    }

    #[test]
    fn test_window_click_carves_hit_wall() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::AddWindow);
        let back = editor.registry.walls()[0];
        let ray = Ray {
            origin: Vec3::new(0.0, 1.5, 5.0),
            direction: Vec3::NEG_Z,
        };
        let outcome = editor.handle_ray(&ray);
        let ClickOutcome::OpeningCarved(id) = outcome else {
            panic!("expected a carve, got {outcome:?}");
        };
        assert_eq!(editor.registry.walls()[0], id);
        assert!(!editor.host.graph.contains(back));
        assert_eq!(editor.mode(), EditorMode::Translate);
    }

    #[test]
    fn test_select_wall_and_deselect() {
        let mut editor = Editor::default();
        let back = editor.registry.walls()[0];
        let ray = Ray {
            origin: Vec3::new(0.0, 1.5, 5.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(editor.handle_ray(&ray), ClickOutcome::Selected(back));
        assert_eq!(editor.gizmo.attached(), Some(back));

        let away = Ray {
            origin: Vec3::new(0.0, 1.5, 5.0),
            direction: Vec3::Z,
        };
        assert_eq!(editor.handle_ray(&away), ClickOutcome::Deselected);
        assert!(editor.gizmo.attached().is_none());
    }

    #[test]
    fn test_floor_is_not_selectable() {
        let mut editor = Editor::default();
        assert_eq!(editor.handle_ray(&ray_down(0.0, 0.0)), ClickOutcome::Deselected);
    }
}
