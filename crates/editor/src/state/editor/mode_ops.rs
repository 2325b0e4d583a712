//! Interaction mode switching

use shared::EditorMode;

use super::Editor;

impl Editor {
    /// Make `mode` the active mode.
    ///
    /// Translate, rotate and scale drive the gizmo. Every other mode detaches
    /// and disables it. Leaving add-wall forgets a pending first click.
    pub fn set_mode(&mut self, mode: EditorMode) {
        match mode.gizmo_mode() {
            Some(gizmo_mode) => {
                self.gizmo.mode = gizmo_mode;
                self.gizmo.enabled = true;
            }
            None => {
                self.gizmo.detach();
                self.gizmo.enabled = false;
            }
        }

        if mode != EditorMode::AddWall {
            self.pending_wall_start = None;
        }

        if self.mode != mode {
            tracing::debug!("Mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Whether the viewport should show a crosshair cursor
    pub fn shows_crosshair(&self) -> bool {
        self.mode.is_placement()
    }
}

#[cfg(test)]
mod tests {
    use crate::state::Editor;
    use shared::{EditorMode, GizmoMode};

    #[test]
    fn test_manipulation_modes_enable_gizmo() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::Rotate);
        assert!(editor.gizmo.enabled);
        assert_eq!(editor.gizmo.mode, GizmoMode::Rotate);
        assert!(!editor.shows_crosshair());
    }

    #[test]
    fn test_placement_modes_detach_gizmo() {
        let mut editor = Editor::default();
        let wall = editor.registry.walls()[0];
        editor.gizmo.attach(wall);

        editor.set_mode(EditorMode::AddDoor);
        assert!(!editor.gizmo.enabled);
        assert!(editor.gizmo.attached().is_none());
        assert!(editor.shows_crosshair());
    }

    #[test]
    fn test_select_mode_has_no_crosshair() {
        let mut editor = Editor::default();
        editor.set_mode(EditorMode::Select);
        assert!(!editor.gizmo.enabled);
        assert!(!editor.shows_crosshair());
    }
}
