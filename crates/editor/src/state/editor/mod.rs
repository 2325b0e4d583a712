//! Editor state: the scene host plus everything the room tools mutate.
//!
//! Operations are split by tool across the sibling `*_ops` files.

mod click_ops;
mod mode_ops;
mod model_ops;
mod opening_ops;
mod room_ops;
mod wall_ops;

pub use click_ops::{ClickEvent, ClickOutcome};

use glam::Vec3;
use shared::{parse_length, EditorMode, RoomDimensions};

use super::gizmo::TransformGizmo;
use super::registry::ObjectRegistry;
use super::settings::EditorSettings;
use crate::scene::{NodeId, NodeRole, SceneHost};

/// The single owner of editor state, mutated from the UI thread only
pub struct Editor {
    pub host: SceneHost,
    pub registry: ObjectRegistry,
    pub gizmo: TransformGizmo,
    pub settings: EditorSettings,
    mode: EditorMode,
    /// First click of the two-click wall tool
    pending_wall_start: Option<Vec3>,
    /// Dimensions of the room currently in the scene
    room: RoomDimensions,
    /// Height field text as last edited, read when an interior wall is built
    height_input: Option<String>,
    /// Message of the most recent failed model load
    last_load_error: Option<String>,
}

impl Editor {
    /// Editor with the configured room generated and translate mode active
    pub fn new(settings: EditorSettings) -> Self {
        let host = SceneHost::new(&settings);
        let room = settings.room;
        let mut editor = Self {
            host,
            registry: ObjectRegistry::default(),
            gizmo: TransformGizmo::new(),
            settings,
            mode: EditorMode::Translate,
            pending_wall_start: None,
            room,
            height_input: None,
            last_load_error: None,
        };
        editor.generate_room(room);
        editor.set_mode(EditorMode::Translate);
        editor
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn pending_wall_start(&self) -> Option<Vec3> {
        self.pending_wall_start
    }

    pub fn room(&self) -> RoomDimensions {
        self.room
    }

    /// Record the room height field as typed, without regenerating
    pub fn set_height_input(&mut self, text: &str) {
        self.height_input = Some(text.to_owned());
    }

    /// Height for new interior walls: the height field when it parses,
    /// otherwise the generated room's height
    pub fn wall_height(&self) -> f32 {
        self.height_input
            .as_deref()
            .and_then(|text| parse_length(text).ok())
            .unwrap_or(self.room.height)
    }

    pub fn last_load_error(&self) -> Option<&str> {
        self.last_load_error.as_deref()
    }

    pub fn clear_load_error(&mut self) {
        self.last_load_error = None;
    }

    /// Model roots currently in the scene
    pub fn models(&self) -> Vec<NodeId> {
        self.host
            .graph
            .roots()
            .iter()
            .copied()
            .filter(|id| {
                self.host
                    .graph
                    .get(*id)
                    .is_some_and(|n| n.role == NodeRole::ModelRoot)
            })
            .collect()
    }

    /// Per-frame tick; returns true while the camera is easing
    pub fn update(&mut self) -> bool {
        self.host.update()
    }

    /// Track the viewport size and device pixel ratio
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.host.resize(width, height, device_pixel_ratio);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}
