//! JSON command protocol for scripted editing.
//!
//! Each command maps onto one [`EditorHarness`] call. Responses carry a
//! success flag, an optional error and optional JSON data.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::EditorMode;

use crate::harness::EditorHarness;
use crate::state::ClickOutcome;

/// A dimension field as typed: a number or an expression such as `"2*3"`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldText {
    Number(f64),
    Text(String),
}

impl FieldText {
    pub fn as_text(&self) -> String {
        match self {
            FieldText::Number(n) => n.to_string(),
            FieldText::Text(s) => s.clone(),
        }
    }
}

/// A command a script can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Rebuild the room from three dimension fields
    GenerateRoom {
        width: FieldText,
        depth: FieldText,
        height: FieldText,
    },
    /// Type into the height field without rebuilding the room
    SetHeightField {
        height: FieldText,
    },
    SetMode {
        mode: EditorMode,
    },
    /// Click at normalized device coordinates
    Click {
        x: f32,
        y: f32,
    },
    /// Click where a world point appears on screen
    ClickWorld {
        point: [f32; 3],
    },
    AddInteriorWall {
        start: [f32; 3],
        end: [f32; 3],
    },
    /// Carve into the wall at `wall` in the wall collection
    CarveOpening {
        wall: usize,
        point: [f32; 3],
        kind: String,
    },
    /// Import a glTF file; blocks until it is placed or fails
    LoadModel {
        path: String,
        #[serde(default)]
        position: [f32; 3],
    },
    SetWallColor {
        color: String,
    },
    /// Snapshot of walls, models and gizmo
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn click_data(outcome: &ClickOutcome) -> serde_json::Value {
    use serde_json::json;
    match outcome {
        ClickOutcome::Ignored => json!({ "outcome": "ignored" }),
        ClickOutcome::WallStarted(p) => json!({ "outcome": "wall_started", "point": p.to_array() }),
        ClickOutcome::WallBuilt(id) => json!({ "outcome": "wall_built", "id": id.to_string() }),
        ClickOutcome::OpeningCarved(id) => json!({ "outcome": "opening_carved", "id": id.to_string() }),
        ClickOutcome::CarveFailed(e) => json!({ "outcome": "carve_failed", "reason": e.to_string() }),
        ClickOutcome::Selected(id) => json!({ "outcome": "selected", "id": id.to_string() }),
        ClickOutcome::Deselected => json!({ "outcome": "deselected" }),
        ClickOutcome::Missed => json!({ "outcome": "missed" }),
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut EditorHarness, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::GenerateRoom {
            width,
            depth,
            height,
        } => match harness.generate_room(&width.as_text(), &depth.as_text(), &height.as_text()) {
            Ok(dims) => CommandResponse::ok_with_data(serde_json::json!({ "room": dims })),
            Err(e) => CommandResponse::err(e),
        },

        EditorCommand::SetHeightField { height } => {
            harness.set_height_field(&height.as_text());
            CommandResponse::ok_with_data(serde_json::json!({ "wall_height": harness.editor.wall_height() }))
        }

        EditorCommand::SetMode { mode } => {
            harness.set_mode(mode);
            CommandResponse::ok()
        }

        EditorCommand::Click { x, y } => {
            CommandResponse::ok_with_data(click_data(&harness.click_ndc(x, y)))
        }

        EditorCommand::ClickWorld { point } => {
            CommandResponse::ok_with_data(click_data(&harness.click_world(point.into())))
        }

        EditorCommand::AddInteriorWall { start, end } => {
            let id = harness.add_interior_wall(start.into(), end.into());
            CommandResponse::ok_with_data(serde_json::json!({ "id": id.to_string() }))
        }

        EditorCommand::CarveOpening { wall, point, kind } => {
            match harness.carve_opening(wall, point.into(), &kind) {
                Ok(Some(id)) => CommandResponse::ok_with_data(serde_json::json!({
                    "carved": true,
                    "id": id.to_string(),
                })),
                Ok(None) => CommandResponse::ok_with_data(serde_json::json!({ "carved": false })),
                Err(e) => CommandResponse::err(e),
            }
        }

        EditorCommand::LoadModel { path, position } => {
            match harness.load_model(Path::new(&path), position.into()) {
                Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id.to_string() })),
                Err(e) => CommandResponse::err(e),
            }
        }

        EditorCommand::SetWallColor { color } => match harness.set_wall_color(&color) {
            Ok(rgb) => CommandResponse::ok_with_data(serde_json::json!({ "color": rgb })),
            Err(e) => CommandResponse::err(e),
        },

        EditorCommand::Inspect => match serde_json::to_value(harness.summary()) {
            Ok(data) => CommandResponse::ok_with_data(data),
            Err(e) => CommandResponse::err(format!("Failed to serialize summary: {e}")),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut EditorHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut EditorHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_set_mode() {
        let json = r#"{"command": "set_mode", "mode": "add_wall"}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            EditorCommand::SetMode {
                mode: EditorMode::AddWall
            }
        ));
    }

    #[test]
    fn test_command_serde_generate_room_mixed_fields() {
        let json = r#"{"command": "generate_room", "width": 10, "depth": "2*3", "height": 2.5}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            EditorCommand::GenerateRoom { depth, .. } => assert_eq!(depth.as_text(), "2*3"),
            _ => panic!("Expected GenerateRoom"),
        }
    }

    #[test]
    fn test_command_serde_load_model_default_position() {
        let json = r#"{"command": "load_model", "path": "models/sofa.glb"}"#;
        let cmd: EditorCommand = serde_json::from_str(json).unwrap();
        match cmd {
            EditorCommand::LoadModel { path, position } => {
                assert_eq!(path, "models/sofa.glb");
                assert_eq!(position, [0.0; 3]);
            }
            _ => panic!("Expected LoadModel"),
        }
    }

    #[test]
    fn test_execute_generate_room() {
        let mut h = EditorHarness::new();
        let json = r#"{"command": "generate_room", "width": 10, "depth": "2*3", "height": "2.5"}"#;
        let resp = execute_json(&mut h, json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap()["room"]["depth"], 6.0);
        assert_eq!(h.editor.room().width, 10.0);
    }

    #[test]
    fn test_execute_generate_room_invalid() {
        let mut h = EditorHarness::new();
        let json = r#"{"command": "generate_room", "width": "wide", "depth": 6, "height": 3}"#;
        let resp = execute_json(&mut h, json).unwrap();
        assert!(!resp.success);
        assert!(resp.error.is_some());
    }

    #[test]
    fn test_execute_carve_unknown_kind() {
        let mut h = EditorHarness::new();
        let json = r#"{"command": "carve_opening", "wall": 0, "point": [0, 1.5, -3], "kind": "skylight"}"#;
        let resp = execute_json(&mut h, json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap()["carved"], false);
    }

    #[test]
    fn test_execute_load_missing_model() {
        let mut h = EditorHarness::new();
        let json = r#"{"command": "load_model", "path": "/nonexistent/bed.glb"}"#;
        let resp = execute_json(&mut h, json).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("bed.glb"));
        assert_eq!(h.model_count(), 0);
    }

    #[test]
    fn test_execute_inspect() {
        let mut h = EditorHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["walls"].as_array().unwrap().len(), 3);
        assert_eq!(data["wall_color"], "#d9d9d9");
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = EditorHarness::new();
        assert!(execute_json(&mut h, "not json").is_err());
        assert!(execute_json(&mut h, r#"{"command": "fly"}"#).is_err());
    }

    #[test]
    fn test_execute_batch() {
        let mut h = EditorHarness::new();
        let json = r#"[
            {"command": "add_interior_wall", "start": [0, 0, 0], "end": [0, 0, 2]},
            {"command": "set_wall_color", "color": "#9fb8a0"},
            {"command": "set_mode", "mode": "select"}
        ]"#;
        let responses = execute_json_batch(&mut h, json).unwrap();
        assert_eq!(responses.len(), 3);
        assert!(responses.iter().all(|r| r.success));
        assert_eq!(h.wall_count(), 4);
        assert_eq!(h.editor.mode(), EditorMode::Select);
    }
}
