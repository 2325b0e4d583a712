//! Integration tests for the EditorCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use room_editor_lib::command::{execute_json, execute_json_batch};
use room_editor_lib::fixtures::write_temp_gltf;
use room_editor_lib::harness::EditorHarness;
use shared::EditorMode;

#[test]
fn test_command_generate_room_expressions() {
    let mut h = EditorHarness::new();

    let json = r#"{"command": "generate_room", "width": "2*3.5", "depth": 5, "height": "2.4"}"#;
    let resp = execute_json(&mut h, json).unwrap();

    assert!(resp.success);
    let room = &resp.data.as_ref().unwrap()["room"];
    assert_eq!(room["width"], 7.0);
    assert_eq!(room["depth"], 5.0);
    assert_eq!(h.wall_count(), 3);
}

#[test]
fn test_command_generate_room_invalid_keeps_room() {
    let mut h = EditorHarness::new();
    let before = h.editor.room();

    let json = r#"{"command": "generate_room", "width": "", "depth": 5, "height": 3}"#;
    let resp = execute_json(&mut h, json).unwrap();

    assert!(!resp.success);
    assert!(resp.error.is_some());
    assert_eq!(h.editor.room(), before);
}

#[test]
fn test_command_wall_workflow_by_clicks() {
    let mut h = EditorHarness::new();

    let json = r#"[
        {"command": "set_mode", "mode": "add_wall"},
        {"command": "click_world", "point": [-2.0, 0.0, 1.0]},
        {"command": "click_world", "point": [2.0, 0.0, 1.0]},
        {"command": "inspect"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();

    assert!(responses.iter().all(|r| r.success));
    assert_eq!(responses[1].data.as_ref().unwrap()["outcome"], "wall_started");
    assert_eq!(responses[2].data.as_ref().unwrap()["outcome"], "wall_built");

    let summary = responses[3].data.as_ref().unwrap();
    assert_eq!(summary["walls"].as_array().unwrap().len(), 4);
    assert_eq!(summary["mode"], "translate");
    assert!(summary.get("pending_wall_start").is_none());
}

#[test]
fn test_command_interior_wall_uses_edited_height() {
    let mut h = EditorHarness::new();

    let json = r#"[
        {"command": "generate_room", "width": 8, "depth": 6, "height": 3},
        {"command": "set_height_field", "height": "2*2"},
        {"command": "add_interior_wall", "start": [0.0, 0.0, 0.0], "end": [2.0, 0.0, 0.0]},
        {"command": "inspect"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();

    assert!(responses.iter().all(|r| r.success), "{responses:?}");
    assert_eq!(responses[1].data.as_ref().unwrap()["wall_height"], 4.0);
    // The room itself was not rebuilt
    assert_eq!(h.editor.room().height, 3.0);

    let id = h.wall(3).unwrap();
    let node = h.editor.host.graph.get(id).unwrap();
    assert!((node.transform.position.y - 2.0).abs() < 1e-6);
}

#[test]
fn test_command_pending_wall_visible_in_inspect() {
    let mut h = EditorHarness::new();

    let json = r#"[
        {"command": "set_mode", "mode": "add_wall"},
        {"command": "click_world", "point": [0.0, 0.0, 0.0]},
        {"command": "inspect"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();

    let summary = responses[2].data.as_ref().unwrap();
    assert_eq!(summary["mode"], "add_wall");
    assert!(summary["pending_wall_start"].is_array());
}

#[test]
fn test_command_carve_opening() {
    let mut h = EditorHarness::new();
    let back = h.wall(0).unwrap();

    let json = r#"{"command": "carve_opening", "wall": 0, "point": [0.0, 1.5, -2.95], "kind": "window"}"#;
    let resp = execute_json(&mut h, json).unwrap();

    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["carved"], true);
    assert_ne!(data["id"], back.to_string());
    assert_eq!(h.wall(0).unwrap().to_string(), data["id"]);
}

#[test]
fn test_command_carve_bad_index() {
    let mut h = EditorHarness::new();

    let json = r#"{"command": "carve_opening", "wall": 7, "point": [0, 1, 0], "kind": "door"}"#;
    let resp = execute_json(&mut h, json).unwrap();

    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["carved"], false);
    assert_eq!(h.wall_count(), 3);
}

#[test]
fn test_command_set_wall_color() {
    let mut h = EditorHarness::new();

    let resp = execute_json(&mut h, r##"{"command": "set_wall_color", "color": "#e3c9a8"}"##).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["color"], "#e3c9a8");

    let resp = execute_json(&mut h, r#"{"command": "set_wall_color", "color": "beige"}"#).unwrap();
    assert!(!resp.success);

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["wall_color"], "#e3c9a8");
}

#[test]
fn test_command_load_model_and_select() {
    let mut h = EditorHarness::new();
    let path = write_temp_gltf();

    let json = serde_json::json!([
        {"command": "load_model", "path": path.to_string_lossy(), "position": [0.0, 0.0, 1.0]},
        {"command": "set_mode", "mode": "select"},
        {"command": "inspect"}
    ])
    .to_string();
    let responses = execute_json_batch(&mut h, &json).unwrap();
    let _ = std::fs::remove_file(&path);

    assert!(responses.iter().all(|r| r.success), "{responses:?}");
    let root = responses[0].data.as_ref().unwrap()["id"].clone();

    let summary = responses[2].data.as_ref().unwrap();
    assert_eq!(summary["models"].as_array().unwrap().len(), 1);
    assert_eq!(summary["models"][0]["id"], root);
    // Select mode drops the gizmo
    assert!(summary.get("attached").is_none());
    assert_eq!(h.editor.mode(), EditorMode::Select);
}

#[test]
fn test_command_click_ndc_sky_deselects() {
    let mut h = EditorHarness::new();

    let resp = execute_json(&mut h, r#"{"command": "click", "x": 0.0, "y": 1.0}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["outcome"], "deselected");
}

#[test]
fn test_command_unknown_rejected() {
    let mut h = EditorHarness::new();
    assert!(execute_json(&mut h, r#"{"command": "delete_room"}"#).is_err());
    assert!(execute_json_batch(&mut h, r#"{"command": "inspect"}"#).is_err());
}
