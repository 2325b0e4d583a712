//! Factory functions for test data.
//!
//! Hand-built models and small glTF documents, so tests and the command
//! protocol can exercise the editor without asset files on disk.

use std::path::PathBuf;

use glam::Vec3;
use shared::{RoomDimensions, Rgb};

use crate::build::primitives::box_mesh;
use crate::loader::{LoadedModel, ModelNode};
use crate::scene::Transform;
use crate::state::{Editor, EditorSettings};
use crate::viewport::picking::Ray;

// ── glTF documents ──────────────────────────────────────────────

/// One red triangle under a "Seat" node, parented to "Frame".
/// The buffer is embedded as a base64 data URI.
pub const TRIANGLE_GLTF: &str = r#"{
    "asset": {"version": "2.0"},
    "scene": 0,
    "scenes": [{"nodes": [1]}],
    "nodes": [
        {"name": "Seat", "mesh": 0, "translation": [0.0, 0.5, 0.0]},
        {"name": "Frame", "children": [0]}
    ],
    "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1, "material": 0}]}],
    "materials": [{"pbrMetallicRoughness": {"baseColorFactor": [1.0, 0.0, 0.0, 1.0]}}],
    "buffers": [{"byteLength": 44, "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="}],
    "bufferViews": [
        {"buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962},
        {"buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963}
    ],
    "accessors": [
        {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
        {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
    ]
}"#;

/// Write [`TRIANGLE_GLTF`] to a fresh file in the temp directory.
/// Callers remove it when done.
pub fn write_temp_gltf() -> PathBuf {
    let path = std::env::temp_dir().join(format!("room_editor_{}.gltf", uuid::Uuid::new_v4()));
    if let Err(e) = std::fs::write(&path, TRIANGLE_GLTF) {
        tracing::error!("Failed to write {}: {e}", path.display());
    }
    path
}

// ── Models ──────────────────────────────────────────────────────

fn part(name: &str, size: [f32; 3], position: Vec3, color: Rgb) -> ModelNode {
    ModelNode {
        name: name.to_string(),
        transform: Transform::from_position(position),
        mesh: Some(box_mesh(size[0], size[1], size[2])),
        color,
        children: Vec::new(),
    }
}

/// A chair: seat and back meshes plus a mesh-less "Legs" group.
///
/// The seat is a 0.5 x 0.1 x 0.5 box centered at local (0, 0.5, 0).
pub fn chair_model() -> LoadedModel {
    let wood = Rgb([150, 111, 51]);
    let legs = [(-0.2, -0.2), (0.2, -0.2), (-0.2, 0.2), (0.2, 0.2)]
        .iter()
        .enumerate()
        .map(|(i, (x, z))| {
            part(
                &format!("Leg {}", i + 1),
                [0.05, 0.45, 0.05],
                Vec3::new(*x, 0.225, *z),
                wood,
            )
        })
        .collect();

    LoadedModel {
        name: "chair".to_string(),
        root: ModelNode {
            name: "chair".to_string(),
            transform: Transform::IDENTITY,
            mesh: None,
            color: Rgb::WHITE,
            children: vec![
                part("Seat", [0.5, 0.1, 0.5], Vec3::new(0.0, 0.5, 0.0), wood),
                part("Back", [0.5, 0.5, 0.05], Vec3::new(0.0, 0.8, -0.225), wood),
                ModelNode {
                    name: "Legs".to_string(),
                    transform: Transform::IDENTITY,
                    mesh: None,
                    color: Rgb::WHITE,
                    children: legs,
                },
            ],
        },
    }
}

// ── Editors ─────────────────────────────────────────────────────

/// Editor on default settings with a room of the given size
pub fn editor_with_room(width: f32, depth: f32, height: f32) -> Editor {
    let mut settings = EditorSettings::default();
    settings.room = RoomDimensions::new(width, depth, height);
    Editor::new(settings)
}

// ── Rays ────────────────────────────────────────────────────────

/// Straight down onto the floor at (x, z)
pub fn ray_down(x: f32, z: f32) -> Ray {
    Ray {
        origin: Vec3::new(x, 20.0, z),
        direction: Vec3::NEG_Y,
    }
}

/// Horizontal ray from `origin` toward `target`
pub fn ray_between(origin: Vec3, target: Vec3) -> Ray {
    Ray {
        origin,
        direction: (target - origin).normalize(),
    }
}
