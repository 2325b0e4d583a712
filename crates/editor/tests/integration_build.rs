//! Integration tests for room, wall and opening geometry.
//!
//! Drives the editor directly and checks the scene graph and meshes.

use glam::Vec3;
use room_editor_lib::fixtures::editor_with_room;
use room_editor_lib::scene::NodeRole;
use room_editor_lib::state::Editor;
use room_editor_lib::validation::MeshValidator;
use shared::{OpeningKind, RoomDimensions};

fn count_role(editor: &Editor, role: NodeRole) -> usize {
    editor.host.graph.nodes().filter(|n| n.role == role).count()
}

#[test]
fn test_room_has_floor_and_three_walls() {
    let editor = editor_with_room(10.0, 6.0, 2.5);

    assert_eq!(count_role(&editor, NodeRole::Floor), 1);
    assert_eq!(count_role(&editor, NodeRole::Wall), 3);
    assert_eq!(editor.registry.walls().len(), 3);
    assert_eq!(editor.registry.clickables(), editor.registry.walls());

    for id in editor.registry.walls() {
        let node = editor.host.graph.get(*id).unwrap();
        assert_eq!(node.parent, Some(editor.host.room_group));
        let v = MeshValidator::new(node.mesh.as_ref().unwrap());
        assert!(v.validate_all().is_empty());
        assert!(v.is_closed(1e-4));
    }
}

#[test]
fn test_regeneration_leaves_no_stale_nodes() {
    let mut editor = Editor::default();
    let before = editor.host.graph.len();

    for _ in 0..3 {
        editor.generate_room(RoomDimensions::new(5.0, 4.0, 2.0));
    }

    assert_eq!(editor.host.graph.len(), before);
    assert_eq!(count_role(&editor, NodeRole::Floor), 1);
    assert_eq!(count_role(&editor, NodeRole::Wall), 3);
    assert_eq!(editor.room(), RoomDimensions::new(5.0, 4.0, 2.0));
}

#[test]
fn test_perimeter_wall_sizes_follow_room() {
    let editor = editor_with_room(10.0, 6.0, 2.5);
    let thickness = editor.settings.wall.thickness;
    let graph = &editor.host.graph;

    let back = graph.get(editor.registry.walls()[0]).unwrap();
    assert_eq!(back.name, "Back wall");
    assert!(back.transform.position.abs_diff_eq(Vec3::new(0.0, 1.25, -3.0), 1e-6));
    let v = MeshValidator::new(back.mesh.as_ref().unwrap());
    assert!(v.assert_dimensions_approx([10.0, 2.5, thickness], 1e-4));

    let left = graph.get(editor.registry.walls()[1]).unwrap();
    assert!(left.transform.position.abs_diff_eq(Vec3::new(-5.0, 1.25, 0.0), 1e-6));
    let v = MeshValidator::new(left.mesh.as_ref().unwrap());
    assert!(v.assert_dimensions_approx([6.0, 2.5, thickness], 1e-4));
}

#[test]
fn test_interior_wall_length_and_center() {
    let mut editor = editor_with_room(10.0, 6.0, 2.5);
    let id = editor.add_interior_wall(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));

    let node = editor.host.graph.get(id).unwrap();
    assert!(node
        .transform
        .position
        .abs_diff_eq(Vec3::new(0.0, 1.25, 2.5), 1e-6));

    let v = MeshValidator::new(node.mesh.as_ref().unwrap());
    assert!(v.assert_dimensions_approx([5.0, 2.5, editor.settings.wall.thickness], 1e-4));

    // Long axis runs along world Z after the wall's rotation
    let world_end = editor
        .host
        .graph
        .world_matrix(id)
        .transform_point3(Vec3::new(2.5, -1.25, 0.0));
    assert!(world_end.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-5));
}

#[test]
fn test_regeneration_removes_interior_walls() {
    let mut editor = Editor::default();
    let interior = editor.add_interior_wall(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(editor.registry.walls().len(), 4);

    editor.generate_room(editor.room());

    assert!(!editor.host.graph.contains(interior));
    assert_eq!(editor.registry.walls().len(), 3);
    assert!(!editor.registry.clickables().contains(&interior));
}

#[test]
fn test_carve_replaces_wall_in_place() {
    let mut editor = Editor::default();
    editor.add_interior_wall(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
    let walls_before = editor.registry.walls().to_vec();
    let clickables_before = editor.registry.clickables().len();
    let back = walls_before[0];

    let new_id = editor
        .carve_opening(back, Vec3::new(0.0, 1.5, -2.9), OpeningKind::Window)
        .unwrap()
        .unwrap();

    let walls = editor.registry.walls();
    assert_eq!(walls.len(), walls_before.len());
    assert_eq!(walls[0], new_id);
    assert_eq!(&walls[1..], &walls_before[1..]);
    assert_eq!(editor.registry.clickables().len(), clickables_before);
    assert_eq!(editor.registry.clickables()[0], new_id);
    assert!(!editor.host.graph.contains(back));

    let carved = editor.host.graph.get(new_id).unwrap();
    assert_eq!(carved.role, NodeRole::Wall);
    assert_eq!(carved.name, "Back wall");
    assert_eq!(carved.parent, Some(editor.host.room_group));
    let mesh = carved.mesh.as_ref().unwrap();
    assert!(MeshValidator::new(mesh).validate_all().is_empty());
    // The box had 12 triangles; the hole adds more
    assert!(mesh.triangle_count() > 12);
}

#[test]
fn test_unknown_opening_kind_changes_nothing() {
    let mut editor = Editor::default();
    editor.add_interior_wall(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 1.0));
    let walls_before = editor.registry.walls().to_vec();
    let clickables_before = editor.registry.clickables().to_vec();
    let back = walls_before[0];
    let nodes_before = editor.host.graph.len();

    let result = editor.carve_opening_by_name(back, Vec3::new(0.0, 1.5, -2.9), "skylight");

    assert_eq!(result, Ok(None));
    assert_eq!(editor.registry.walls(), walls_before.as_slice());
    assert_eq!(editor.registry.clickables(), clickables_before.as_slice());
    assert_eq!(editor.host.graph.len(), nodes_before);
}

#[test]
fn test_wall_color_shared_by_carved_walls() {
    let mut editor = Editor::default();
    let back = editor.registry.walls()[0];
    let carved = editor
        .carve_opening(back, Vec3::new(0.0, 1.0, -2.9), OpeningKind::Door)
        .unwrap()
        .unwrap();

    let sage = shared::Rgb::from_hex("#9fb8a0").unwrap();
    editor.set_wall_color(sage);

    let items = editor.host.draw_items();
    let walls: Vec<_> = items
        .iter()
        .filter(|item| editor.registry.is_wall(item.node))
        .collect();
    assert_eq!(walls.len(), 3);
    assert!(walls.iter().all(|item| item.color == sage));
    assert!(walls.iter().any(|item| item.node == carved));
}
