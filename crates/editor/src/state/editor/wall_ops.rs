//! Interior walls

use glam::Vec3;

use super::Editor;
use crate::build::interior_wall;
use crate::scene::{MaterialSlot, NodeId, NodeRole, SceneNode};

impl Editor {
    /// Build a wall from `start` to `end` on the floor and register it as
    /// a wall. Its height is read from the height field at build time, see
    /// [`Editor::wall_height`].
    pub fn add_interior_wall(&mut self, start: Vec3, end: Vec3) -> NodeId {
        let placement = interior_wall(start, end, self.wall_height(), self.settings.wall.thickness);
        let node = SceneNode::mesh(&placement.name, NodeRole::Wall, placement.mesh(), MaterialSlot::Wall)
            .with_transform(placement.transform)
            .with_shadows(true, true);

        let id = self.host.graph.add_child(self.host.room_group, node);
        self.registry.add_wall(id);

        tracing::info!(
            "Interior wall {} from ({:.2}, {:.2}) to ({:.2}, {:.2}), length {:.2}",
            id.short(),
            start.x,
            start.z,
            end.x,
            end.z,
            placement.length
        );
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Editor;
    use shared::RoomDimensions;

    #[test]
    fn test_interior_wall_registered() {
        let mut editor = Editor::default();
        let id = editor.add_interior_wall(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(editor.registry.walls().len(), 4);
        assert_eq!(editor.registry.walls()[3], id);
        assert_eq!(*editor.registry.clickables().last().unwrap(), id);

        let node = editor.host.graph.get(id).unwrap();
        assert!(node.is_wall());
        assert!(node.cast_shadow && node.receive_shadow);
        assert!(node
            .transform
            .position
            .abs_diff_eq(Vec3::new(0.0, 1.5, 2.5), 1e-6));
    }

    fn wall_size(editor: &Editor, id: NodeId) -> Vec3 {
        let (min, max) = editor.host.graph.get(id).unwrap().mesh.as_ref().unwrap().bounds().unwrap();
        max - min
    }

    #[test]
    fn test_height_follows_generated_room() {
        let mut editor = Editor::default();
        editor.generate_room(RoomDimensions::new(8.0, 6.0, 4.0));
        let id = editor.add_interior_wall(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        let size = wall_size(&editor, id);
        assert!((size.y - 4.0).abs() < 1e-6);
        assert!((size.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_height_read_from_field_at_build_time() {
        let mut editor = Editor::default();
        editor.generate_room(RoomDimensions::new(8.0, 6.0, 3.0));
        editor.set_height_input("4");

        let id = editor.add_interior_wall(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));

        assert!((wall_size(&editor, id).y - 4.0).abs() < 1e-6);
        let node = editor.host.graph.get(id).unwrap();
        assert!((node.transform.position.y - 2.0).abs() < 1e-6);
        // The room itself keeps its generated height
        assert_eq!(editor.room().height, 3.0);
    }

    #[test]
    fn test_unparsable_height_field_falls_back_to_room() {
        let mut editor = Editor::default();
        editor.generate_room(RoomDimensions::new(8.0, 6.0, 3.0));
        editor.set_height_input("tall");

        let id = editor.add_interior_wall(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));

        assert!((wall_size(&editor, id).y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_regeneration_removes_interior_walls() {
        let mut editor = Editor::default();
        let id = editor.add_interior_wall(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        editor.generate_room(RoomDimensions::default());
        assert!(!editor.host.graph.contains(id));
        assert!(!editor.registry.clickables().contains(&id));
        assert_eq!(editor.registry.walls().len(), 3);
    }
}
