//! Room generation

use shared::{parse_length, DimensionError, RoomDimensions};

use super::Editor;
use crate::build::{floor_mesh, perimeter_walls};
use crate::scene::{MaterialSlot, NodeId, NodeRole, SceneNode};

impl Editor {
    /// Replace the room with a fresh floor and back, left and right walls.
    ///
    /// Every previous child of the room group is dropped, interior and
    /// carved walls included, and walls leave both pick collections. Models
    /// are kept. Inputs are not validated.
    pub fn generate_room(&mut self, dims: RoomDimensions) {
        let room_group = self.host.room_group;
        let removed = self.host.graph.clear_children(room_group);
        self.registry.clear_walls();
        self.host.floor = None;

        if let Some(attached) = self.gizmo.attached() {
            if !self.host.graph.contains(attached) {
                self.gizmo.detach();
            }
        }

        let floor = SceneNode::mesh("Floor", NodeRole::Floor, floor_mesh(&dims), MaterialSlot::Floor)
            .with_shadows(false, true);
        self.host.floor = Some(self.host.graph.add_child(room_group, floor));

        for wall in perimeter_walls(&dims, self.settings.wall.thickness) {
            let node = SceneNode::mesh(&wall.name, NodeRole::Wall, wall.mesh(), MaterialSlot::Wall)
                .with_transform(wall.transform)
                .with_shadows(true, false);
            let id = self.host.graph.add_child(room_group, node);
            self.registry.add_wall(id);
        }

        self.room = dims;
        self.height_input = None;
        tracing::info!(
            "Generated room {}x{}x{} (removed {} nodes)",
            dims.width,
            dims.depth,
            dims.height,
            removed
        );
    }

    /// Parse the three dimension fields and generate the room.
    /// On any invalid field the room is left as it is, but the height text
    /// still applies to interior walls built afterwards.
    pub fn generate_room_from_text(
        &mut self,
        width: &str,
        depth: &str,
        height: &str,
    ) -> Result<RoomDimensions, DimensionError> {
        self.set_height_input(height);
        let dims = RoomDimensions::new(parse_length(width)?, parse_length(depth)?, parse_length(height)?);
        self.generate_room(dims);
        Ok(dims)
    }

    /// Current floor node
    pub fn floor(&self) -> Option<NodeId> {
        self.host.floor
    }
}
