//! Pickable object collections

use crate::scene::NodeId;

/// Ordered collections consulted by picking.
///
/// Every wall is listed in both `walls` and `clickables` under the same id.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    walls: Vec<NodeId>,
    clickables: Vec<NodeId>,
}

impl ObjectRegistry {
    pub fn walls(&self) -> &[NodeId] {
        &self.walls
    }

    pub fn clickables(&self) -> &[NodeId] {
        &self.clickables
    }

    pub fn is_wall(&self, id: NodeId) -> bool {
        self.walls.contains(&id)
    }

    /// Register a wall in both collections
    pub fn add_wall(&mut self, id: NodeId) {
        self.walls.push(id);
        self.clickables.push(id);
    }

    /// Register a non-wall object (a model root)
    pub fn add_clickable(&mut self, id: NodeId) {
        self.clickables.push(id);
    }

    /// Drop every wall from both collections, keeping other clickables in order
    pub fn clear_walls(&mut self) {
        let walls = std::mem::take(&mut self.walls);
        self.clickables.retain(|id| !walls.contains(id));
    }

    /// Swap `old` for `new` at the same index in each collection that lists
    /// it. Returns false when `old` is not a registered wall.
    pub fn replace_wall(&mut self, old: NodeId, new: NodeId) -> bool {
        let Some(wall_index) = self.walls.iter().position(|w| *w == old) else {
            return false;
        };
        self.walls[wall_index] = new;
        if let Some(i) = self.clickables.iter().position(|c| *c == old) {
            self.clickables[i] = new;
        }
        true
    }
}
