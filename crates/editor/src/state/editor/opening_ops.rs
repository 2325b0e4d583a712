//! Window and door openings

use glam::Vec3;
use shared::OpeningKind;

use super::Editor;
use crate::build::{carve_wall_mesh, CsgError};
use crate::scene::{MaterialSlot, NodeId, NodeRole, SceneNode};
use crate::validation::MeshValidator;

impl Editor {
    /// Cut a `kind` opening centered at the world `point` out of `wall`.
    ///
    /// The carved wall replaces the original in the room group and in both
    /// pick collections, at the same positions. Returns the new wall id, or
    /// `None` when `wall` is not a wall with geometry. On a kernel failure
    /// the wall is left untouched.
    pub fn carve_opening(
        &mut self,
        wall: NodeId,
        point: Vec3,
        kind: OpeningKind,
    ) -> Result<Option<NodeId>, CsgError> {
        let Some(node) = self.host.graph.get(wall).filter(|n| n.is_wall()) else {
            return Ok(None);
        };
        let Some(mesh) = node.mesh.as_ref() else {
            return Ok(None);
        };

        let world = self.host.graph.world_matrix(wall);
        let size = self.settings.openings.size(kind);
        let carved = match carve_wall_mesh(mesh, world, kind, size, point) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Could not carve {} into wall {}: {e}", kind.name(), wall.short());
                return Err(e);
            }
        };

        for problem in MeshValidator::new(&carved).validate_all() {
            tracing::warn!("Carved wall {}: {problem}", wall.short());
        }

        let replacement = SceneNode::mesh(&node.name, NodeRole::Wall, carved, MaterialSlot::Wall)
            .with_transform(node.transform)
            .with_shadows(node.cast_shadow, node.receive_shadow);

        let Some(new_id) = self.host.graph.replace(wall, replacement) else {
            return Ok(None);
        };
        self.registry.replace_wall(wall, new_id);
        if self.gizmo.attached() == Some(wall) {
            self.gizmo.attach(new_id);
        }

        tracing::info!(
            "Carved {} at ({:.2}, {:.2}, {:.2}) into wall {} -> {}",
            kind.name(),
            point.x,
            point.y,
            point.z,
            wall.short(),
            new_id.short()
        );
        Ok(Some(new_id))
    }

    /// [`Editor::carve_opening`] by kind name. Unknown names change nothing.
    pub fn carve_opening_by_name(
        &mut self,
        wall: NodeId,
        point: Vec3,
        kind: &str,
    ) -> Result<Option<NodeId>, CsgError> {
        match OpeningKind::from_name(kind) {
            Some(kind) => self.carve_opening(wall, point, kind),
            None => {
                tracing::debug!("Ignoring unknown opening kind '{kind}'");
                Ok(None)
            }
        }
    }
}
