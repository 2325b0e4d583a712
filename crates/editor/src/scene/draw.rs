//! Flattening the scene graph into draw calls

use glam::{Mat4, Vec3, Vec4};
use shared::Rgb;

use super::host::SceneHost;
use super::node::NodeId;

/// Height above the floor that projected shadows are drawn at
pub const SHADOW_PLANE_Y: f32 = 0.002;

/// One visible mesh node, resolved for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub model: Mat4,
    pub color: Rgb,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl SceneHost {
    /// Every visible node with geometry, with its world matrix and resolved
    /// material color. Order follows the graph depth first.
    pub fn draw_items(&self) -> Vec<DrawItem> {
        let graph = &self.graph;
        let mut items = Vec::new();
        for root in graph.roots() {
            for id in graph.subtree(*root) {
                let Some(node) = graph.get(id) else {
                    continue;
                };
                if node.mesh.as_ref().is_none_or(|m| m.is_empty()) || !graph.is_visible(id) {
                    continue;
                }
                items.push(DrawItem {
                    node: id,
                    model: graph.world_matrix(id),
                    color: self.material(node.material).color,
                    cast_shadow: node.cast_shadow,
                    receive_shadow: node.receive_shadow,
                });
            }
        }
        items
    }
}

/// Matrix flattening geometry onto the plane `y = plane_y` along
/// `to_light`, the direction from the scene toward a directional light.
///
/// `None` when the light is at or below the horizon.
pub fn shadow_matrix(to_light: Vec3, plane_y: f32) -> Option<Mat4> {
    let l = to_light.try_normalize()?;
    if l.y <= 1e-4 {
        return None;
    }
    // p' = p - l * (p.y - plane_y) / l.y
    let kx = l.x / l.y;
    let kz = l.z / l.y;
    Some(Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(-kx, 0.0, -kz, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(kx * plane_y, plane_y, kz * plane_y, 1.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MaterialSlot, NodeRole, SceneNode};
    use crate::state::EditorSettings;
    use crate::build::primitives::box_mesh;

    #[test]
    fn test_draw_items_resolve_materials() {
        let mut host = SceneHost::new(&EditorSettings::default());
        let wall = host.graph.add_child(
            host.room_group,
            SceneNode::mesh("Wall", NodeRole::Wall, box_mesh(1.0, 1.0, 1.0), MaterialSlot::Wall),
        );
        host.wall_material.color = Rgb([1, 2, 3]);

        let items = host.draw_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].node, wall);
        assert_eq!(items[0].color, Rgb([1, 2, 3]));
    }

    #[test]
    fn test_draw_items_skip_hidden_and_groups() {
        let mut host = SceneHost::new(&EditorSettings::default());
        let group = host.graph.add_root(SceneNode::group("Hidden"));
        host.graph.add_child(
            group,
            SceneNode::mesh("Part", NodeRole::ModelPart, box_mesh(1.0, 1.0, 1.0), MaterialSlot::Floor),
        );
        host.graph.get_mut(group).unwrap().visible = false;
        assert!(host.draw_items().is_empty());
    }

    #[test]
    fn test_shadow_matrix_projects_along_light() {
        let m = shadow_matrix(Vec3::new(1.0, 1.0, 0.0), 0.0).unwrap();
        let p = m.transform_point3(Vec3::new(0.0, 2.0, 0.0));
        assert!((p - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);

        let straight = shadow_matrix(Vec3::Y, 0.5).unwrap();
        let q = straight.transform_point3(Vec3::new(3.0, 4.0, -1.0));
        assert!((q - Vec3::new(3.0, 0.5, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_shadow_matrix_light_below_horizon() {
        assert!(shadow_matrix(Vec3::new(1.0, 0.0, 0.0), 0.0).is_none());
        assert!(shadow_matrix(Vec3::ZERO, 0.0).is_none());
    }
}
