//! Scene graph node types

use glam::{Mat4, Quat, Vec3};
use shared::Rgb;
use uuid::Uuid;

use crate::viewport::mesh::MeshData;

/// Stable identifier of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 8 characters, for logs and labels
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a node stands for in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Pure container without geometry of its own
    Group,
    Floor,
    /// Perimeter, interior or carved wall
    Wall,
    /// Root of an imported model hierarchy
    ModelRoot,
    /// Any descendant of a model root
    ModelPart,
}

impl NodeRole {
    pub fn label(&self) -> &'static str {
        match self {
            NodeRole::Group => "group",
            NodeRole::Floor => "floor",
            NodeRole::Wall => "wall",
            NodeRole::ModelRoot => "model",
            NodeRole::ModelPart => "model part",
        }
    }
}

/// Local transform: translation, rotation and non-uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Position plus a rotation about the world Y axis
    pub fn from_position_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw),
            scale: Vec3::ONE,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Surface appearance of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
}

impl Material {
    pub fn new(color: Rgb) -> Self {
        Self { color }
    }
}

/// Which material a node renders with. Walls and the floor point at the
/// host's shared materials so one color change reaches all of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialSlot {
    Wall,
    Floor,
    Own(Material),
}

/// One node of the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub role: NodeRole,
    pub transform: Transform,
    /// Local-space geometry, `None` for groups
    pub mesh: Option<MeshData>,
    pub material: MaterialSlot,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub visible: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SceneNode {
    /// Empty group at the origin
    pub fn group(name: &str) -> Self {
        Self {
            id: NodeId::new(),
            name: name.to_string(),
            role: NodeRole::Group,
            transform: Transform::IDENTITY,
            mesh: None,
            material: MaterialSlot::Own(Material::new(Rgb::WHITE)),
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Node carrying geometry
    pub fn mesh(name: &str, role: NodeRole, mesh: MeshData, material: MaterialSlot) -> Self {
        Self {
            role,
            mesh: Some(mesh),
            material,
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn is_wall(&self) -> bool {
        self.role == NodeRole::Wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ids_unique() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn test_transform_matrix_roundtrip() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.5),
            scale: Vec3::new(2.0, 1.0, 1.0),
        };
        let back = Transform::from_matrix(t.matrix());
        assert!(back.position.abs_diff_eq(t.position, 1e-5));
        assert!(back.scale.abs_diff_eq(t.scale, 1e-5));
        assert!(back.rotation.abs_diff_eq(t.rotation, 1e-5));
    }

    #[test]
    fn test_group_defaults() {
        let g = SceneNode::group("room");
        assert_eq!(g.role, NodeRole::Group);
        assert!(g.mesh.is_none());
        assert!(g.visible);
        assert!(!g.is_wall());
    }
}
