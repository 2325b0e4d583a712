//! Room shell geometry: floor plane and perimeter walls

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use shared::RoomDimensions;

use super::primitives::{box_mesh, plane_mesh};
use crate::scene::Transform;
use crate::viewport::mesh::MeshData;

/// A wall box and where it goes. The box's long axis is local X and its
/// thickness is local Z.
#[derive(Debug, Clone)]
pub struct WallPlacement {
    pub name: String,
    pub length: f32,
    pub height: f32,
    pub thickness: f32,
    pub transform: Transform,
}

impl WallPlacement {
    pub fn mesh(&self) -> MeshData {
        box_mesh(self.length, self.height, self.thickness)
    }
}

/// Floor rectangle of `width × depth` lying on y = 0
pub fn floor_mesh(dims: &RoomDimensions) -> MeshData {
    plane_mesh(dims.width, dims.depth)
}

/// Back, left and right walls, in that order. The front stays open so the
/// default camera can look in.
pub fn perimeter_walls(dims: &RoomDimensions, thickness: f32) -> Vec<WallPlacement> {
    let RoomDimensions {
        width,
        depth,
        height,
    } = *dims;
    let y = height / 2.0;

    vec![
        WallPlacement {
            name: "Back wall".into(),
            length: width,
            height,
            thickness,
            transform: Transform::from_position(Vec3::new(0.0, y, -depth / 2.0)),
        },
        WallPlacement {
            name: "Left wall".into(),
            length: depth,
            height,
            thickness,
            transform: Transform::from_position_yaw(Vec3::new(-width / 2.0, y, 0.0), FRAC_PI_2),
        },
        WallPlacement {
            name: "Right wall".into(),
            length: depth,
            height,
            thickness,
            transform: Transform::from_position_yaw(Vec3::new(width / 2.0, y, 0.0), FRAC_PI_2),
        },
    ]
}
