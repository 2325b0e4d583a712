//! Opening cavities for windows and doors

use glam::{Mat4, Vec3};
use shared::{OpeningKind, OpeningSize};

use super::csg::{subtract, CsgError};
use super::primitives::box_mesh;
use crate::viewport::mesh::MeshData;

/// Cavity box in the wall's local space.
///
/// The box is centered on the world `point` and shares the wall's world
/// rotation; a door drops so its base sits on the floor. `wall_world` is
/// the wall's world matrix.
pub fn opening_cavity(kind: OpeningKind, size: OpeningSize, point: Vec3, wall_world: Mat4) -> MeshData {
    let (_, rotation, _) = wall_world.to_scale_rotation_translation();

    let mut center = point;
    if kind == OpeningKind::Door {
        center.y = size.height / 2.0;
    }

    let cavity_world = Mat4::from_rotation_translation(rotation, center);
    let to_local = wall_world.inverse() * cavity_world;

    box_mesh(size.width, size.height, size.depth).transformed(to_local)
}

/// Wall mesh with the opening removed, in the wall's local space
pub fn carve_wall_mesh(
    wall_mesh: &MeshData,
    wall_world: Mat4,
    kind: OpeningKind,
    size: OpeningSize,
    point: Vec3,
) -> Result<MeshData, CsgError> {
    let cavity = opening_cavity(kind, size, point, wall_world);
    subtract(wall_mesh, &cavity)
}
