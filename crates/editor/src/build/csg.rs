//! Boolean subtraction on triangle meshes through the manifold kernel

use std::collections::HashMap;

use glam::Vec3;
use manifold_rs::Mesh;
use vcad::Part;

use crate::viewport::mesh::{MeshData, MESH_STRIDE};

/// Welding tolerance: positions closer than this share a vertex
const WELD_QUANTUM: f32 = 1e-5;

/// Failure of a boolean operation
#[derive(Debug, Clone, PartialEq)]
pub enum CsgError {
    /// An operand did not form a closed solid
    InvalidSolid(&'static str),
    /// The operation consumed the whole base solid
    EmptyResult,
}

impl std::fmt::Display for CsgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsgError::InvalidSolid(which) => write!(f, "{which} is not a closed solid"),
            CsgError::EmptyResult => write!(f, "Subtraction produced an empty solid"),
        }
    }
}

impl std::error::Error for CsgError {}

/// `base - tool`, both given in the same local space. The result is
/// flat-shaded in that space.
pub fn subtract(base: &MeshData, tool: &MeshData) -> Result<MeshData, CsgError> {
    let base = to_part("base", base).ok_or(CsgError::InvalidSolid("base"))?;
    let tool = to_part("tool", tool).ok_or(CsgError::InvalidSolid("tool"))?;

    let result = base.difference(&tool);
    let mesh = extract_mesh_data(&result).ok_or(CsgError::EmptyResult)?;

    tracing::debug!("csg subtract: {} tris", mesh.triangle_count());
    Ok(mesh)
}

/// Build a manifold part from a render mesh. Render meshes duplicate
/// vertices per face for flat normals, so coincident positions are merged
/// first to give the kernel a watertight topology.
fn to_part(name: &str, mesh: &MeshData) -> Option<Part> {
    if mesh.is_empty() {
        return None;
    }
    let (positions, indices) = weld(mesh);
    if indices.is_empty() {
        return None;
    }

    let manifold = Mesh::new(&positions, &indices).to_manifold();
    if manifold.is_empty() {
        return None;
    }
    Some(Part::new(name, manifold))
}

/// Merge coincident vertices. Returns flat positions (3 floats each) and
/// triangle indices, dropping triangles that collapse to a line.
pub fn weld(mesh: &MeshData) -> (Vec<f32>, Vec<u32>) {
    let mut lookup: HashMap<(i64, i64, i64), u32> = HashMap::new();
    let mut positions = Vec::new();
    let mut remap = Vec::with_capacity(mesh.vertex_count());

    for i in 0..mesh.vertex_count() {
        let p = mesh.position(i);
        let key = (
            (p.x / WELD_QUANTUM).round() as i64,
            (p.y / WELD_QUANTUM).round() as i64,
            (p.z / WELD_QUANTUM).round() as i64,
        );
        let index = *lookup.entry(key).or_insert_with(|| {
            positions.extend_from_slice(&[p.x, p.y, p.z]);
            (positions.len() / 3 - 1) as u32
        });
        remap.push(index);
    }

    let mut indices = Vec::with_capacity(mesh.indices.len());
    for tri in mesh.indices.chunks_exact(3) {
        let a = remap[tri[0] as usize];
        let b = remap[tri[1] as usize];
        let c = remap[tri[2] as usize];
        if a != b && b != c && a != c {
            indices.extend_from_slice(&[a, b, c]);
        }
    }

    (positions, indices)
}

/// Flat-shaded render mesh from a part, `None` when the part is empty
fn extract_mesh_data(part: &Part) -> Option<MeshData> {
    let mesh = part.to_mesh();
    let positions = mesh.vertices();
    let indices = mesh.indices();

    if positions.is_empty() || indices.is_empty() {
        return None;
    }

    let tri_count = indices.len() / 3;
    let mut vertices = Vec::with_capacity(tri_count * 3 * MESH_STRIDE);
    let mut new_indices = Vec::with_capacity(tri_count * 3);

    let at = |i: u32| {
        let i = i as usize * 3;
        Vec3::new(positions[i], positions[i + 1], positions[i + 2])
    };

    for tri in 0..tri_count {
        let p0 = at(indices[tri * 3]);
        let p1 = at(indices[tri * 3 + 1]);
        let p2 = at(indices[tri * 3 + 2]);

        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        // Slivers
        if normal == Vec3::ZERO {
            continue;
        }

        let base = (vertices.len() / MESH_STRIDE) as u32;
        for p in [p0, p1, p2] {
            vertices.extend_from_slice(&[p.x, p.y, p.z, normal.x, normal.y, normal.z]);
        }
        new_indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    (!new_indices.is_empty()).then_some(MeshData {
        vertices,
        indices: new_indices,
    })
}
