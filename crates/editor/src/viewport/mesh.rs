use glam::{Mat4, Vec3};

/// Floats per vertex in [`MeshData::vertices`]
pub const MESH_STRIDE: usize = 6;

/// Floats per vertex in [`LineMeshData::vertices`]
pub const LINE_STRIDE: usize = 7;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z].
/// Color comes from the node's material, not the vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / MESH_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * MESH_STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    /// Iterate triangles as vertex position triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.position(tri[0] as usize),
                self.position(tri[1] as usize),
                self.position(tri[2] as usize),
            ]
        })
    }

    /// Flat list of positions, 3 floats per vertex
    pub fn positions(&self) -> Vec<f32> {
        self.vertices
            .chunks_exact(MESH_STRIDE)
            .flat_map(|v| [v[0], v[1], v[2]])
            .collect()
    }

    /// Local-space bounds, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..self.vertex_count() {
            let p = self.position(i);
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }

    /// Copy with positions and normals baked through `matrix`
    pub fn transformed(&self, matrix: Mat4) -> MeshData {
        let normal_matrix = matrix.inverse().transpose();
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for v in self.vertices.chunks_exact(MESH_STRIDE) {
            let p = matrix.transform_point3(Vec3::new(v[0], v[1], v[2]));
            let n = normal_matrix
                .transform_vector3(Vec3::new(v[3], v[4], v[5]))
                .normalize_or_zero();
            vertices.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
        }
        MeshData {
            vertices,
            indices: self.indices.clone(),
        }
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / LINE_STRIDE
    }

    pub fn push_segment(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        push_line_vert(&mut self.vertices, a.x, a.y, a.z, color);
        push_line_vert(&mut self.vertices, b.x, b.y, b.z, color);
    }
}

// ── Grid and axes ────────────────────────────────────────────

pub fn grid(range: i32, cell_size: f32, opacity: f32) -> LineMeshData {
    let mut vertices = Vec::new();
    let grid_color = [0.25_f32, 0.25, 0.25, opacity];
    let origin_color_x = [0.5_f32, 0.2, 0.2, opacity * 0.7];
    let origin_color_z = [0.2_f32, 0.2, 0.5, opacity * 0.7];

    let extent = range as f32 * cell_size;

    for i in -range..=range {
        let f = i as f32 * cell_size;
        let color = if i == 0 { origin_color_z } else { grid_color };
        // Line along Z
        push_line_vert(&mut vertices, f, 0.001, -extent, color);
        push_line_vert(&mut vertices, f, 0.001, extent, color);

        let color = if i == 0 { origin_color_x } else { grid_color };
        // Line along X
        push_line_vert(&mut vertices, -extent, 0.001, f, color);
        push_line_vert(&mut vertices, extent, 0.001, f, color);
    }

    LineMeshData { vertices }
}

/// Cross marker on the floor at `point`
pub fn floor_marker(point: Vec3, size: f32, color: [f32; 4]) -> LineMeshData {
    let mut lines = LineMeshData::default();
    let y = point.y + 0.01;
    lines.push_segment(
        Vec3::new(point.x - size, y, point.z),
        Vec3::new(point.x + size, y, point.z),
        color,
    );
    lines.push_segment(
        Vec3::new(point.x, y, point.z - size),
        Vec3::new(point.x, y, point.z + size),
        color,
    );
    lines
}

fn push_line_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, c: [f32; 4]) {
    v.extend_from_slice(&[px, py, pz, c[0], c[1], c[2], c[3]]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::primitives::box_mesh;

    #[test]
    fn test_box_bounds() {
        let mesh = box_mesh(2.0, 4.0, 6.0);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_transformed_moves_positions() {
        let mesh = box_mesh(1.0, 1.0, 1.0);
        let moved = mesh.transformed(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        let (min, max) = moved.bounds().unwrap();
        assert!((min.x - 9.5).abs() < 1e-5);
        assert!((max.x - 10.5).abs() < 1e-5);
        assert_eq!(moved.indices, mesh.indices);
    }

    #[test]
    fn test_grid_vertex_count() {
        let g = grid(2, 1.0, 0.5);
        // 5 lines per direction, 2 directions, 2 vertices each
        assert_eq!(g.vertex_count(), 20);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshData::default();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
    }
}
