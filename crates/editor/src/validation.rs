//! Mesh validation utilities.
//!
//! `MeshValidator` checks mesh data integrity: stride, in-range indices,
//! finite positions, unit normals, bounding-box dimensions and whether the
//! surface is closed. Used on CSG output and imported geometry.

use std::collections::HashMap;

use glam::Vec3;

use crate::viewport::mesh::{MeshData, MESH_STRIDE};

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len() / MESH_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    /// Vertex buffer length is a multiple of the stride
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % MESH_STRIDE == 0
    }

    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    pub fn are_positions_finite(&self) -> bool {
        self.mesh.vertices.iter().all(|v| v.is_finite())
    }

    /// All vertex normals have unit length within `epsilon`
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        self.mesh.vertices.chunks_exact(MESH_STRIDE).all(|v| {
            let len = Vec3::new(v[3], v[4], v[5]).length();
            (len - 1.0).abs() <= epsilon
        })
    }

    /// Width, height and depth of the bounding box; zero for an empty mesh
    pub fn dimensions(&self) -> [f32; 3] {
        match self.mesh.bounds() {
            Some((min, max)) => (max - min).to_array(),
            None => [0.0; 3],
        }
    }

    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        dims.iter()
            .zip(expected)
            .all(|(d, e)| (d - e).abs() < tolerance)
    }

    /// Every edge, compared by position rounded to `quantum`, borders an
    /// even number of triangles.
    ///
    /// Flat-shaded meshes duplicate vertices per face, so edges are keyed on
    /// positions rather than indices.
    pub fn is_closed(&self, quantum: f32) -> bool {
        if self.triangle_count() == 0 || !self.are_indices_in_range() {
            return false;
        }
        let key = |i: u32| {
            let p = self.mesh.position(i as usize) / quantum;
            (p.x.round() as i64, p.y.round() as i64, p.z.round() as i64)
        };

        let mut edges: HashMap<_, u32> = HashMap::new();
        for tri in self.mesh.indices.chunks_exact(3) {
            let keys = [key(tri[0]), key(tri[1]), key(tri[2])];
            for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                let edge = if keys[a] < keys[b] {
                    (keys[a], keys[b])
                } else {
                    (keys[b], keys[a])
                };
                *edges.entry(edge).or_default() += 1;
            }
        }
        edges.values().all(|count| count % 2 == 0)
    }

    /// Run the structural checks. An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of {}",
                self.mesh.vertices.len(),
                MESH_STRIDE
            ));
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        }

        if !self.are_positions_finite() {
            errors.push("Vertex buffer holds non-finite values".to_string());
        }

        if self.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        errors
    }
}
