use glam::{Mat4, Vec3};

use super::mesh::MeshData;
use crate::scene::{NodeId, SceneGraph};

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray in the space described by `inverse` (world -> local).
    /// The direction is left unnormalized so hit distances stay in the
    /// caller's units.
    pub fn transformed(&self, inverse: Mat4) -> Ray {
        Ray {
            origin: inverse.transform_point3(self.origin),
            direction: inverse.transform_vector3(self.direction),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_mesh(data: &MeshData) -> Option<Self> {
        data.bounds().map(|(min, max)| Self { min, max })
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection, double-sided.
/// Returns the distance along the ray if hit.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-9;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > 1e-6 {
        Some(t)
    } else {
        None
    }
}

/// Nearest hit of a ray against a mesh, as a ray parameter
pub fn ray_mesh(ray: &Ray, mesh: &MeshData) -> Option<f32> {
    let aabb = Aabb::from_mesh(mesh)?;
    // Flat meshes (the floor plane) have a zero-thickness box; let the
    // triangle test decide for them.
    let flat = (aabb.max - aabb.min).min_element() <= f32::EPSILON;
    if !flat && ray_aabb(ray, &aabb).is_none() {
        return None;
    }

    mesh.triangles()
        .filter_map(|[a, b, c]| ray_triangle_intersect(ray, a, b, c))
        .min_by(|a, b| a.total_cmp(b))
}

/// One ray hit against a scene node
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    /// Node whose geometry was hit
    pub node: NodeId,
    /// World-space distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Cast `ray` against `targets`, optionally including their descendants.
/// Hidden nodes are skipped. Results are sorted nearest first.
pub fn raycast(graph: &SceneGraph, ray: &Ray, targets: &[NodeId], recursive: bool) -> Vec<Intersection> {
    let direction = ray.direction.normalize_or_zero();
    let world_ray = Ray {
        origin: ray.origin,
        direction,
    };

    let candidates: Vec<NodeId> = if recursive {
        targets.iter().flat_map(|t| graph.subtree(*t)).collect()
    } else {
        targets.to_vec()
    };

    let mut hits: Vec<Intersection> = candidates
        .into_iter()
        .filter(|id| graph.is_visible(*id))
        .filter_map(|id| {
            let node = graph.get(id)?;
            let mesh = node.mesh.as_ref()?;
            let world = graph.world_matrix(id);
            let local_ray = world_ray.transformed(world.inverse());
            let t = ray_mesh(&local_ray, mesh)?;
            let point = world.transform_point3(local_ray.at(t));
            Some(Intersection {
                node: id,
                distance: (point - world_ray.origin).length(),
                point,
            })
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::primitives::{box_mesh, plane_mesh};
    use crate::scene::{MaterialSlot, NodeRole, SceneNode, Transform};

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, 10.0, z),
            direction: Vec3::NEG_Y,
        }
    }

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let ray = down_ray(0.2, 0.2);
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 1.0);
        assert!((ray_triangle_intersect(&ray, a, b, c).unwrap() - 10.0).abs() < 1e-5);
        assert!(ray_triangle_intersect(&down_ray(2.0, 2.0), a, b, c).is_none());
    }

    #[test]
    fn test_raycast_sorted_by_distance() {
        let mut g = SceneGraph::new();
        let low = g.add_root(
            SceneNode::mesh("low", NodeRole::Wall, box_mesh(1.0, 1.0, 1.0), MaterialSlot::Wall)
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.5, 0.0))),
        );
        let high = g.add_root(
            SceneNode::mesh("high", NodeRole::Wall, box_mesh(1.0, 1.0, 1.0), MaterialSlot::Wall)
                .with_transform(Transform::from_position(Vec3::new(0.0, 3.5, 0.0))),
        );

        let hits = raycast(&g, &down_ray(0.0, 0.0), &[low, high], false);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, high);
        assert!((hits[0].distance - 6.0).abs() < 1e-4);
        assert!(hits[0].point.abs_diff_eq(Vec3::new(0.0, 4.0, 0.0), 1e-4));
        assert_eq!(hits[1].node, low);
    }

    #[test]
    fn test_raycast_scaled_node_reports_world_distance() {
        let mut g = SceneGraph::new();
        let node = g.add_root(
            SceneNode::mesh("tall", NodeRole::Wall, box_mesh(1.0, 1.0, 1.0), MaterialSlot::Wall)
                .with_transform(Transform {
                    position: Vec3::ZERO,
                    rotation: glam::Quat::IDENTITY,
                    scale: Vec3::new(1.0, 4.0, 1.0),
                }),
        );
        let hits = raycast(&g, &down_ray(0.0, 0.0), &[node], false);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_recursive_reaches_children() {
        let mut g = SceneGraph::new();
        let root = g.add_root(SceneNode::group("model"));
        let child = g.add_child(
            root,
            SceneNode::mesh("part", NodeRole::ModelPart, box_mesh(1.0, 1.0, 1.0), MaterialSlot::Wall),
        );

        assert!(raycast(&g, &down_ray(0.0, 0.0), &[root], false).is_empty());
        let hits = raycast(&g, &down_ray(0.0, 0.0), &[root], true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, child);
    }

    #[test]
    fn test_raycast_floor_plane() {
        let mut g = SceneGraph::new();
        let floor = g.add_root(SceneNode::mesh(
            "floor",
            NodeRole::Floor,
            plane_mesh(4.0, 2.0),
            MaterialSlot::Floor,
        ));
        let hits = raycast(&g, &down_ray(1.5, -0.5), &[floor], false);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].point.abs_diff_eq(Vec3::new(1.5, 0.0, -0.5), 1e-4));
        assert!(raycast(&g, &down_ray(3.0, 0.0), &[floor], false).is_empty());
    }

    #[test]
    fn test_hidden_nodes_skipped() {
        let mut g = SceneGraph::new();
        let node = g.add_root(SceneNode::mesh(
            "box",
            NodeRole::Wall,
            box_mesh(1.0, 1.0, 1.0),
            MaterialSlot::Wall,
        ));
        g.get_mut(node).unwrap().visible = false;
        assert!(raycast(&g, &down_ray(0.0, 0.0), &[node], false).is_empty());
    }
}
