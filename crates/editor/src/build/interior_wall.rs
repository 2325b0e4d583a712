//! Interior wall placement between two floor points

use glam::Vec3;

use super::room::WallPlacement;
use crate::scene::Transform;

/// Wall running from `start` to `end` on the floor.
///
/// The box's local X axis is turned onto the start→end direction, so a
/// rotation of `atan2(-dz, dx)` about Y. Coincident points give a
/// zero-length wall.
pub fn interior_wall(start: Vec3, end: Vec3, height: f32, thickness: f32) -> WallPlacement {
    let delta = end - start;
    let length = start.distance(end);
    let mid = (start + end) * 0.5;
    let yaw = (-delta.z).atan2(delta.x);

    WallPlacement {
        name: "Interior wall".into(),
        length,
        height,
        thickness,
        transform: Transform::from_position_yaw(Vec3::new(mid.x, height / 2.0, mid.z), yaw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_axis(w: &WallPlacement) -> Vec3 {
        w.transform.rotation * Vec3::X
    }

    #[test]
    fn test_wall_along_z() {
        let w = interior_wall(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), 3.0, 0.1);
        assert!((w.length - 5.0).abs() < 1e-6);
        assert!(w.transform.position.abs_diff_eq(Vec3::new(0.0, 1.5, 2.5), 1e-6));
        assert!(long_axis(&w).abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_wall_diagonal_endpoints() {
        let start = Vec3::new(-1.0, 0.0, 1.0);
        let end = Vec3::new(2.0, 0.0, -3.0);
        let w = interior_wall(start, end, 2.5, 0.1);
        assert!((w.length - 5.0).abs() < 1e-5);

        let half = long_axis(&w) * (w.length / 2.0);
        let center = Vec3::new(w.transform.position.x, 0.0, w.transform.position.z);
        assert!((center - half).abs_diff_eq(start, 1e-5));
        assert!((center + half).abs_diff_eq(end, 1e-5));
    }

    #[test]
    fn test_zero_length_wall() {
        let p = Vec3::new(1.0, 0.0, 1.0);
        let w = interior_wall(p, p, 3.0, 0.1);
        assert_eq!(w.length, 0.0);
    }
}
