use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;

/// Orbit camera with damped rotation, pan and zoom.
///
/// Input accumulates into pending deltas; [`OrbitCamera::update`] applies a
/// `damping` fraction of them per frame and decays the rest, so motion eases
/// out after the pointer is released.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Width / height of the output
    pub aspect: f32,
    /// Fraction of the pending motion applied per update. Zero disables damping.
    pub damping: f32,
    pending_rotation: Vec2,
    pending_pan: Vec3,
    pending_zoom: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_eye(Vec3::new(5.0, 6.0, 8.0), Vec3::ZERO, 75.0)
    }
}

impl OrbitCamera {
    pub const MIN_DISTANCE: f32 = 0.5;
    pub const MAX_DISTANCE: f32 = 200.0;
    const PITCH_LIMIT: f32 = 1.55;

    /// Camera at `eye` looking at `target`
    pub fn from_eye(eye: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(Self::MIN_DISTANCE);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            target,
            fov: fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
            damping: 0.05,
            pending_rotation: Vec2::ZERO,
            pending_pan: Vec3::ZERO,
            pending_zoom: 0.0,
        }
    }

    /// Queue an orbit by `dx`/`dy` degrees
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_rotation += Vec2::new(dx.to_radians(), dy.to_radians());
    }

    /// Queue a zoom; positive moves closer
    pub fn zoom(&mut self, delta: f32) {
        self.pending_zoom += delta;
    }

    /// Queue a pan in view-plane units
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pending_pan += self.right_vector() * dx + self.up_vector() * dy;
    }

    /// Advance damping by one frame. Returns true while motion is pending.
    pub fn update(&mut self) -> bool {
        let factor = if self.damping > 0.0 { self.damping } else { 1.0 };

        self.yaw -= self.pending_rotation.x * factor;
        self.pitch = (self.pitch + self.pending_rotation.y * factor)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.target += self.pending_pan * factor;
        self.distance = (self.distance * (1.0 - self.pending_zoom * factor))
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);

        let decay = 1.0 - factor;
        self.pending_rotation *= decay;
        self.pending_pan *= decay;
        self.pending_zoom *= decay;

        let moving = self.pending_rotation.length_squared() > 1e-10
            || self.pending_pan.length_squared() > 1e-10
            || self.pending_zoom.abs() > 1e-6;
        if !moving {
            self.pending_rotation = Vec2::ZERO;
            self.pending_pan = Vec3::ZERO;
            self.pending_zoom = 0.0;
        }
        moving
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a world point to normalized device coordinates.
    /// `None` when the point is behind the camera.
    pub fn project_ndc(&self, point: Vec3) -> Option<Vec2> {
        let p = self.view_projection() * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(p.x / p.w, p.y / p.w))
    }

    /// Ray from the eye through normalized device coordinates
    /// (x right, y up, both in -1..=1)
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let vp_inv = self.view_projection().inverse();

        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }
}
