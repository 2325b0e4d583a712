//! Scene host: graph, camera, lights, shared materials and output size

use glam::Vec3;
use shared::Rgb;

use super::graph::SceneGraph;
use super::node::{Material, MaterialSlot, NodeId, SceneNode};
use crate::state::settings::{EditorSettings, ViewportSettings};
use crate::viewport::camera::OrbitCamera;

/// Ambient plus one directional light
#[derive(Debug, Clone)]
pub struct LightRig {
    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    pub directional_color: Rgb,
    pub directional_intensity: f32,
    pub directional_position: Vec3,
}

impl LightRig {
    /// Unit vector pointing from the scene toward the directional light
    pub fn direction_to_light(&self) -> Vec3 {
        self.directional_position.try_normalize().unwrap_or(Vec3::Y)
    }
}

/// Output surface size in logical points plus the applied pixel ratio
#[derive(Debug, Clone, Copy)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub max_pixel_ratio: f32,
}

impl ViewportSize {
    /// Physical pixel size of the render target
    pub fn physical(&self) -> [u32; 2] {
        [
            (self.width * self.pixel_ratio).round().max(0.0) as u32,
            (self.height * self.pixel_ratio).round().max(0.0) as u32,
        ]
    }
}

/// Everything the renderer draws
pub struct SceneHost {
    pub graph: SceneGraph,
    /// Group holding the floor and every wall
    pub room_group: NodeId,
    /// Current floor node, present once a room is generated
    pub floor: Option<NodeId>,
    pub camera: OrbitCamera,
    pub lights: LightRig,
    /// Shared by every wall, carved ones included
    pub wall_material: Material,
    pub floor_material: Material,
    pub background: Rgb,
    pub viewport: ViewportSize,
    pub shadows: bool,
}

impl SceneHost {
    pub fn new(settings: &EditorSettings) -> Self {
        let mut graph = SceneGraph::new();
        let room_group = graph.add_root(SceneNode::group("Room"));

        let vp = &settings.viewport;
        let mut camera = OrbitCamera::from_eye(Vec3::from(vp.camera_eye), Vec3::ZERO, vp.fov);
        camera.damping = vp.damping;

        let light = &settings.lighting;
        Self {
            graph,
            room_group,
            floor: None,
            camera,
            lights: LightRig {
                ambient_color: light.ambient_color,
                ambient_intensity: light.ambient_intensity,
                directional_color: light.directional_color,
                directional_intensity: light.directional_intensity,
                directional_position: Vec3::from(light.directional_position),
            },
            wall_material: Material::new(settings.wall.color),
            floor_material: Material::new(settings.floor_color),
            background: vp.background,
            viewport: ViewportSize {
                width: 1280.0,
                height: 720.0,
                pixel_ratio: 1.0,
                max_pixel_ratio: vp.max_pixel_ratio,
            },
            shadows: vp.shadows,
        }
    }

    /// Track a new output size. The camera aspect follows; the pixel ratio
    /// is capped at the configured maximum. Zero-height sizes keep the
    /// previous aspect.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.viewport.pixel_ratio = device_pixel_ratio.min(self.viewport.max_pixel_ratio);
        if width > 0.0 && height > 0.0 {
            self.camera.aspect = width / height;
        }
    }

    /// Put the camera back at its configured start, keeping the aspect
    pub fn reset_camera(&mut self, settings: &ViewportSettings) {
        let aspect = self.camera.aspect;
        self.camera = OrbitCamera::from_eye(Vec3::from(settings.camera_eye), Vec3::ZERO, settings.fov);
        self.camera.damping = settings.damping;
        self.camera.aspect = aspect;
    }

    /// Resolved material of a material slot
    pub fn material(&self, slot: MaterialSlot) -> Material {
        match slot {
            MaterialSlot::Wall => self.wall_material,
            MaterialSlot::Floor => self.floor_material,
            MaterialSlot::Own(m) => m,
        }
    }

    /// Per-frame tick. Returns true while the camera is still easing.
    pub fn update(&mut self) -> bool {
        self.camera.update()
    }
}
