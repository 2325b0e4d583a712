//! Imported models and wall color

use glam::Vec3;
use shared::{EditorMode, Rgb};

use super::Editor;
use crate::loader::{LoadOutcome, LoadedModel, ModelNode};
use crate::scene::{Material, MaterialSlot, NodeId, NodeRole, SceneNode, Transform};

impl Editor {
    /// Add a loaded model as a top-level scene child at `position`, make it
    /// clickable, attach the gizmo and switch to translate.
    pub fn instantiate_model(&mut self, model: &LoadedModel, position: Vec3) -> NodeId {
        let mut root = SceneNode::group(&model.name).with_transform(Transform {
            position,
            ..model.root.transform
        });
        root.role = NodeRole::ModelRoot;
        let root_id = self.host.graph.add_root(root);

        for child in &model.root.children {
            self.spawn_model_node(root_id, child);
        }

        self.registry.add_clickable(root_id);
        self.gizmo.attach(root_id);
        self.set_mode(EditorMode::Translate);

        tracing::info!(
            "Added model '{}' ({} nodes) at ({:.2}, {:.2}, {:.2})",
            model.name,
            model.root.node_count(),
            position.x,
            position.y,
            position.z
        );
        root_id
    }

    fn spawn_model_node(&mut self, parent: NodeId, source: &ModelNode) {
        let material = MaterialSlot::Own(Material::new(source.color));
        let mut node = match &source.mesh {
            Some(mesh) => SceneNode::mesh(&source.name, NodeRole::ModelPart, mesh.clone(), material)
                .with_shadows(true, true),
            None => SceneNode::group(&source.name),
        }
        .with_transform(source.transform);
        node.role = NodeRole::ModelPart;

        let id = self.host.graph.add_child(parent, node);
        for child in &source.children {
            self.spawn_model_node(id, child);
        }
    }

    /// Apply a finished load: instantiate on success, record the error
    /// otherwise. Returns the new model root.
    pub fn apply_load_outcome(&mut self, outcome: LoadOutcome) -> Option<NodeId> {
        match outcome.result {
            Ok(model) => {
                self.last_load_error = None;
                Some(self.instantiate_model(&model, outcome.position))
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {e}", outcome.path.display());
                self.last_load_error = Some(format!("{}: {e}", outcome.path.display()));
                None
            }
        }
    }

    /// Recolor every wall through the shared wall material
    pub fn set_wall_color(&mut self, color: Rgb) {
        tracing::info!("Wall color {color}");
        self.host.wall_material.color = color;
    }
}
