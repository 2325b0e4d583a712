//! Asynchronous glTF model loading.
//!
//! Imports run as blocking tasks on a tokio runtime owned by the loader.
//! Each finished import comes back as a [`LoadOutcome`] over a channel that
//! the UI drains once per frame with [`ModelLoader::poll`].

use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use shared::Rgb;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::scene::Transform;
use crate::viewport::mesh::MeshData;

/// Errors while importing a model
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The glTF importer rejected the file
    Import(String),
    /// The document holds no scene to instantiate
    NoScene,
    /// The import task died before reporting
    Join(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Import(msg) => write!(f, "Import failed: {}", msg),
            LoadError::NoScene => write!(f, "File contains no scene"),
            LoadError::Join(msg) => write!(f, "Load task failed: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

/// One node of an imported hierarchy
#[derive(Debug, Clone)]
pub struct ModelNode {
    pub name: String,
    pub transform: Transform,
    /// All triangle primitives of the node's glTF mesh, merged
    pub mesh: Option<MeshData>,
    /// Base color of the node's first material
    pub color: Rgb,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    /// Number of nodes in this subtree, this one included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }

    /// Number of nodes carrying geometry in this subtree
    pub fn mesh_count(&self) -> usize {
        usize::from(self.mesh.is_some())
            + self.children.iter().map(ModelNode::mesh_count).sum::<usize>()
    }
}

/// An imported model, ready to be instantiated in the scene
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub name: String,
    /// Synthetic root grouping the glTF scene's top-level nodes
    pub root: ModelNode,
}

impl LoadedModel {
    /// Import a `.gltf` or `.glb` file
    pub fn import(path: &Path) -> Result<Self, LoadError> {
        let (document, buffers, _images) =
            gltf::import(path).map_err(|e| LoadError::Import(e.to_string()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Model".to_string());
        Self::from_gltf(&name, &document, &buffers)
    }

    /// Import from in-memory glTF JSON or GLB bytes
    pub fn from_slice(name: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let (document, buffers, _images) =
            gltf::import_slice(bytes).map_err(|e| LoadError::Import(e.to_string()))?;
        Self::from_gltf(name, &document, &buffers)
    }

    pub fn from_gltf(
        name: &str,
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
    ) -> Result<Self, LoadError> {
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or(LoadError::NoScene)?;

        let children = scene
            .nodes()
            .map(|node| convert_node(&node, buffers))
            .collect();

        Ok(Self {
            name: name.to_string(),
            root: ModelNode {
                name: name.to_string(),
                transform: Transform::IDENTITY,
                mesh: None,
                color: Rgb::WHITE,
                children,
            },
        })
    }
}

fn convert_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> ModelNode {
    let (translation, rotation, scale) = node.transform().decomposed();
    let name = node
        .name()
        .map(String::from)
        .unwrap_or_else(|| format!("Node {}", node.index()));

    let (mesh, color) = match node.mesh() {
        Some(mesh) => (read_mesh(&mesh, buffers), mesh_color(&mesh)),
        None => (None, Rgb::WHITE),
    };

    ModelNode {
        name,
        transform: Transform {
            position: Vec3::from(translation),
            rotation: Quat::from_array(rotation),
            scale: Vec3::from(scale),
        },
        mesh,
        color,
        children: node
            .children()
            .map(|child| convert_node(&child, buffers))
            .collect(),
    }
}

fn mesh_color(mesh: &gltf::Mesh) -> Rgb {
    mesh.primitives()
        .next()
        .map(|p| {
            let [r, g, b, _] = p.material().pbr_metallic_roughness().base_color_factor();
            Rgb::from_f32([r, g, b])
        })
        .unwrap_or(Rgb::WHITE)
}

/// Merge the triangle primitives of a glTF mesh. Primitives without normals
/// get flat normals.
fn read_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Option<MeshData> {
    let mut out = MeshData::default();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!("Skipping {:?} primitive in mesh {}", primitive.mode(), mesh.index());
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<Vec3> = positions.map(Vec3::from).collect();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        if indices.iter().any(|i| *i as usize >= positions.len()) {
            tracing::warn!("Index out of range in mesh {}", mesh.index());
            continue;
        }

        match reader.read_normals() {
            Some(normals) => {
                let base = out.vertex_count() as u32;
                for (p, n) in positions.iter().zip(normals) {
                    out.vertices.extend_from_slice(&[p.x, p.y, p.z, n[0], n[1], n[2]]);
                }
                out.indices.extend(indices.iter().map(|i| base + i));
            }
            None => {
                for tri in indices.chunks_exact(3) {
                    let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| positions[i as usize]);
                    let n = (b - a).cross(c - a).normalize_or_zero();
                    let base = out.vertex_count() as u32;
                    for p in [a, b, c] {
                        out.vertices.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
                    }
                    out.indices.extend_from_slice(&[base, base + 1, base + 2]);
                }
            }
        }
    }

    (!out.is_empty()).then_some(out)
}

/// Identifies one `load` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

/// Completion of a load
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub path: PathBuf,
    /// Where the model root goes in the scene
    pub position: Vec3,
    pub result: Result<LoadedModel, LoadError>,
}

/// Runs glTF imports off the UI thread
pub struct ModelLoader {
    runtime: tokio::runtime::Runtime,
    sender: UnboundedSender<LoadOutcome>,
    receiver: UnboundedReceiver<LoadOutcome>,
    next_ticket: u64,
    in_flight: usize,
}

impl ModelLoader {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("model-loader")
            .enable_all()
            .build()?;
        let (sender, receiver) = unbounded_channel();
        Ok(Self {
            runtime,
            sender,
            receiver,
            next_ticket: 0,
            in_flight: 0,
        })
    }

    /// Start importing `path`; returns at once
    pub fn load(&mut self, path: impl Into<PathBuf>, position: Vec3) -> LoadTicket {
        let path = path.into();
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight += 1;

        tracing::info!("Loading model {} (ticket {})", path.display(), ticket.0);

        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let import_path = path.clone();
            let result = tokio::task::spawn_blocking(move || LoadedModel::import(&import_path))
                .await
                .map_err(|e| LoadError::Join(e.to_string()))
                .and_then(|r| r);
            // Fails only once the loader is dropped
            let _ = sender.send(LoadOutcome {
                ticket,
                path,
                position,
                result,
            });
        });

        ticket
    }

    /// Loads started but not yet returned by `poll` or `wait`
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Finished loads, without blocking
    pub fn poll(&mut self) -> Vec<LoadOutcome> {
        let mut done = Vec::new();
        while let Ok(outcome) = self.receiver.try_recv() {
            done.push(outcome);
        }
        self.in_flight -= done.len().min(self.in_flight);
        done
    }

    /// Block until the next load finishes. `None` when nothing is in flight.
    /// Must not be called from inside an async context.
    pub fn wait(&mut self) -> Option<LoadOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.receiver.blocking_recv()?;
        self.in_flight -= 1;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write_temp_gltf, TRIANGLE_GLTF};

    #[test]
    fn test_from_slice_hierarchy() {
        let model = LoadedModel::from_slice("chair", TRIANGLE_GLTF.as_bytes()).unwrap();
        assert_eq!(model.name, "chair");
        assert_eq!(model.root.node_count(), 3);
        assert_eq!(model.root.mesh_count(), 1);

        let frame = &model.root.children[0];
        assert_eq!(frame.name, "Frame");
        let seat = &frame.children[0];
        assert_eq!(seat.name, "Seat");
        assert_eq!(seat.transform.position, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(seat.color, Rgb([255, 0, 0]));

        let mesh = seat.mesh.as_ref().unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        // No normals in the file: flat normal of the XY triangle
        assert_eq!(&mesh.vertices[3..6], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_from_slice_garbage() {
        assert!(matches!(
            LoadedModel::from_slice("bad", b"not gltf"),
            Err(LoadError::Import(_))
        ));
    }

    #[test]
    fn test_loader_success() {
        let path = write_temp_gltf();
        let mut loader = ModelLoader::new().unwrap();
        let ticket = loader.load(&path, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(loader.in_flight(), 1);

        let outcome = loader.wait().unwrap();
        assert_eq!(outcome.ticket, ticket);
        assert_eq!(outcome.position, Vec3::new(1.0, 0.0, 2.0));
        let model = outcome.result.unwrap();
        assert_eq!(model.root.mesh_count(), 1);
        assert_eq!(loader.in_flight(), 0);
        assert!(loader.wait().is_none());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_loader_missing_file() {
        let mut loader = ModelLoader::new().unwrap();
        loader.load("/nonexistent/sofa.glb", Vec3::ZERO);
        let outcome = loader.wait().unwrap();
        assert!(matches!(outcome.result, Err(LoadError::Import(_))));
    }

    #[test]
    fn test_multiple_loads_in_flight() {
        let path = write_temp_gltf();
        let mut loader = ModelLoader::new().unwrap();
        let a = loader.load(&path, Vec3::ZERO);
        let b = loader.load("/nonexistent/lamp.glb", Vec3::ZERO);
        assert_ne!(a, b);
        assert_eq!(loader.in_flight(), 2);

        let mut tickets = vec![loader.wait().unwrap().ticket, loader.wait().unwrap().ticket];
        tickets.sort_by_key(|t| t.0);
        assert_eq!(tickets, vec![a, b]);
        assert!(loader.poll().is_empty());

        let _ = std::fs::remove_file(path);
    }
}
