//! Scene graph and the host that owns it.

mod draw;
mod graph;
mod host;
mod node;

pub use draw::{shadow_matrix, DrawItem, SHADOW_PLANE_Y};
pub use graph::SceneGraph;
pub use host::{LightRig, SceneHost, ViewportSize};
pub use node::{Material, MaterialSlot, NodeId, NodeRole, SceneNode, Transform};
