// Library crate: exposes the editor core for integration tests and the
// JSON command protocol. Window, UI and GL rendering stay in the binary crate.

pub mod build;
pub mod command;
pub mod fixtures;
pub mod harness;
pub mod i18n;
pub mod loader;
pub mod scene;
pub mod state;
pub mod validation;

/// Viewport types the core needs: mesh buffers, camera and picking.
/// The GL renderer and gizmo drawing stay in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
    pub mod picking;
}
