pub mod editor;
pub mod gizmo;
pub mod registry;
pub mod settings;

pub use editor::{ClickEvent, ClickOutcome, Editor};
pub use gizmo::{GizmoAxis, TransformGizmo};
pub use registry::ObjectRegistry;
pub use settings::EditorSettings;
