//! Room geometry: primitives, walls, openings and the CSG bridge.

pub mod csg;
pub mod interior_wall;
pub mod opening;
pub mod primitives;
pub mod room;

pub use csg::CsgError;
pub use interior_wall::interior_wall;
pub use opening::{carve_wall_mesh, opening_cavity};
pub use room::{floor_mesh, perimeter_walls, WallPlacement};
