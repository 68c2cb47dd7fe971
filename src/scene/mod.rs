//! Describing what gets rendered: cameras, polygons, textures, meshes.
mod camera;
pub use camera::Camera;
pub mod mesh_library;
pub mod obj_file;
mod polygon;
pub use polygon::{Polygon, PolygonBuffer, Vertex};
