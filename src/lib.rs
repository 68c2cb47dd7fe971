//! CPU-only, single-threaded rendering pipeline for textured triangle
//! meshes: model-world-view transform, backface culling, pinhole projection,
//! and perspective-correct scanline rasterization against a float depth
//! buffer. The host drives the frame loop: `clear`, `look_at`, `render` for
//! each mesh, then presents the framebuffer.

pub mod bitmap;
pub mod maths;
pub mod rasterizer;
pub mod scene;
#[cfg(feature = "demo")]
pub mod window;

pub use bitmap::{Bitmap, Pixel};
pub use rasterizer::{Context, DepthBuffer, Frustum, RasterError, State};
pub use scene::{Camera, Polygon, PolygonBuffer, Vertex};
