//! The fixed-function pipeline: context lifecycle, projection setup, and
//! the render entry point.

mod depth;
pub use depth::DepthBuffer;
mod frustum;
pub use frustum::Frustum;
mod pipeline;
mod raster;

use log::debug;
use thiserror::Error;

use crate::{
    bitmap::{Bitmap, Pixel},
    maths::{AffineMatrix, Vec2f},
    scene::{Camera, PolygonBuffer},
};

/// Smallest viewport `set_perspective` accepts, `(width, height)`.
pub const MIN_VIEWPORT: (u32, u32) = (320, 240);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("viewport {width}x{height} is smaller than the 320x240 minimum")]
    InvalidViewport { width: u32, height: u32 },
    #[error("buffer allocation failed")]
    OutOfMemory,
}

/// Context lifecycle. Operations invoked below their required state are
/// silent no-ops.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    #[default]
    Empty,
    /// Frustum and buffers exist; waiting for a camera.
    Created,
    /// A camera is bound; drawing is allowed.
    Ready,
}

/// Everything `set_perspective` builds for one viewport size.
#[derive(Debug)]
struct RenderTarget<P: Pixel> {
    frustum: Frustum,
    frame: Bitmap<P>,
    depth: DepthBuffer,
}

/// The pipeline's whole state: current world-to-view transform, bound
/// camera, and the owned framebuffer and depth buffer.
///
/// Lifecycle: [`Context::new`] (Empty) → [`Context::set_perspective`]
/// (Created) → [`Context::look_at`] (Ready) → [`Context::clear`] /
/// [`Context::render`]. Dropping the context releases the buffers.
#[derive(Debug)]
pub struct Context<P: Pixel> {
    state: State,
    worldview: AffineMatrix,
    camera: Option<Camera>,
    target: Option<RenderTarget<P>>,
    clear_color: P,
}

impl<P: Pixel> Context<P> {
    pub fn new() -> Self {
        Context {
            state: State::Empty,
            worldview: AffineMatrix::IDENTITY,
            camera: None,
            target: None,
            clear_color: P::NEUTRAL_GREY,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The camera bound by the last `look_at`.
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Framebuffer for presentation; `None` until `set_perspective`.
    pub fn framebuffer(&self) -> Option<&Bitmap<P>> {
        self.target.as_ref().map(|t| &t.frame)
    }

    pub fn frustum(&self) -> Option<&Frustum> {
        self.target.as_ref().map(|t| &t.frustum)
    }

    pub fn depth(&self) -> Option<&DepthBuffer> {
        self.target.as_ref().map(|t| &t.depth)
    }

    /// The color `clear` paints the framebuffer with. Defaults to
    /// [`Pixel::NEUTRAL_GREY`].
    pub fn set_clear_color(&mut self, color: P) {
        self.clear_color = color;
    }

    /// (Re)creates the frustum, framebuffer and depth buffer for
    /// `viewport`, replacing any previous ones wholesale. `fov` is the
    /// full horizontal view angle in degrees. A camera must be re-bound
    /// with `look_at` before the next `render`.
    pub fn set_perspective(
        &mut self,
        viewport: Vec2f,
        z_near: f32,
        z_far: f32,
        fov: f32,
    ) -> Result<(), RasterError> {
        let (width, height) = (viewport.x as u32, viewport.y as u32);
        if width < MIN_VIEWPORT.0 || height < MIN_VIEWPORT.1 {
            return Err(RasterError::InvalidViewport { width, height });
        }

        let depth = DepthBuffer::new(width as usize, height as usize, z_far)?;
        self.target = Some(RenderTarget {
            frustum: Frustum::new(viewport, z_near, z_far, fov),
            frame: Bitmap::filled(width as usize, height as usize, self.clear_color),
            depth,
        });
        self.state = State::Created;

        debug!("viewport {width}x{height}, z {z_near}..{z_far}, fov {fov}");
        Ok(())
    }

    /// Binds a copy of `camera` and rebuilds the world-to-view matrix.
    /// No-op before `set_perspective`.
    pub fn look_at(&mut self, camera: &Camera) {
        if self.state < State::Created {
            return;
        }
        self.camera = Some(*camera);
        self.worldview = camera.view_matrix();
        self.state = State::Ready;
    }

    /// Resets every depth cell to the far plane and paints the framebuffer
    /// with the clear color. No-op before `set_perspective`.
    pub fn clear(&mut self) {
        if self.state < State::Created {
            return;
        }
        let Some(target) = self.target.as_mut() else {
            return;
        };
        target.depth.clear(target.frustum.far);
        target.frame.fill(self.clear_color);
    }

    /// Transforms, culls, projects and rasterizes `obj`.
    ///
    /// The transform results (`world`, `view`, `screen`, `normal`,
    /// `backfacing`) are written back into `obj`'s polygons; model
    /// coordinates, UVs and the texture table are only read. Polygons
    /// referencing a missing texture are skipped. No-op before `look_at`.
    pub fn render(&mut self, obj: &mut PolygonBuffer<P>, model: Option<&AffineMatrix>) {
        if self.state < State::Ready {
            return;
        }
        let Some(target) = self.target.as_mut() else {
            return;
        };

        pipeline::transform_and_cull(&self.worldview, &target.frustum, obj, model);

        for poly in obj.polys.iter().filter(|p| !p.backfacing) {
            let Some(texture) = obj.textures.get(poly.texture) else {
                continue;
            };
            raster::raster_polygon(
                &mut target.frame,
                &mut target.depth,
                &target.frustum,
                poly,
                texture,
            );
        }
    }
}

impl<P: Pixel> Default for Context<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, State};
    use crate::{maths::Vec2f, scene::Camera};

    #[test]
    fn operations_below_their_state_do_nothing() {
        let mut ctx: Context<u8> = Context::new();
        ctx.look_at(&Camera::default());
        assert_eq!(ctx.state(), State::Empty);
        assert!(ctx.camera().is_none());
        ctx.clear();
        assert!(ctx.framebuffer().is_none());
    }

    #[test]
    fn reprojection_demands_a_fresh_camera() {
        let mut ctx: Context<u8> = Context::new();
        let viewport = Vec2f::new(320., 240.);
        ctx.set_perspective(viewport, 1., 10., 90.).unwrap();
        ctx.look_at(&Camera::default());
        assert_eq!(ctx.state(), State::Ready);
        ctx.set_perspective(viewport, 1., 10., 90.).unwrap();
        assert_eq!(ctx.state(), State::Created);
    }

    #[test]
    fn clear_color_is_configurable() {
        let mut ctx: Context<u32> = Context::new();
        ctx.set_clear_color(0xff00_40ff);
        ctx.set_perspective(Vec2f::new(320., 240.), 1., 10., 90.)
            .unwrap();
        ctx.clear();
        let frame = ctx.framebuffer().unwrap();
        assert!(frame.pixels().iter().all(|&c| c == 0xff00_40ff));
    }
}
