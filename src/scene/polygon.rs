use crate::{
    bitmap::{Bitmap, Pixel},
    maths::{Vec2f, Vec3f},
};

/// One triangle corner.
///
/// Every coordinate space lives side by side so the transform stage can
/// cache its results on the vertex itself: `model` and `texture` are inputs,
/// `world`, `view` and `screen` are rewritten by each render pass
/// (`screen.z` keeps the view-space Z for the depth test).
///
/// `texture` is in texel units, not 0..1: `(0,0)` is the first texel,
/// `(w-1,h-1)` the last.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub model: Vec3f,
    pub world: Vec3f,
    pub view: Vec3f,
    pub screen: Vec3f,
    pub texture: Vec2f,
}

impl Vertex {
    pub fn new(model: Vec3f, texture: Vec2f) -> Self {
        Vertex {
            model,
            texture,
            ..Default::default()
        }
    }
}

/// A textured triangle plus the per-frame products of the transform stage.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    pub verts: [Vertex; 3],
    /// View-space face normal, rewritten each render.
    pub normal: Vec3f,
    /// Set by the backface test; backfacing polygons are never rasterized.
    pub backfacing: bool,
    /// Index into the owning buffer's texture table.
    pub texture: usize,
}

impl Polygon {
    pub fn new(verts: [Vertex; 3], texture: usize) -> Self {
        Polygon {
            verts,
            texture,
            ..Default::default()
        }
    }
}

/// Caller-owned list of polygons and the textures they reference.
///
/// `Context::render` rewrites the transform fields of every polygon in
/// place; model coordinates, UVs and the textures are read-only.
#[derive(Default, Debug, Clone)]
pub struct PolygonBuffer<P: Pixel> {
    pub polys: Vec<Polygon>,
    pub textures: Vec<Bitmap<P>>,
}

impl<P: Pixel> PolygonBuffer<P> {
    pub fn new() -> Self {
        PolygonBuffer {
            polys: Vec::new(),
            textures: Vec::new(),
        }
    }

    /// Registers `texture` and returns its index for [`Polygon::texture`].
    pub fn add_texture(&mut self, texture: Bitmap<P>) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn len(&self) -> usize {
        self.polys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }
}
