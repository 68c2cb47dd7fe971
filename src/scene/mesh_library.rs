//! Procedural textures and meshes for demos and tests.

use rand::RngCore;

use super::{Polygon, PolygonBuffer, Vertex};
use crate::{
    bitmap::{Bitmap, Pixel},
    maths::{Vec2f, Vec3f},
};

/// `size`x`size` checkerboard of `cell`-texel squares.
pub fn checkerboard<P: Pixel>(size: usize, cell: usize, dark: P, light: P) -> Bitmap<P> {
    let mut bmp = Bitmap::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let color = if (x / cell + y / cell) % 2 == 0 {
                dark
            } else {
                light
            };
            bmp.put(x, y, color);
        }
    }
    bmp
}

/// Random opaque ARGB speckle; `mask` selects the channel bits kept.
pub fn noise(size: usize, mask: u32) -> Bitmap<u32> {
    let mut rng = rand::rng();
    let mut bmp = Bitmap::new(size, size);
    for y in 0..size {
        for x in 0..size {
            bmp.put(x, y, 0xff00_0000 | (rng.next_u32() & mask));
        }
    }
    bmp
}

/// Square-based pyramid around `center`, base half-width `half`, apex
/// `height` above the base. Faces are wound clockwise seen from outside,
/// which is the order the backface test keeps.
pub fn pyramid<P: Pixel>(
    buf: &mut PolygonBuffer<P>,
    texture: usize,
    center: Vec3f,
    half: f32,
    height: f32,
) {
    let (tw, th) = texel_extent(buf, texture);
    let a = center + Vec3f::new(-half, 0., -half);
    let b = center + Vec3f::new(half, 0., -half);
    let c = center + Vec3f::new(half, 0., half);
    let d = center + Vec3f::new(-half, 0., half);
    let apex = center + Vec3f::new(0., height, 0.);

    for (lo, hi) in [(a, b), (b, c), (c, d), (d, a)] {
        buf.polys.push(Polygon::new(
            [
                Vertex::new(lo, Vec2f::new(0., th)),
                Vertex::new(hi, Vec2f::new(tw, th)),
                Vertex::new(apex, Vec2f::new(tw * 0.5, 0.)),
            ],
            texture,
        ));
    }

    // Base, seen from below.
    quad(buf, texture, [a, d, c, b], tw, th);
}

/// Horizontal quad at height `y` spanning `half` in both directions,
/// visible from above.
pub fn floor<P: Pixel>(buf: &mut PolygonBuffer<P>, texture: usize, y: f32, half: f32) {
    let (tw, th) = texel_extent(buf, texture);
    quad(
        buf,
        texture,
        [
            Vec3f::new(-half, y, -half),
            Vec3f::new(half, y, -half),
            Vec3f::new(half, y, half),
            Vec3f::new(-half, y, half),
        ],
        tw,
        th,
    );
}

fn texel_extent<P: Pixel>(buf: &PolygonBuffer<P>, texture: usize) -> (f32, f32) {
    let t = &buf.textures[texture];
    ((t.width() - 1) as f32, (t.height() - 1) as f32)
}

fn quad<P: Pixel>(buf: &mut PolygonBuffer<P>, texture: usize, p: [Vec3f; 4], tw: f32, th: f32) {
    let uv = [
        Vec2f::new(0., 0.),
        Vec2f::new(tw, 0.),
        Vec2f::new(tw, th),
        Vec2f::new(0., th),
    ];
    buf.polys.push(Polygon::new(
        [
            Vertex::new(p[0], uv[0]),
            Vertex::new(p[1], uv[1]),
            Vertex::new(p[2], uv[2]),
        ],
        texture,
    ));
    buf.polys.push(Polygon::new(
        [
            Vertex::new(p[0], uv[0]),
            Vertex::new(p[2], uv[2]),
            Vertex::new(p[3], uv[3]),
        ],
        texture,
    ));
}

#[cfg(test)]
mod tests {
    use super::{checkerboard, noise, pyramid};
    use crate::{maths::Vec3f, scene::PolygonBuffer};

    #[test]
    fn checkerboard_alternates_cells() {
        let bmp = checkerboard::<u8>(8, 2, 0, 255);
        assert_eq!(bmp.get(0, 0), 0);
        assert_eq!(bmp.get(2, 0), 255);
        assert_eq!(bmp.get(2, 2), 0);
        assert_eq!(bmp.get(0, 2), 255);
    }

    #[test]
    fn noise_is_opaque() {
        let bmp = noise(4, 0x00ff_ffff);
        assert!(bmp.pixels().iter().all(|&p| p >> 24 == 0xff));
    }

    #[test]
    fn pyramid_has_six_faces() {
        let mut buf: PolygonBuffer<u32> = PolygonBuffer::new();
        let tex = buf.add_texture(crate::bitmap::Bitmap::filled(2, 2, 0xffff_ffff));
        pyramid(&mut buf, tex, Vec3f::new(0., 0., 0.), 1., 2.);
        assert_eq!(buf.len(), 6);
        // UVs stay inside the 2x2 texture.
        for poly in &buf.polys {
            for v in &poly.verts {
                assert!(v.texture.x >= 0. && v.texture.x <= 1.);
                assert!(v.texture.y >= 0. && v.texture.y <= 1.);
            }
        }
    }
}
