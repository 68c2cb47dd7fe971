//! Perspective-correct scanline rasterization.
//!
//! A projected triangle is split at its middle vertex into an upper and a
//! lower segment sharing the long edge. `1/z`, `u/z` and `v/z` are linear
//! in screen space, so they interpolate down the left edge and across each
//! span; subpixel pre-stepping keeps every sample on the pixel-center grid
//! regardless of where the edges cut through the scanline.
//
// Scanline layout after the classic writeup at
// http://www.lysator.liu.se/~mikaelk/doc/perspectivetexture/

use std::mem;

use super::{depth::DepthBuffer, frustum::Frustum};
use crate::{
    bitmap::{Bitmap, Pixel},
    scene::Polygon,
};

/// Screen-space rates of `1/z`, `u/z`, `v/z`; constant across a triangle.
struct Gradients {
    diz_dx: f32,
    duiz_dx: f32,
    dviz_dx: f32,
    diz_dy: f32,
    duiz_dy: f32,
    dviz_dy: f32,
}

/// Interpolation state for one segment: both edge X positions plus the
/// attribute values riding the left edge, with their per-scanline rates.
struct EdgeState {
    xa: f32,
    xb: f32,
    dxdy_a: f32,
    dxdy_b: f32,
    iza: f32,
    uiza: f32,
    viza: f32,
    diz_dya: f32,
    duiz_dya: f32,
    dviz_dya: f32,
}

/// One vertex after projection: screen position and perspective terms.
#[derive(Clone, Copy)]
struct Corner {
    x: f32,
    y: f32,
    iz: f32,
    uiz: f32,
    viz: f32,
}

pub(super) fn raster_polygon<P: Pixel>(
    frame: &mut Bitmap<P>,
    depth: &mut DepthBuffer,
    frustum: &Frustum,
    poly: &Polygon,
    texture: &Bitmap<P>,
) {
    // Shift the coordinate system by (+0.5, +0.5) to match the subpixel
    // stepping below.
    let corner = |i: usize| {
        let v = &poly.verts[i];
        let iz = 1. / v.screen.z;
        Corner {
            x: v.screen.x + 0.5,
            y: v.screen.y + 0.5,
            iz,
            uiz: v.texture.x * iz,
            viz: v.texture.y * iz,
        }
    };
    let mut c1 = corner(0);
    let mut c2 = corner(1);
    let mut c3 = corner(2);

    // Sort the corners in ascending Y order.
    if c1.y > c2.y {
        mem::swap(&mut c1, &mut c2);
    }
    if c1.y > c3.y {
        mem::swap(&mut c1, &mut c3);
    }
    if c2.y > c3.y {
        mem::swap(&mut c2, &mut c3);
    }

    let y1i = c1.y as i32;
    let y2i = c2.y as i32;
    let y3i = c3.y as i32;

    // Too thin to cover a scanline at all.
    if y1i == y2i && y1i == y3i {
        return;
    }

    // Attribute increments per screen X and Y. Stable for any single zero
    // edge height; a fully degenerate triangle was rejected above.
    let dy = 1. / ((c3.x - c1.x) * (c2.y - c1.y) - (c2.x - c1.x) * (c3.y - c1.y));

    let grads = Gradients {
        diz_dx: ((c3.iz - c1.iz) * (c2.y - c1.y) - (c2.iz - c1.iz) * (c3.y - c1.y)) * dy,
        duiz_dx: ((c3.uiz - c1.uiz) * (c2.y - c1.y) - (c2.uiz - c1.uiz) * (c3.y - c1.y)) * dy,
        dviz_dx: ((c3.viz - c1.viz) * (c2.y - c1.y) - (c2.viz - c1.viz) * (c3.y - c1.y)) * dy,
        diz_dy: ((c2.iz - c1.iz) * (c3.x - c1.x) - (c3.iz - c1.iz) * (c2.x - c1.x)) * dy,
        duiz_dy: ((c2.uiz - c1.uiz) * (c3.x - c1.x) - (c3.uiz - c1.uiz) * (c2.x - c1.x)) * dy,
        dviz_dy: ((c2.viz - c1.viz) * (c3.x - c1.x) - (c3.viz - c1.viz) * (c2.x - c1.x)) * dy,
    };

    // Edge X slopes; an edge of zero height contributes none.
    let mut dxdy1 = 0.;
    let mut dxdy2 = 0.;
    let mut dxdy3 = 0.;
    if c2.y > c1.y {
        dxdy1 = (c2.x - c1.x) / (c2.y - c1.y);
    }
    if c3.y > c1.y {
        dxdy2 = (c3.x - c1.x) / (c3.y - c1.y);
    }
    if c3.y > c2.y {
        dxdy3 = (c3.x - c2.x) / (c3.y - c2.y);
    }

    // Which side the long (top-to-bottom) edge runs down, with flat-top
    // and flat-bottom tie-breaks.
    let mut side = dxdy2 > dxdy1;
    if c1.y == c2.y {
        side = c1.x > c2.x;
    }
    if c2.y == c3.y {
        side = c3.x > c2.x;
    }

    if !side {
        // Long edge on the left: its rates hold across both segments and
        // only the right edge swaps at the middle vertex.
        let diz_dya = dxdy2 * grads.diz_dx + grads.diz_dy;
        let duiz_dya = dxdy2 * grads.duiz_dx + grads.duiz_dy;
        let dviz_dya = dxdy2 * grads.dviz_dx + grads.dviz_dy;

        // Subpixel pre-step down to the first covered scanline.
        let dy = 1. - (c1.y - y1i as f32);
        let mut state = EdgeState {
            xa: c1.x + dy * dxdy2,
            xb: 0.,
            dxdy_a: dxdy2,
            dxdy_b: 0.,
            iza: c1.iz + dy * diz_dya,
            uiza: c1.uiz + dy * duiz_dya,
            viza: c1.viz + dy * dviz_dya,
            diz_dya,
            duiz_dya,
            dviz_dya,
        };

        if y1i < y2i {
            state.xb = c1.x + dy * dxdy1;
            state.dxdy_b = dxdy1;
            raster_segment(frame, depth, frustum, texture, &grads, &mut state, y1i, y2i);
        }
        if y2i < y3i {
            state.xb = c2.x + (1. - (c2.y - y2i as f32)) * dxdy3;
            state.dxdy_b = dxdy3;
            raster_segment(frame, depth, frustum, texture, &grads, &mut state, y2i, y3i);
        }
    } else {
        // Long edge on the right: XB rides it all the way down while the
        // left edge and its attribute rates restart at the middle vertex.
        let dy = 1. - (c1.y - y1i as f32);
        let mut state = EdgeState {
            xa: 0.,
            xb: c1.x + dy * dxdy2,
            dxdy_a: 0.,
            dxdy_b: dxdy2,
            iza: 0.,
            uiza: 0.,
            viza: 0.,
            diz_dya: 0.,
            duiz_dya: 0.,
            dviz_dya: 0.,
        };

        if y1i < y2i {
            state.dxdy_a = dxdy1;
            state.diz_dya = dxdy1 * grads.diz_dx + grads.diz_dy;
            state.duiz_dya = dxdy1 * grads.duiz_dx + grads.duiz_dy;
            state.dviz_dya = dxdy1 * grads.dviz_dx + grads.dviz_dy;

            state.xa = c1.x + dy * state.dxdy_a;
            state.iza = c1.iz + dy * state.diz_dya;
            state.uiza = c1.uiz + dy * state.duiz_dya;
            state.viza = c1.viz + dy * state.dviz_dya;

            raster_segment(frame, depth, frustum, texture, &grads, &mut state, y1i, y2i);
        }
        if y2i < y3i {
            state.dxdy_a = dxdy3;
            state.diz_dya = dxdy3 * grads.diz_dx + grads.diz_dy;
            state.duiz_dya = dxdy3 * grads.duiz_dx + grads.duiz_dy;
            state.dviz_dya = dxdy3 * grads.dviz_dx + grads.dviz_dy;

            let dy = 1. - (c2.y - y2i as f32);
            state.xa = c2.x + dy * state.dxdy_a;
            state.iza = c2.iz + dy * state.diz_dya;
            state.uiza = c2.uiz + dy * state.duiz_dya;
            state.viza = c2.viz + dy * state.dviz_dya;

            raster_segment(frame, depth, frustum, texture, &grads, &mut state, y2i, y3i);
        }
    }
}

fn raster_segment<P: Pixel>(
    frame: &mut Bitmap<P>,
    depth: &mut DepthBuffer,
    frustum: &Frustum,
    texture: &Bitmap<P>,
    grads: &Gradients,
    state: &mut EdgeState,
    mut y: i32,
    y_end: i32,
) {
    let width = frame.width() as i32;
    let height = frame.height() as i32;
    let tex_w = texture.width() as i32;
    let tex_h = texture.height() as i32;

    while y < y_end {
        let xa = state.xa as i32;
        let xb = state.xb as i32;

        // Pre-step to the first pixel center right of the left edge.
        let dx = 1. - (state.xa - xa as f32);
        let mut iz = state.iza + dx * grads.diz_dx;
        let mut uiz = state.uiza + dx * grads.duiz_dx;
        let mut viz = state.viza + dx * grads.dviz_dx;

        let yclip = y >= 0 && y < height;
        let mut zid = y * width + xa;

        for x in (xa + 1)..=xb {
            // Perspective-correct recovery of depth and UV.
            let z = 1. / iz;
            let u = uiz * z;
            let v = viz * z;

            zid += 1;

            if yclip
                && x >= 0
                && x < width
                && z > frustum.near
                && z < frustum.far
                && z < depth.data[zid as usize]
            {
                depth.data[zid as usize] = z;
                // Nearest neighbour, clamped onto the texture rect.
                let tu = (u as i32).clamp(0, tex_w - 1) as usize;
                let tv = (v as i32).clamp(0, tex_h - 1) as usize;
                frame.row_mut(y as usize)[x as usize] = texture.row(tv)[tu];
            }

            iz += grads.diz_dx;
            uiz += grads.duiz_dx;
            viz += grads.dviz_dx;
        }

        // Step both edges down a scanline.
        state.xa += state.dxdy_a;
        state.xb += state.dxdy_b;
        state.iza += state.diz_dya;
        state.uiza += state.duiz_dya;
        state.viza += state.dviz_dya;

        y += 1;
    }
}
