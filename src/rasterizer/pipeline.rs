//! Transform and cull: model-world-view transformation, view-space face
//! normals, backface rejection, projection to screen coordinates.

use super::frustum::Frustum;
use crate::{bitmap::Pixel, maths::AffineMatrix, scene::PolygonBuffer};

pub(super) fn transform_and_cull<P: Pixel>(
    worldview: &AffineMatrix,
    frustum: &Frustum,
    obj: &mut PolygonBuffer<P>,
    model: Option<&AffineMatrix>,
) {
    for poly in obj.polys.iter_mut() {
        ////////////////////////////////
        // Model-world-view transformation
        match model {
            // Without a model matrix the model coordinates already are
            // world coordinates; `world` is left stale.
            None => {
                for v in poly.verts.iter_mut() {
                    v.view = worldview * v.model;
                }
            }
            Some(m) => {
                for v in poly.verts.iter_mut() {
                    v.world = m * v.model;
                    v.view = worldview * v.world;
                }
            }
        }

        ////////////////////////////////
        // Face normal (view space)
        let edge1 = poly.verts[1].view - poly.verts[0].view;
        let edge2 = poly.verts[2].view - poly.verts[0].view;
        poly.normal = edge1.cross(edge2).normalize();

        ////////////////////////////////
        // Backface culling
        // The eye sits at the view-space origin, so the normalized first
        // vertex is the direction we see the face under. A negative cosine
        // against the face normal marks the face as turned away.
        let sight = poly.verts[0].view.normalize();
        poly.backfacing = sight.dot(poly.normal) < 0.;
        if poly.backfacing {
            continue;
        }

        ////////////////////////////////
        // View-screen transformation
        // Scaling by projection-plane distance over depth, then
        // translating to the viewport center. Z keeps its view-space
        // value for the depth test; near/far are enforced per pixel.
        for v in poly.verts.iter_mut() {
            let r = frustum.projection / v.view.z;
            v.screen.x = v.view.x * r + frustum.center.x;
            v.screen.y = v.view.y * r + frustum.center.y;
            v.screen.z = v.view.z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::transform_and_cull;
    use crate::{
        bitmap::Bitmap,
        maths::{AffineMatrix, Vec2f, Vec3f},
        rasterizer::Frustum,
        scene::{Camera, Polygon, PolygonBuffer, Vertex},
    };

    fn scene(verts: [Vec3f; 3]) -> PolygonBuffer<u32> {
        let mut buf = PolygonBuffer::new();
        let tex = buf.add_texture(Bitmap::filled(1, 1, 0xffff_ffff));
        buf.polys.push(Polygon::new(
            verts.map(|v| Vertex::new(v, Vec2f::new(0., 0.))),
            tex,
        ));
        buf
    }

    fn run(buf: &mut PolygonBuffer<u32>, model: Option<&AffineMatrix>) {
        let worldview = Camera::default().view_matrix();
        let frustum = Frustum::new(Vec2f::new(320., 240.), 1., 100., 90.);
        transform_and_cull(&worldview, &frustum, buf, model);
    }

    #[test]
    fn projects_to_the_viewport_center() {
        // A point on the view axis projects to the center; Z survives.
        let mut buf = scene([
            Vec3f::new(0., 0., 0.),
            Vec3f::new(1., -1., 0.),
            Vec3f::new(1., 1., 0.),
        ]);
        run(&mut buf, None);
        let v = buf.polys[0].verts[0];
        assert_eq!(v.view, Vec3f::new(0., 0., 5.));
        assert!((v.screen.x - 160.).abs() < 1e-4);
        assert!((v.screen.y - 120.).abs() < 1e-4);
        assert_eq!(v.screen.z, 5.);
    }

    #[test]
    fn winding_decides_the_backface_flag() {
        let a = Vec3f::new(-1., -1., 0.);
        let b = Vec3f::new(1., -1., 0.);
        let c = Vec3f::new(0., 1., 0.);

        let mut front = scene([a, b, c]);
        run(&mut front, None);
        assert!(!front.polys[0].backfacing);

        let mut back = scene([a, c, b]);
        run(&mut back, None);
        assert!(back.polys[0].backfacing);
    }

    #[test]
    fn model_matrix_feeds_the_world_stage() {
        let mut buf = scene([
            Vec3f::new(0., 0., 0.),
            Vec3f::new(1., 0., 0.),
            Vec3f::new(0., 1., 0.),
        ]);
        let model = AffineMatrix::translation(Vec3f::new(0., 0., 3.));
        run(&mut buf, Some(&model));
        assert_eq!(buf.polys[0].verts[0].world, Vec3f::new(0., 0., 3.));
        assert_eq!(buf.polys[0].verts[0].view.z, 8.);
    }
}
