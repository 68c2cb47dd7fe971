use crate::maths::{PI, Vec2f};

/// Viewing volume: near and far planes plus the derived projection-plane
/// distance and the viewport center that projection translates to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Half the viewport, `(w/2, h/2)`.
    pub center: Vec2f,
    pub near: f32,
    pub far: f32,
    /// Distance to the projection plane in pixels, `center.x / tan(fov/2)`.
    pub projection: f32,
    /// Retained full horizontal field of view, in degrees.
    pub fov: f32,
}

impl Frustum {
    /// `fov` is the full horizontal angle in degrees; its half in radians
    /// drives the projection-plane distance.
    pub fn new(viewport: Vec2f, near: f32, far: f32, fov: f32) -> Self {
        let center = viewport * 0.5;
        Frustum {
            center,
            near,
            far,
            projection: center.x / (fov * PI / 360.).tan(),
            fov,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frustum;
    use crate::maths::Vec2f;

    #[test]
    fn ninety_degrees_puts_the_plane_at_half_width() {
        let f = Frustum::new(Vec2f::new(320., 240.), 1., 100., 90.);
        assert_eq!(f.center, Vec2f::new(160., 120.));
        assert!((f.projection - 160.).abs() < 1e-3);
        assert_eq!(f.fov, 90.);
    }

    #[test]
    fn narrower_fov_pushes_the_plane_out() {
        let wide = Frustum::new(Vec2f::new(640., 480.), 1., 100., 90.);
        let narrow = Frustum::new(Vec2f::new(640., 480.), 1., 100., 45.);
        assert!(narrow.projection > wide.projection);
    }
}
