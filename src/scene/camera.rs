use crate::maths::{AffineMatrix, Vec3f};

/// Pinhole camera.
///
/// `dir` is the unit forward vector and `up` the unit upward reference; the
/// pair is expected to be orthonormal. [`Camera::view_matrix`] builds the
/// world-to-view transform straight from them and does not re-orthonormalize,
/// so skewed inputs produce skewed output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3f,
    pub dir: Vec3f,
    pub up: Vec3f,
}

impl Camera {
    pub const fn new(eye: Vec3f, dir: Vec3f, up: Vec3f) -> Self {
        Camera { eye, dir, up }
    }

    /// World-to-view transform: the eye lands at the origin and `dir`
    /// becomes the view-space Z axis.
    pub fn view_matrix(&self) -> AffineMatrix {
        let n = self.dir;
        let u = self.dir.cross(self.up);
        let v = n.cross(u);
        AffineMatrix::new([
            [u.x, u.y, u.z, -u.dot(self.eye)],
            [v.x, v.y, v.z, -v.dot(self.eye)],
            [n.x, n.y, n.z, -n.dot(self.eye)],
        ])
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(
            Vec3f::new(0., 0., -5.),
            Vec3f::new(0., 0., 1.),
            Vec3f::new(0., 1., 0.),
        )
    }
}
