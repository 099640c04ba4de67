//! Pinhole camera model with Brown-Conrady distortion.
//!
//! Maps 3D camera-frame points to pixel coordinates and back. Forward
//! projection reports failure for points at or behind the camera plane;
//! unprojection inverts the distortion with a fixed-point iteration.

use nalgebra::{Matrix3, Vector3};

/// Undistortion fixed-point iterations; converges well within this for the
/// distortion magnitudes seen on real rigs.
const UNDISTORT_ITERATIONS: usize = 8;

/// Brown-Conrady radial (k1..k3) and tangential (p1, p2) coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistortionCoeffs {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub p1: f64,
    pub p2: f64,
}

/// A successful forward projection: pixel coordinates plus camera-frame depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelProjection {
    pub px: f64,
    pub py: f64,
    pub depth: f64,
}

/// Intrinsic camera parameters.
///
/// Owned by a camera record, obtained once at registration, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub skew: f64,
    pub cx: f64,
    pub cy: f64,
    pub width: u32,
    pub height: u32,
    pub distortion: DistortionCoeffs,
}

impl CameraIntrinsics {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64, width: u32, height: u32) -> Self {
        Self {
            fx,
            fy,
            skew: 0.0,
            cx,
            cy,
            width,
            height,
            distortion: DistortionCoeffs::default(),
        }
    }

    pub fn with_skew(mut self, skew: f64) -> Self {
        self.skew = skew;
        self
    }

    pub fn with_distortion(mut self, distortion: DistortionCoeffs) -> Self {
        self.distortion = distortion;
        self
    }

    /// The 3x3 calibration matrix K.
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, self.skew, self.cx,
            0.0, self.fy, self.cy,
            0.0, 0.0, 1.0,
        )
    }

    /// Projects a camera-frame point to pixel coordinates.
    ///
    /// Returns `None` when the point is at or behind the camera plane, the
    /// model's invalid domain.
    pub fn project(&self, point: &Vector3<f64>) -> Option<PixelProjection> {
        if point.z <= 0.0 {
            return None;
        }

        let xn = point.x / point.z;
        let yn = point.y / point.z;
        let (xd, yd) = self.distort(xn, yn);

        Some(PixelProjection {
            px: self.fx * xd + self.skew * yd + self.cx,
            py: self.fy * yd + self.cy,
            depth: point.z,
        })
    }

    /// Maps a pixel to a unit ray in the camera frame.
    pub fn unproject(&self, px: f64, py: f64) -> Vector3<f64> {
        let yd = (py - self.cy) / self.fy;
        let xd = (px - self.cx - self.skew * yd) / self.fx;
        let (xn, yn) = self.undistort(xd, yd);
        Vector3::new(xn, yn, 1.0).normalize()
    }

    /// Applies the distortion model to normalized image coordinates.
    fn distort(&self, x: f64, y: f64) -> (f64, f64) {
        let d = &self.distortion;
        let r2 = x * x + y * y;
        let radial = 1.0 + d.k1 * r2 + d.k2 * r2 * r2 + d.k3 * r2 * r2 * r2;
        let xd = x * radial + 2.0 * d.p1 * x * y + d.p2 * (r2 + 2.0 * x * x);
        let yd = y * radial + d.p1 * (r2 + 2.0 * y * y) + 2.0 * d.p2 * x * y;
        (xd, yd)
    }

    /// Inverts [`Self::distort`] by fixed-point iteration.
    fn undistort(&self, xd: f64, yd: f64) -> (f64, f64) {
        let (mut x, mut y) = (xd, yd);
        for _ in 0..UNDISTORT_ITERATIONS {
            let (fx, fy) = self.distort(x, y);
            x += xd - fx;
            y += yd - fy;
        }
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plain_camera() -> CameraIntrinsics {
        CameraIntrinsics::new(500.0, 500.0, 320.0, 240.0, 640, 480)
    }

    #[test]
    fn projects_optical_axis_to_principal_point() {
        let cam = plain_camera();
        let pix = cam.project(&Vector3::new(0.0, 0.0, 2.0)).unwrap();
        assert_relative_eq!(pix.px, 320.0);
        assert_relative_eq!(pix.py, 240.0);
        assert_relative_eq!(pix.depth, 2.0);
    }

    #[test]
    fn rejects_points_behind_camera() {
        let cam = plain_camera();
        assert!(cam.project(&Vector3::new(0.1, 0.1, -1.0)).is_none());
        assert!(cam.project(&Vector3::new(0.1, 0.1, 0.0)).is_none());
    }

    #[test]
    fn unproject_is_inverse_of_project() {
        let cam = plain_camera().with_distortion(DistortionCoeffs {
            k1: -0.12,
            k2: 0.03,
            p1: 0.001,
            p2: -0.0015,
            ..Default::default()
        });

        let point = Vector3::new(0.4, -0.25, 1.7);
        let pix = cam.project(&point).unwrap();
        let ray = cam.unproject(pix.px, pix.py);

        // The ray and the original point must be collinear.
        let scaled = ray * (point.z / ray.z);
        assert_relative_eq!(scaled.x, point.x, epsilon = 1e-9);
        assert_relative_eq!(scaled.y, point.y, epsilon = 1e-9);
    }

    #[test]
    fn unprojected_rays_are_unit_length() {
        let cam = plain_camera();
        let ray = cam.unproject(0.0, 0.0);
        assert_relative_eq!(ray.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn skew_shifts_horizontal_coordinate() {
        let cam = plain_camera().with_skew(2.0);
        let pix = cam.project(&Vector3::new(0.0, 0.5, 1.0)).unwrap();
        assert_relative_eq!(pix.px, 320.0 + 2.0 * 0.5);
    }

    #[test]
    fn calibration_matrix_layout() {
        let k = plain_camera().with_skew(1.5).matrix();
        assert_relative_eq!(k[(0, 0)], 500.0);
        assert_relative_eq!(k[(0, 1)], 1.5);
        assert_relative_eq!(k[(0, 2)], 320.0);
        assert_relative_eq!(k[(1, 2)], 240.0);
        assert_relative_eq!(k[(2, 2)], 1.0);
    }
}
