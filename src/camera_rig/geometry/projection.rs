//! Projection and unprojection queries on a camera record.

use nalgebra::{Point3, Vector3};

use crate::camera_rig::calibration::PixelProjection;
use crate::camera_rig::store::CameraRecord;

/// How the frustum height is obtained when unprojecting image corners.
///
/// The deployed rigs have always computed the corner rays with the image
/// width standing in for the height, and downstream tooling is calibrated to
/// that square frustum. `Corrected` uses the true height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrustumMode {
    #[default]
    LegacySquare,
    Corrected,
}

/// Projects a reference-frame point through a camera record: extrinsics, then
/// the intrinsic model. Empty calibration yields `None`.
pub fn project_point(record: &CameraRecord, point: &Point3<f64>) -> Option<PixelProjection> {
    let intrinsics = record.intrinsics()?;
    let camera_point = record.local_to_camera() * point;
    intrinsics.project(&camera_point.coords)
}

/// Maps a pixel to a unit ray in the camera frame; empty when the camera has
/// no usable calibration.
pub fn unproject_pixel(record: &CameraRecord, px: f64, py: f64) -> Vec<f64> {
    match record.intrinsics() {
        Some(intrinsics) => {
            let ray = intrinsics.unproject(px, py);
            vec![ray.x, ray.y, ray.z]
        }
        None => Vec::new(),
    }
}

/// Unprojects the four image corners into camera-frame rays, flattened as 12
/// values in corner order (0,0), (w,0), (w,h), (0,h).
pub fn frustum_corner_rays(record: &CameraRecord, mode: FrustumMode) -> Vec<f64> {
    let Some(intrinsics) = record.intrinsics() else {
        return Vec::new();
    };

    let width = f64::from(intrinsics.width);
    let height = match mode {
        FrustumMode::LegacySquare => width,
        FrustumMode::Corrected => f64::from(intrinsics.height),
    };

    let corners = [
        (0.0, 0.0),
        (width, 0.0),
        (width, height),
        (0.0, height),
    ];

    let mut rays = Vec::with_capacity(12);
    for (px, py) in corners {
        let ray: Vector3<f64> = intrinsics.unproject(px, py);
        rays.extend_from_slice(&[ray.x, ray.y, ray.z]);
    }
    rays
}
