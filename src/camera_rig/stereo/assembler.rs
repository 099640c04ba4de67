//! Reprojection-matrix construction and cloud post-processing.

use nalgebra::{Matrix4, Point3};

use crate::camera_rig::pointset::PointSet;

use super::types::ColoredPoint;

/// Points closer than this along the depth axis are sensor noise.
const MIN_RANGE: f32 = 0.001;

/// Parameter key under which the calibration service stores a stereo head's
/// baseline, derived from the channel name.
pub fn baseline_param_key(channel: &str) -> String {
    format!("coordinate_frames.{channel}_RIGHT.initial_transform.translation")
}

/// Builds the 4x4 disparity-to-depth reprojection matrix.
///
/// Maps homogeneous `(u, v, disparity, 1)` to camera-frame coordinates for
/// the external unpacking routine.
pub fn disparity_reprojection_matrix(
    baseline: f64,
    principal_x: f64,
    principal_y: f64,
    focal_x: f64,
) -> Matrix4<f64> {
    let mut q = Matrix4::identity();
    q[(0, 3)] = -principal_x;
    q[(1, 3)] = -principal_y;
    q[(2, 2)] = 0.0;
    q[(2, 3)] = focal_x;
    q[(3, 2)] = 1.0 / baseline;
    q[(3, 3)] = 0.0;
    q
}

/// Keeps points whose depth axis lies inside `(MIN_RANGE, threshold]`.
pub fn range_filter(cloud: Vec<ColoredPoint>, threshold: f32) -> Vec<ColoredPoint> {
    cloud
        .into_iter()
        .filter(|p| p.position.z > MIN_RANGE && p.position.z <= threshold)
        .collect()
}

/// Converts a reconstructed cloud into a point set with a parallel color
/// array and vertex cells, dropping any non-finite stragglers.
pub fn cloud_to_point_set(cloud: &[ColoredPoint]) -> PointSet {
    let mut set = PointSet::new();
    let mut colors = Vec::with_capacity(cloud.len());

    for point in cloud {
        let p = &point.position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            continue;
        }
        set.points
            .push(Point3::new(f64::from(p.x), f64::from(p.y), f64::from(p.z)));
        colors.push(point.color);
    }

    set.rgb = Some(colors);
    set.rebuild_vertex_cells();
    set
}
