//! Stereo reconstruction types and the external-routine seam.

use nalgebra::{Matrix4, Point3};

use crate::camera_rig::common::error::Result;
use crate::camera_rig::wire::ImageBundle;

/// One reconstructed point with its sampled color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredPoint {
    pub position: Point3<f32>,
    pub color: [u8; 3],
}

/// External disparity-unpacking routine contract.
///
/// Consumes a left/right/disparity bundle and the reprojection matrix,
/// subsamples by `decimation`, drops speckle regions smaller than
/// `remove_size`, and returns the colored cloud with invalid points already
/// removed.
pub trait StereoReconstructor {
    fn unpack(
        &self,
        bundle: &ImageBundle,
        reprojection: &Matrix4<f64>,
        decimation: u32,
        remove_size: u32,
    ) -> Result<Vec<ColoredPoint>>;
}
