//! Trait seam to the external calibration/parameter service.

use std::collections::{HashMap, HashSet};

use crate::camera_rig::common::error::{Result, RigError};

use super::intrinsics::CameraIntrinsics;

/// External calibration service contract.
///
/// Queried exactly once per camera at registration; retry policy, if any,
/// lives behind this trait. Implementations must not panic.
pub trait CalibrationProvider {
    /// Intrinsic parameters for a camera, or failure when unknown.
    fn intrinsics(&self, camera: &str) -> Result<CameraIntrinsics>;

    /// Logical coordinate-frame name used to resolve this camera's extrinsics.
    fn coord_frame(&self, camera: &str) -> Result<String>;

    /// Scalar configuration parameter by fully qualified key (stereo baseline
    /// lookups use this).
    fn scalar_param(&self, key: &str) -> Result<f64>;

    /// Whether colorization should skip samples near the image edge for this
    /// camera (wide-angle units with heavy radial distortion).
    fn edge_exclusion(&self, _camera: &str) -> bool {
        false
    }
}

/// In-memory calibration source for fixed rigs, demos, and tests.
#[derive(Debug, Default)]
pub struct StaticCalibrationProvider {
    intrinsics: HashMap<String, CameraIntrinsics>,
    coord_frames: HashMap<String, String>,
    scalars: HashMap<String, f64>,
    edge_excluded: HashSet<String>,
}

impl StaticCalibrationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a camera's intrinsics and coordinate frame.
    pub fn add_camera(
        &mut self,
        camera: impl Into<String>,
        intrinsics: CameraIntrinsics,
        coord_frame: impl Into<String>,
    ) {
        let camera = camera.into();
        self.coord_frames.insert(camera.clone(), coord_frame.into());
        self.intrinsics.insert(camera, intrinsics);
    }

    pub fn set_scalar(&mut self, key: impl Into<String>, value: f64) {
        self.scalars.insert(key.into(), value);
    }

    pub fn set_edge_exclusion(&mut self, camera: impl Into<String>) {
        self.edge_excluded.insert(camera.into());
    }
}

impl CalibrationProvider for StaticCalibrationProvider {
    fn intrinsics(&self, camera: &str) -> Result<CameraIntrinsics> {
        self.intrinsics
            .get(camera)
            .cloned()
            .ok_or_else(|| RigError::MissingCalibration(camera.to_string()))
    }

    fn coord_frame(&self, camera: &str) -> Result<String> {
        self.coord_frames
            .get(camera)
            .cloned()
            .ok_or_else(|| {
                RigError::CalibrationLookup(camera.to_string(), "no coord_frame entry".to_string())
            })
    }

    fn scalar_param(&self, key: &str) -> Result<f64> {
        self.scalars
            .get(key)
            .copied()
            .ok_or_else(|| RigError::MissingParameter(key.to_string()))
    }

    fn edge_exclusion(&self, camera: &str) -> bool {
        self.edge_excluded.contains(camera)
    }
}
