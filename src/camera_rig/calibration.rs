//! Camera calibration module
//!
//! Provides the camera intrinsics model (pinhole + Brown-Conrady distortion)
//! and the trait seam to the external calibration/parameter service.

mod intrinsics;
mod provider;

pub use intrinsics::{CameraIntrinsics, DistortionCoeffs, PixelProjection};
pub use provider::{CalibrationProvider, StaticCalibrationProvider};
