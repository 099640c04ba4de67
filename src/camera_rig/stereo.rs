//! Stereo reconstruction assembly module
//!
//! Builds the disparity-to-depth reprojection matrix from baseline and
//! intrinsics, delegates cloud construction to the external unpacking
//! routine, and post-filters the result.

mod assembler;
mod types;

pub use assembler::{baseline_param_key, cloud_to_point_set, disparity_reprojection_matrix, range_filter};
pub use types::{ColoredPoint, StereoReconstructor};
