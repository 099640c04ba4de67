//! Per-point geometry module
//!
//! Projection queries against a camera record and the point-set mutation
//! operations: colorization, texture-coordinate assignment, and in-place
//! projection.

mod paint;
mod projection;

pub use paint::{colorize_points, compute_texture_coords, project_points_in_place};
pub use projection::{FrustumMode, frustum_corner_rays, project_point, unproject_pixel};
