//! Point-set colorization, texture-coordinate assignment, and in-place
//! projection.

use nalgebra::Point3;
use tracing::{debug, error, warn};

use crate::camera_rig::common::error::{Result, RigError};
use crate::camera_rig::decode::PixelLayout;
use crate::camera_rig::pointset::PointSet;
use crate::camera_rig::store::CameraRecord;

/// Normalized squared radius of the centered sampling disk for cameras
/// registered with edge exclusion; samples outside it are dominated by radial
/// distortion on those lenses.
const EDGE_EXCLUSION_RADIUS_SQ: f64 = 0.2;

fn outside_center_disk(px: f64, py: f64, width: usize, height: usize) -> bool {
    let u = px / (width - 1) as f64;
    let v = py / (height - 1) as f64;
    (0.5 - u) * (0.5 - u) + (0.5 - v) * (0.5 - v) > EDGE_EXCLUSION_RADIUS_SQ
}

/// Samples the camera's current image into the point set's color array.
///
/// Points that fail projection, land outside the image, or (for
/// edge-excluded cameras) fall outside the central sampling disk keep their
/// previous color; fresh arrays start white. Requires the decoded buffer to
/// be in 8-bit RGB form.
pub fn colorize_points(record: &CameraRecord, set: &mut PointSet) -> Result<()> {
    if !record.has_calibration() {
        warn!(camera = %record.name(), "cannot colorize points without calibration");
        return Ok(());
    }
    let Some(intrinsics) = record.intrinsics() else {
        return Ok(());
    };

    let mut state = record.locked_state();
    record.ensure_decoded(&mut state)?;
    let Some(image) = state.decoded.as_ref() else {
        return Ok(());
    };
    if image.is_empty() {
        debug!(camera = %record.name(), "no image to colorize from");
        return Ok(());
    }
    if image.layout != PixelLayout::Rgb8 {
        error!(
            camera = %record.name(),
            layout = ?image.layout,
            "colorization requires an 8-bit RGB decode"
        );
        return Err(RigError::LayoutMismatch(record.name().to_string()));
    }

    let width = image.width as usize;
    let height = image.height as usize;
    let local_to_camera = state.local_to_camera;
    let apply_edge_exclusion = record.edge_exclusion();

    set.ensure_rgb();
    let PointSet { points, rgb, .. } = set;
    let Some(rgb) = rgb.as_mut() else {
        return Ok(());
    };

    for (i, point) in points.iter().enumerate() {
        let camera_point = local_to_camera * *point;
        let Some(pix) = intrinsics.project(&camera_point.coords) else {
            continue;
        };

        let col = pix.px as i64;
        let row = pix.py as i64;
        if col < 0 || col >= width as i64 || row < 0 || row >= height as i64 {
            continue;
        }

        if apply_edge_exclusion && outside_center_disk(pix.px, pix.py, width, height) {
            continue;
        }

        let offset = (row as usize * width + col as usize) * 3;
        rgb[i] = [
            image.data[offset],
            image.data[offset + 1],
            image.data[offset + 2],
        ];
    }

    Ok(())
}

/// Writes normalized image coordinates for each visible point into the
/// camera's texture-coordinate array.
///
/// Unlike colorization this never samples the pixel buffer, so no decode is
/// triggered, and the edge-exclusion disk is not applied.
pub fn compute_texture_coords(record: &CameraRecord, set: &mut PointSet) -> Result<()> {
    if !record.has_calibration() {
        warn!(camera = %record.name(), "cannot compute texture coords without calibration");
        return Ok(());
    }
    let Some(intrinsics) = record.intrinsics() else {
        return Ok(());
    };

    let state = record.locked_state();
    let width = state.message.width as usize;
    let height = state.message.height as usize;
    if width < 2 || height < 2 {
        debug!(camera = %record.name(), "no image received yet");
        return Ok(());
    }
    let local_to_camera = state.local_to_camera;

    let name = PointSet::tcoords_name(record.name());
    set.ensure_tcoords(record.name());
    let PointSet { points, tcoords, .. } = set;
    let Some(tcoords) = tcoords.get_mut(&name) else {
        return Ok(());
    };

    for (i, point) in points.iter().enumerate() {
        let camera_point = local_to_camera * *point;
        let Some(pix) = intrinsics.project(&camera_point.coords) else {
            continue;
        };

        let col = pix.px as i64;
        let row = pix.py as i64;
        if col < 0 || col >= width as i64 || row < 0 || row >= height as i64 {
            continue;
        }

        tcoords[i] = [
            (pix.px / (width - 1) as f64) as f32,
            (pix.py / (height - 1) as f64) as f32,
        ];
    }

    Ok(())
}

/// Replaces each point with its `(px, py, depth)` projection.
///
/// Points are taken as already expressed in the camera frame; entries whose
/// projection fails are left untouched.
pub fn project_points_in_place(record: &CameraRecord, set: &mut PointSet) -> Result<()> {
    if !record.has_calibration() {
        error!(camera = %record.name(), "cannot project points without calibration");
        return Err(RigError::MissingCalibration(record.name().to_string()));
    }
    let Some(intrinsics) = record.intrinsics() else {
        return Err(RigError::MissingCalibration(record.name().to_string()));
    };

    for point in &mut set.points {
        if let Some(pix) = intrinsics.project(&point.coords) {
            *point = Point3::new(pix.px, pix.py, pix.depth);
        }
    }

    Ok(())
}
