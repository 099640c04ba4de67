//! Point set with named per-point auxiliary arrays.

use std::collections::HashMap;

use nalgebra::Point3;

/// Fill value for freshly created color arrays.
pub const DEFAULT_COLOR: [u8; 3] = [255, 255, 255];

/// Fill value for freshly created texture-coordinate arrays.
pub const DEFAULT_TCOORD: [f32; 2] = [-1.0, -1.0];

/// A 3D point set with optional per-point color, per-camera texture
/// coordinates, and a vertex-cell index list.
///
/// Auxiliary arrays are created on first use with defined fill defaults and
/// persist across repeated calls so that successive operations overwrite them
/// incrementally. The caller owns the set; operations on it assume exclusive
/// access for their duration.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    pub points: Vec<Point3<f64>>,
    /// Per-point RGB colors; `None` until an operation first needs them.
    pub rgb: Option<Vec<[u8; 3]>>,
    /// Per-camera texture coordinates, keyed by [`Self::tcoords_name`].
    pub tcoords: HashMap<String, Vec<[f32; 2]>>,
    /// Flattened vertex cells as `[1, index]` pairs, present on point sets
    /// produced by stereo reconstruction.
    pub vertex_cells: Option<Vec<i64>>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Name of the texture-coordinate array contributed by a camera; scoping
    /// the name per camera lets several cameras texture one point set.
    pub fn tcoords_name(camera: &str) -> String {
        format!("tcoords_{camera}")
    }

    /// Returns the color array, creating it white-filled on first use. The
    /// array is resized to the current point count, filling new tail entries
    /// with the default.
    pub fn ensure_rgb(&mut self) -> &mut Vec<[u8; 3]> {
        let n = self.points.len();
        let rgb = self.rgb.get_or_insert_with(|| vec![DEFAULT_COLOR; n]);
        rgb.resize(n, DEFAULT_COLOR);
        rgb
    }

    /// Returns the camera's texture-coordinate array, creating it
    /// `(-1,-1)`-filled on first use.
    pub fn ensure_tcoords(&mut self, camera: &str) -> &mut Vec<[f32; 2]> {
        let n = self.points.len();
        let tcoords = self
            .tcoords
            .entry(Self::tcoords_name(camera))
            .or_insert_with(|| vec![DEFAULT_TCOORD; n]);
        tcoords.resize(n, DEFAULT_TCOORD);
        tcoords
    }

    /// Builds the `[1, index]` vertex-cell list for the current points.
    pub fn rebuild_vertex_cells(&mut self) {
        let mut cells = Vec::with_capacity(self.points.len() * 2);
        for i in 0..self.points.len() {
            cells.push(1);
            cells.push(i as i64);
        }
        self.vertex_cells = Some(cells);
    }
}
