//! Camera registry, channel routing, and the store façade.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use nalgebra::Matrix4;
use tracing::{debug, info, warn};

use crate::camera_rig::calibration::CalibrationProvider;
use crate::camera_rig::common::error::{Result, RigError};
use crate::camera_rig::decode::DecodedImage;
use crate::camera_rig::frames::FrameGraph;
use crate::camera_rig::geometry::{
    self, FrustumMode, colorize_points, compute_texture_coords, project_points_in_place,
};
use crate::camera_rig::pointset::PointSet;
use crate::camera_rig::stereo::{
    StereoReconstructor, baseline_param_key, cloud_to_point_set, disparity_reprojection_matrix,
    range_filter,
};
use crate::camera_rig::wire::{ImageBundle, ImageSlot, RawImageMessage};

use super::record::CameraRecord;

/// Store-wide behavior knobs.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Reference frame that extrinsics are resolved from.
    pub reference_frame: String,
    /// Frustum-corner computation mode.
    pub frustum_mode: FrustumMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            reference_frame: "local".to_string(),
            frustum_mode: FrustumMode::default(),
        }
    }
}

impl StoreConfig {
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Builder for [`StoreConfig`].
#[derive(Default)]
pub struct StoreConfigBuilder {
    reference_frame: Option<String>,
    frustum_mode: Option<FrustumMode>,
}

impl StoreConfigBuilder {
    pub fn reference_frame(mut self, frame: impl Into<String>) -> Self {
        self.reference_frame = Some(frame.into());
        self
    }

    pub fn frustum_mode(mut self, mode: FrustumMode) -> Self {
        self.frustum_mode = Some(mode);
        self
    }

    pub fn build(self) -> StoreConfig {
        let default = StoreConfig::default();
        StoreConfig {
            reference_frame: self.reference_frame.unwrap_or(default.reference_frame),
            frustum_mode: self.frustum_mode.unwrap_or(default.frustum_mode),
        }
    }
}

/// Per-channel routing to camera names, built during registration.
#[derive(Debug, Default)]
struct ChannelRoute {
    /// Camera fed by single-image messages on this channel.
    single: Option<String>,
    /// Cameras fed by bundle slots on this channel.
    slots: BTreeMap<ImageSlot, String>,
}

/// The camera state store.
///
/// Registration (`&mut self`) and steady-state operation (`&self`) are
/// separate phases; once subscriptions are live the registry maps are never
/// mutated, and all per-camera state sits behind each record's own lock.
pub struct CameraImageStore<C: CalibrationProvider, F: FrameGraph> {
    calibration: C,
    frames: F,
    config: StoreConfig,
    cameras: HashMap<String, Arc<CameraRecord>>,
    routes: HashMap<String, ChannelRoute>,
    /// Latest raw bundle per multi-image channel, kept for the stereo
    /// assembler.
    bundles: Mutex<HashMap<String, ImageBundle>>,
}

impl<C: CalibrationProvider, F: FrameGraph> CameraImageStore<C, F> {
    pub fn new(calibration: C, frames: F) -> Self {
        Self::with_config(calibration, frames, StoreConfig::default())
    }

    pub fn with_config(calibration: C, frames: F, config: StoreConfig) -> Self {
        Self {
            calibration,
            frames,
            config,
            cameras: HashMap::new(),
            routes: HashMap::new(),
            bundles: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Registers a camera fed by single-image messages where the channel name
    /// doubles as the camera name.
    pub fn add_camera_stream_single(&mut self, channel: &str) -> bool {
        self.add_camera_stream(channel, channel, None)
    }

    /// Registers a camera under a channel/name/slot triple.
    ///
    /// Calibration is queried once here; on partial failure the camera is
    /// still registered with `has_calibration = false` and geometry
    /// operations degrade to diagnosed no-ops. Re-registering an existing
    /// name is a no-op that succeeds without re-querying calibration.
    /// Returns whether a new record was created.
    pub fn add_camera_stream(
        &mut self,
        channel: &str,
        camera: &str,
        slot: Option<ImageSlot>,
    ) -> bool {
        let created = if self.cameras.contains_key(camera) {
            false
        } else {
            let record = self.register_camera(camera, slot);
            self.cameras.insert(camera.to_string(), Arc::new(record));
            true
        };

        let route = self.routes.entry(channel.to_string()).or_default();
        match slot {
            Some(slot) => {
                route.slots.insert(slot, camera.to_string());
            }
            None => {
                route.single = Some(camera.to_string());
            }
        }

        created
    }

    fn register_camera(&self, camera: &str, slot: Option<ImageSlot>) -> CameraRecord {
        let mut has_calibration = true;

        let intrinsics = match self.calibration.intrinsics(camera) {
            Ok(intrinsics) => Some(intrinsics),
            Err(e) => {
                warn!(camera, "failed to get intrinsics: {e}");
                has_calibration = false;
                None
            }
        };

        let coord_frame = match self.calibration.coord_frame(camera) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(camera, "failed to get coord_frame: {e}");
                has_calibration = false;
                String::new()
            }
        };

        let zlib_framed = slot.is_some_and(ImageSlot::is_zlib_framed);
        let edge_exclusion = self.calibration.edge_exclusion(camera);

        info!(
            camera,
            has_calibration, zlib_framed, edge_exclusion, "registered camera"
        );

        CameraRecord::new(
            camera,
            has_calibration,
            intrinsics,
            coord_frame,
            zlib_framed,
            edge_exclusion,
        )
    }

    pub fn camera(&self, camera: &str) -> Option<&Arc<CameraRecord>> {
        self.cameras.get(camera)
    }

    pub fn camera_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cameras.keys().cloned().collect();
        names.sort();
        names
    }

    /// Single-image ingress: the subscription layer delivers one raw message
    /// per channel callback.
    pub fn on_image_message(&self, channel: &str, message: RawImageMessage) {
        let Some(camera) = self
            .routes
            .get(channel)
            .and_then(|route| route.single.as_ref())
        else {
            warn!(channel, "image message on unrouted channel");
            return;
        };
        let Some(record) = self.cameras.get(camera) else {
            return;
        };

        record.apply_message(message, &self.frames, &self.config.reference_frame, true);
    }

    /// Multi-image ingress: routes each registered slot to its camera and
    /// retains the bundle for stereo reconstruction.
    pub fn on_images_message(&self, channel: &str, bundle: ImageBundle) {
        let Some(route) = self.routes.get(channel) else {
            warn!(channel, "image bundle on unrouted channel");
            return;
        };

        for (slot, camera) in &route.slots {
            let Some(message) = bundle.image_for(*slot) else {
                debug!(channel, slot = slot.tag(), "bundle is missing a routed slot");
                continue;
            };
            let Some(record) = self.cameras.get(camera) else {
                continue;
            };
            record.apply_message(
                message.clone(),
                &self.frames,
                &self.config.reference_frame,
                false,
            );
        }

        self.bundles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.to_string(), bundle);
    }

    /// Decoded image and timestamp for a camera, decoding on demand.
    ///
    /// Decode failures surface as an empty image (logged inside the record),
    /// never as an error.
    pub fn decoded_image(&self, camera: &str) -> Result<DecodedImage> {
        let record = self
            .cameras
            .get(camera)
            .ok_or_else(|| RigError::UnknownCamera(camera.to_string()))?;
        Ok(record.decoded_image())
    }

    /// Timestamp of the camera's latest message; 0 for unknown cameras or
    /// before the first update.
    pub fn current_image_time(&self, camera: &str) -> i64 {
        self.cameras
            .get(camera)
            .map_or(0, |record| record.current_image_time())
    }

    /// Rigid transform between two frames at a timestamp, as a 4x4 matrix.
    pub fn transform_between(&self, from: &str, to: &str, utime: i64) -> Result<Matrix4<f64>> {
        Ok(self.frames.resolve(from, to, utime)?.to_homogeneous())
    }

    /// Camera intrinsics as a 4x4 projection matrix (focal lengths and skew;
    /// identity for unknown or uncalibrated cameras).
    pub fn camera_projection_matrix(&self, camera: &str) -> Matrix4<f64> {
        let mut projection = Matrix4::identity();
        let Some(intrinsics) = self
            .cameras
            .get(camera)
            .and_then(|record| record.intrinsics())
        else {
            return projection;
        };

        projection[(0, 0)] = intrinsics.fx;
        projection[(1, 1)] = intrinsics.fy;
        projection[(0, 1)] = intrinsics.skew;
        projection
    }

    /// Latest resolved extrinsics as a 4x4 rigid transform; identity for
    /// unknown cameras or before the first resolution.
    pub fn local_to_camera_transform(&self, camera: &str) -> Matrix4<f64> {
        self.cameras
            .get(camera)
            .map_or_else(Matrix4::identity, |record| {
                record.local_to_camera().to_homogeneous()
            })
    }

    /// Camera-frame rays through the four image corners, flattened; empty for
    /// unknown or uncalibrated cameras.
    pub fn camera_frustum_bounds(&self, camera: &str) -> Vec<f64> {
        self.cameras.get(camera).map_or_else(Vec::new, |record| {
            geometry::frustum_corner_rays(record, self.config.frustum_mode)
        })
    }

    /// Unit ray through a pixel in the camera frame; empty for unknown or
    /// uncalibrated cameras.
    pub fn unproject_pixel(&self, camera: &str, px: f64, py: f64) -> Vec<f64> {
        self.cameras.get(camera).map_or_else(Vec::new, |record| {
            geometry::unproject_pixel(record, px, py)
        })
    }

    /// Samples the camera's current image into the point set's color array.
    pub fn colorize_points(&self, camera: &str, set: &mut PointSet) -> Result<()> {
        let record = self
            .cameras
            .get(camera)
            .ok_or_else(|| RigError::UnknownCamera(camera.to_string()))?;
        colorize_points(record, set)
    }

    /// Assigns normalized texture coordinates for the camera into the point
    /// set's per-camera UV array.
    pub fn compute_texture_coords(&self, camera: &str, set: &mut PointSet) -> Result<()> {
        let record = self
            .cameras
            .get(camera)
            .ok_or_else(|| RigError::UnknownCamera(camera.to_string()))?;
        compute_texture_coords(record, set)
    }

    /// Replaces each point with its pixel-space projection.
    pub fn project_points_in_place(&self, camera: &str, set: &mut PointSet) -> Result<()> {
        let record = self
            .cameras
            .get(camera)
            .ok_or_else(|| RigError::UnknownCamera(camera.to_string()))?;
        project_points_in_place(record, set)
    }

    /// Reconstructs a colored point cloud from the channel's latest stereo
    /// bundle.
    ///
    /// A negative `range_threshold` disables the range post-filter.
    pub fn stereo_point_cloud<R: StereoReconstructor + ?Sized>(
        &self,
        reconstructor: &R,
        channel: &str,
        decimation: u32,
        remove_size: u32,
        range_threshold: f32,
    ) -> Result<PointSet> {
        let bundle = self
            .bundles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned()
            .ok_or_else(|| RigError::NoBundle(channel.to_string()))?;

        let left_name = format!("{channel}_LEFT");
        let intrinsics = self
            .cameras
            .get(&left_name)
            .ok_or_else(|| RigError::UnknownCamera(left_name.clone()))?
            .intrinsics()
            .ok_or_else(|| RigError::MissingCalibration(left_name.clone()))?;

        let baseline_key = baseline_param_key(channel);
        let baseline = self.calibration.scalar_param(&baseline_key)?;

        let reprojection = disparity_reprojection_matrix(
            baseline,
            intrinsics.cx,
            intrinsics.cy,
            intrinsics.fx,
        );

        let cloud = reconstructor.unpack(&bundle, &reprojection, decimation, remove_size)?;
        let cloud = if range_threshold >= 0.0 {
            range_filter(cloud, range_threshold)
        } else {
            cloud
        };

        Ok(cloud_to_point_set(&cloud))
    }
}
