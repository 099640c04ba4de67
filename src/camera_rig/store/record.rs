//! Per-camera state record.

use std::sync::{Mutex, MutexGuard, PoisonError};

use nalgebra::Isometry3;
use tracing::{debug, error};

use crate::camera_rig::calibration::CameraIntrinsics;
use crate::camera_rig::common::error::Result;
use crate::camera_rig::decode::{DecodedImage, decode_message};
use crate::camera_rig::frames::FrameGraph;
use crate::camera_rig::wire::RawImageMessage;

/// Mutable tail of a camera record, guarded by the record's lock.
#[derive(Debug)]
pub(crate) struct CameraState {
    /// Most recent raw message, replaced wholesale on every update.
    pub message: RawImageMessage,
    /// Decode cache; valid only when `decoded_generation == generation`.
    pub decoded: Option<DecodedImage>,
    /// Bumped on every message replacement.
    pub generation: u64,
    /// Generation the cache was decoded from.
    pub decoded_generation: u64,
    /// Last successful extrinsics resolution; retained across transient
    /// lookup failures.
    pub local_to_camera: Isometry3<f64>,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            message: RawImageMessage::default(),
            decoded: None,
            generation: 0,
            decoded_generation: 0,
            local_to_camera: Isometry3::identity(),
        }
    }
}

/// One registered camera.
///
/// The identity fields are set at registration and read-only thereafter; all
/// image/transform state lives behind one exclusive per-record lock, so
/// different cameras never contend with each other.
pub struct CameraRecord {
    name: String,
    has_calibration: bool,
    intrinsics: Option<CameraIntrinsics>,
    coord_frame: String,
    zlib_framed: bool,
    edge_exclusion: bool,
    state: Mutex<CameraState>,
}

impl CameraRecord {
    pub(crate) fn new(
        name: impl Into<String>,
        has_calibration: bool,
        intrinsics: Option<CameraIntrinsics>,
        coord_frame: String,
        zlib_framed: bool,
        edge_exclusion: bool,
    ) -> Self {
        Self {
            name: name.into(),
            has_calibration,
            intrinsics,
            coord_frame,
            zlib_framed,
            edge_exclusion,
            state: Mutex::new(CameraState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_calibration(&self) -> bool {
        self.has_calibration
    }

    pub fn intrinsics(&self) -> Option<&CameraIntrinsics> {
        self.intrinsics.as_ref()
    }

    pub fn coord_frame(&self) -> &str {
        &self.coord_frame
    }

    pub fn zlib_framed(&self) -> bool {
        self.zlib_framed
    }

    pub fn edge_exclusion(&self) -> bool {
        self.edge_exclusion
    }

    pub(crate) fn locked_state(&self) -> MutexGuard<'_, CameraState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the latest message, invalidates the decode cache, and
    /// re-resolves extrinsics at the new timestamp.
    ///
    /// With `fixup_zero_utime` set (single-image channels), an inbound
    /// timestamp of exactly 0 becomes `previous + 1` so consumers keyed on
    /// time keep strict monotonicity.
    pub(crate) fn apply_message(
        &self,
        message: RawImageMessage,
        frames: &dyn FrameGraph,
        reference_frame: &str,
        fixup_zero_utime: bool,
    ) {
        let mut state = self.locked_state();
        let previous_utime = state.message.utime;

        state.message = message;
        state.decoded = None;
        state.generation += 1;

        if fixup_zero_utime && state.message.utime == 0 {
            state.message.utime = previous_utime + 1;
        }

        if self.has_calibration {
            match frames.resolve(reference_frame, &self.coord_frame, state.message.utime) {
                Ok(transform) => state.local_to_camera = transform,
                // Stale-but-valid beats undefined: keep the previous transform.
                Err(e) => debug!(camera = %self.name, "extrinsics resolution failed: {e}"),
            }
        }
    }

    /// Decodes the current message into the cache if the cache is stale.
    pub(crate) fn ensure_decoded(&self, state: &mut CameraState) -> Result<()> {
        if state.decoded.is_some() && state.decoded_generation == state.generation {
            return Ok(());
        }

        let image = decode_message(&state.message, self.zlib_framed)?;
        state.decoded_generation = state.generation;
        state.decoded = Some(image);
        Ok(())
    }

    /// Decode-on-demand snapshot of the current image.
    ///
    /// Decode failures are logged with the camera name and surface as an
    /// empty image carrying the message timestamp; they never cross this
    /// boundary as errors.
    pub fn decoded_image(&self) -> DecodedImage {
        let mut state = self.locked_state();
        match self.ensure_decoded(&mut state) {
            Ok(()) => state.decoded.clone().unwrap_or_else(DecodedImage::empty),
            Err(e) => {
                error!(
                    camera = %self.name,
                    pixel_format = state.message.pixel_format,
                    "failed to decode image: {e}"
                );
                let mut empty = DecodedImage::empty();
                empty.utime = state.message.utime;
                empty
            }
        }
    }

    /// Timestamp of the latest message; 0 before the first update.
    pub fn current_image_time(&self) -> i64 {
        self.locked_state().message.utime
    }

    /// Last resolved local-to-camera transform; identity before the first
    /// successful resolution.
    pub fn local_to_camera(&self) -> Isometry3<f64> {
        self.locked_state().local_to_camera
    }
}
