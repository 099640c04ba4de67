//! Multi-camera image ingestion and geometry core
//!
//! This module ingests per-camera wire image messages, decodes them on demand,
//! and uses per-camera calibration to colorize or texture externally supplied
//! point sets and to assemble stereo point clouds.

pub mod calibration;
pub mod common;
pub mod decode;
pub mod encode;
pub mod frames;
pub mod geometry;
pub mod pointset;
pub mod stereo;
pub mod store;
pub mod wire;

pub use common::{
    Result,
    RigError,
};

pub use wire::{
    ImageBundle,
    ImageSlot,
    PixelFormat,
    RawImageMessage,
};

pub use calibration::{
    CalibrationProvider,
    CameraIntrinsics,
    DistortionCoeffs,
    PixelProjection,
    StaticCalibrationProvider,
};

pub use frames::{
    FixedFrameGraph,
    FrameGraph,
};

pub use decode::{
    DecodedImage,
    PixelLayout,
};

pub use encode::{
    ImageEncoder,
    ImageSink,
    encode_rgb,
    publish_rgb_image,
    publish_rgbd_bundle,
};

pub use pointset::PointSet;

pub use geometry::FrustumMode;

pub use store::{
    CameraImageStore,
    CameraRecord,
    StoreConfig,
    StoreConfigBuilder,
};

pub use stereo::{
    ColoredPoint,
    StereoReconstructor,
    disparity_reprojection_matrix,
};
