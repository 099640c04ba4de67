//! Camera state store module
//!
//! Owns per-camera calibration status, the most recent raw message, the
//! lazily-decoded pixel buffer, and the last-resolved extrinsics, plus the
//! channel routing that feeds them from the subscription layer.

mod record;
mod registry;


pub use record::CameraRecord;
pub use registry::{CameraImageStore, StoreConfig, StoreConfigBuilder};
