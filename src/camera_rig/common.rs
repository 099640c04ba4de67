//! Common utilities shared across the camera rig core.

pub mod error;

pub use error::{Result, RigError};
