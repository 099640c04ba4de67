//! Coordinate-frame graph seam
//!
//! Extrinsics are resolved against a time-indexed registry of named reference
//! frames owned by an external collaborator.

mod graph;

pub use graph::{FixedFrameGraph, FrameGraph};
