//! Caller-owned point set module
//!
//! Point sets flow in from consumers (render/recording layers) and are
//! mutated in place by the colorization, texture, and projection operations.

mod types;

pub use types::{DEFAULT_COLOR, DEFAULT_TCOORD, PointSet};
