//! Outgoing image encoding module
//!
//! Inverse of the decoder: turns decoded images back into wire messages and
//! hands them to the transport layer behind the [`ImageSink`] seam.

mod encoder;
mod publish;

pub use encoder::{ImageEncoder, encode_rgb};
pub use publish::{ImageSink, publish_rgb_image, publish_rgbd_bundle};
