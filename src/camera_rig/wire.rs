//! Wire-level image message types
//!
//! Mirrors the transport layer's image and image-bundle records. The
//! subscription layer hands these to the store's ingress functions; the
//! encode path produces them for publishing.

pub mod types;

pub use types::{
    ImageBundle,
    ImageSlot,
    PixelFormat,
    RawImageMessage,
};
