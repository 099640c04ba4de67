//! Wire image decoding module
//!
//! Pure dispatch from the declared pixel-format tag of a raw message to a
//! decoded interleaved pixel buffer, including generic deflate framing.

mod decoder;
mod types;

pub use decoder::decode_message;
pub use types::{DecodedImage, PixelLayout};
