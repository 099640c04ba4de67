//! Wire message encoders.

use flate2::{Compress, Compression, FlushCompress};
use tracing::debug;

use crate::camera_rig::common::error::{Result, RigError};
use crate::camera_rig::decode::{DecodedImage, PixelLayout};
use crate::camera_rig::wire::types::pixel_format;
use crate::camera_rig::wire::RawImageMessage;

/// Flattens an 8-bit RGB image into an uncompressed wire message.
pub fn encode_rgb(image: &DecodedImage) -> Result<RawImageMessage> {
    if image.layout != PixelLayout::Rgb8 {
        return Err(RigError::EncodeError(format!(
            "RGB encoding requires an 8-bit RGB buffer, got {:?}",
            image.layout
        )));
    }

    let expected = image.width as usize * image.height as usize * 3;
    if image.data.len() != expected {
        return Err(RigError::EncodeError(format!(
            "buffer holds {} bytes, {}x{} RGB needs {}",
            image.data.len(),
            image.width,
            image.height,
            expected
        )));
    }

    Ok(RawImageMessage {
        utime: image.utime,
        width: image.width,
        height: image.height,
        row_stride: image.width * 3,
        pixel_format: pixel_format::RGB,
        data: image.data.clone(),
    })
}

/// Depth-image encoder with a reusable compression scratch buffer.
///
/// The scratch buffer grows to the worst-case compressed bound of the largest
/// image seen and is reused across calls.
pub struct ImageEncoder {
    compressor: Compress,
    scratch: Vec<u8>,
}

impl ImageEncoder {
    pub fn new() -> Self {
        Self {
            // Fastest level: depth streams favor latency over wire size.
            compressor: Compress::new(Compression::fast(), true),
            scratch: Vec::new(),
        }
    }

    /// Deflate-compresses a 16-bit single-component image into a wire message
    /// tagged `INVALID`, the generically-compressed depth encoding the
    /// decoder's alias rule expects.
    pub fn encode_compressed_depth(&mut self, image: &DecodedImage) -> Result<RawImageMessage> {
        if image.layout != PixelLayout::Gray16 {
            return Err(RigError::EncodeError(format!(
                "compressed depth encoding requires a 16-bit grayscale buffer, got {:?}",
                image.layout
            )));
        }

        let source_size = image.width as usize * image.height as usize * 2;
        if image.data.len() != source_size {
            return Err(RigError::EncodeError(format!(
                "buffer holds {} bytes, {}x{} 16-bit grayscale needs {}",
                image.data.len(),
                image.width,
                image.height,
                source_size
            )));
        }

        // Worst-case zlib bound on incompressible input.
        let bound = source_size + source_size / 1000 + 64;
        if self.scratch.len() < bound {
            debug!("resizing compress buffer to {bound}");
            self.scratch.resize(bound, 0);
        }

        self.compressor.reset();
        let status = self
            .compressor
            .compress(&image.data, &mut self.scratch, FlushCompress::Finish)
            .map_err(|e| RigError::EncodeError(e.to_string()))?;
        if !matches!(status, flate2::Status::StreamEnd) {
            return Err(RigError::EncodeError(
                "compression did not run to completion".to_string(),
            ));
        }
        let compressed_size = self.compressor.total_out() as usize;

        Ok(RawImageMessage {
            utime: image.utime,
            width: image.width,
            height: image.height,
            row_stride: 0,
            pixel_format: pixel_format::INVALID,
            data: self.scratch[..compressed_size].to_vec(),
        })
    }
}

impl Default for ImageEncoder {
    fn default() -> Self {
        Self::new()
    }
}
