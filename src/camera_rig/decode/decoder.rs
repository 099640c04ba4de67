//! Pixel-format dispatch for incoming wire messages.
//!
//! Two aliasing rules precede the dispatch: a message tagged `INVALID` is the
//! producer's shorthand for zlib-framed 16-bit grayscale (the default depth
//! encoding), and an 8-bit `GRAY` tag with a doubled row stride is really
//! 16-bit grayscale from sensors that mislabel their sample width.

use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::debug;

use crate::camera_rig::common::error::{Result, RigError};
use crate::camera_rig::wire::{PixelFormat, RawImageMessage};

use super::types::{DecodedImage, PixelLayout};

/// Decodes one raw wire message into an interleaved pixel buffer.
///
/// `zlib_framed` is the camera's registration-time framing flag for slot
/// types that compress their payload generically; the `INVALID` alias forces
/// it on regardless.
pub fn decode_message(message: &RawImageMessage, zlib_framed: bool) -> Result<DecodedImage> {
    let w = message.width as usize;
    let h = message.height as usize;

    if w == 0 || h == 0 {
        return Ok(DecodedImage::empty());
    }

    let mut format = PixelFormat::from_tag(message.pixel_format);
    let mut framed = zlib_framed;

    if format == PixelFormat::Invalid {
        format = PixelFormat::LeGray16;
        framed = true;
    } else if format == PixelFormat::Gray && message.row_stride as usize / w == 2 {
        format = PixelFormat::LeGray16;
        framed = false;
    }

    match format {
        PixelFormat::Rgb => raw_buffer(message, PixelLayout::Rgb8),
        PixelFormat::Mjpeg => decode_jpeg(message),
        PixelFormat::Gray => raw_buffer(message, PixelLayout::Gray8),
        PixelFormat::LeGray16 => {
            if framed {
                inflate_gray16(message)
            } else {
                raw_buffer(message, PixelLayout::Gray16)
            }
        }
        other => Err(RigError::UnsupportedPixelFormat(other.tag())),
    }
}

/// Payload is already in its decoded layout; validate the size and take it.
fn raw_buffer(message: &RawImageMessage, layout: PixelLayout) -> Result<DecodedImage> {
    let expected =
        message.width as usize * message.height as usize * layout.bytes_per_pixel();
    if message.data.len() < expected {
        return Err(RigError::DecodeError(format!(
            "payload holds {} bytes, {}x{} {:?} needs {}",
            message.data.len(),
            message.width,
            message.height,
            layout,
            expected
        )));
    }

    Ok(DecodedImage {
        width: message.width,
        height: message.height,
        layout,
        utime: message.utime,
        data: message.data.clone(),
    })
}

fn decode_jpeg(message: &RawImageMessage) -> Result<DecodedImage> {
    debug!(
        "Decoding MJPEG frame, {} bytes compressed",
        message.data.len()
    );

    let decoded = image::load_from_memory_with_format(&message.data, image::ImageFormat::Jpeg)
        .map_err(|e| RigError::DecodeError(e.to_string()))?;
    let rgb = decoded.to_rgb8();

    if rgb.width() != message.width || rgb.height() != message.height {
        return Err(RigError::DecodeError(format!(
            "jpeg decoded to {}x{} but header declares {}x{}",
            rgb.width(),
            rgb.height(),
            message.width,
            message.height
        )));
    }

    Ok(DecodedImage {
        width: message.width,
        height: message.height,
        layout: PixelLayout::Rgb8,
        utime: message.utime,
        data: rgb.into_raw(),
    })
}

fn inflate_gray16(message: &RawImageMessage) -> Result<DecodedImage> {
    let expected = message.width as usize * message.height as usize * 2;

    let mut data = Vec::with_capacity(expected);
    let mut decoder = ZlibDecoder::new(&message.data[..]);
    decoder
        .read_to_end(&mut data)
        .map_err(|e| RigError::DecodeError(format!("inflate failed: {e}")))?;

    // The framing contract is exact: anything else means a corrupt or
    // mislabeled payload.
    if data.len() != expected {
        return Err(RigError::DecodeError(format!(
            "inflated to {} bytes, expected {}",
            data.len(),
            expected
        )));
    }

    Ok(DecodedImage {
        width: message.width,
        height: message.height,
        layout: PixelLayout::Gray16,
        utime: message.utime,
        data,
    })
}
