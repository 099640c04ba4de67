//! Raw image message and bundle types

/// Wire pixel-format tags, fourcc-style values carried in the message header.
pub mod pixel_format {
    pub const INVALID: i32 = -2;
    pub const GRAY: i32 = 1_497_715_271;
    pub const RGB: i32 = 859_981_650;
    pub const BGR: i32 = 861_030_210;
    pub const RGBA: i32 = 876_758_866;
    pub const MJPEG: i32 = 1_196_444_237;
    pub const LE_GRAY16: i32 = 357;
}

/// Declared pixel encoding of a wire image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Producer omitted the tag; decoded as zlib-framed 16-bit grayscale.
    Invalid,
    Gray,
    Rgb,
    Bgr,
    Rgba,
    Mjpeg,
    LeGray16,
    /// Tag this core does not handle; decode reports it as unsupported.
    Other(i32),
}

impl PixelFormat {
    pub fn from_tag(tag: i32) -> Self {
        match tag {
            pixel_format::INVALID => Self::Invalid,
            pixel_format::GRAY => Self::Gray,
            pixel_format::RGB => Self::Rgb,
            pixel_format::BGR => Self::Bgr,
            pixel_format::RGBA => Self::Rgba,
            pixel_format::MJPEG => Self::Mjpeg,
            pixel_format::LE_GRAY16 => Self::LeGray16,
            other => Self::Other(other),
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            Self::Invalid => pixel_format::INVALID,
            Self::Gray => pixel_format::GRAY,
            Self::Rgb => pixel_format::RGB,
            Self::Bgr => pixel_format::BGR,
            Self::Rgba => pixel_format::RGBA,
            Self::Mjpeg => pixel_format::MJPEG,
            Self::LeGray16 => pixel_format::LE_GRAY16,
            Self::Other(tag) => tag,
        }
    }
}

/// One raw image record as delivered by the subscription layer.
///
/// Replaced wholesale on every update; never partially mutated.
#[derive(Debug, Clone, Default)]
pub struct RawImageMessage {
    /// Capture timestamp in microseconds.
    pub utime: i64,
    pub width: u32,
    pub height: u32,
    /// Bytes per row of the undecoded payload; 0 for compressed payloads.
    pub row_stride: u32,
    /// Wire pixel-format tag, see [`pixel_format`].
    pub pixel_format: i32,
    pub data: Vec<u8>,
}

/// Slot of an image inside a multi-image bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageSlot {
    Left,
    Right,
    Disparity,
    Mask,
    DepthMm,
    DisparityZipped,
    MaskZipped,
    DepthMmZipped,
}

impl ImageSlot {
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Disparity),
            3 => Some(Self::Mask),
            4 => Some(Self::DepthMm),
            5 => Some(Self::DisparityZipped),
            6 => Some(Self::MaskZipped),
            7 => Some(Self::DepthMmZipped),
            _ => None,
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Disparity => 2,
            Self::Mask => 3,
            Self::DepthMm => 4,
            Self::DisparityZipped => 5,
            Self::MaskZipped => 6,
            Self::DepthMmZipped => 7,
        }
    }

    /// Payloads in these slots carry generic deflate framing on the wire.
    pub fn is_zlib_framed(self) -> bool {
        matches!(
            self,
            Self::DisparityZipped | Self::MaskZipped | Self::DepthMmZipped
        )
    }
}

/// A multi-image message: several slots sharing one channel and timestamp.
#[derive(Debug, Clone, Default)]
pub struct ImageBundle {
    pub utime: i64,
    pub images: Vec<(ImageSlot, RawImageMessage)>,
}

impl ImageBundle {
    pub fn image_for(&self, slot: ImageSlot) -> Option<&RawImageMessage> {
        self.images
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, msg)| msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_format_tag_round_trip() {
        for format in [
            PixelFormat::Invalid,
            PixelFormat::Gray,
            PixelFormat::Rgb,
            PixelFormat::Mjpeg,
            PixelFormat::LeGray16,
        ] {
            assert_eq!(PixelFormat::from_tag(format.tag()), format);
        }
        assert_eq!(PixelFormat::from_tag(42), PixelFormat::Other(42));
    }

    #[test]
    fn zipped_slots_are_framed() {
        assert!(ImageSlot::DepthMmZipped.is_zlib_framed());
        assert!(ImageSlot::DisparityZipped.is_zlib_framed());
        assert!(ImageSlot::MaskZipped.is_zlib_framed());
        assert!(!ImageSlot::Left.is_zlib_framed());
        assert!(!ImageSlot::DepthMm.is_zlib_framed());
    }

    #[test]
    fn bundle_slot_lookup() {
        let bundle = ImageBundle {
            utime: 7,
            images: vec![
                (ImageSlot::Left, RawImageMessage::default()),
                (ImageSlot::Right, RawImageMessage::default()),
            ],
        };
        assert!(bundle.image_for(ImageSlot::Left).is_some());
        assert!(bundle.image_for(ImageSlot::DisparityZipped).is_none());
    }
}
