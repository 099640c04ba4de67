//! Decoded image types

/// Component layout of a decoded pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 3 components, 8 bits each, interleaved.
    Rgb8,
    /// 1 component, 8 bits.
    Gray8,
    /// 1 component, 16 bits, little endian.
    Gray16,
}

impl PixelLayout {
    pub fn components(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Gray8 | Self::Gray16 => 1,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::Rgb8 | Self::Gray8 => 1,
            Self::Gray16 => 2,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        self.components() * self.bytes_per_sample()
    }
}

/// Decoded interleaved pixel buffer with its capture timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Capture timestamp of the message this buffer was decoded from.
    pub utime: i64,
    pub data: Vec<u8>,
}

impl DecodedImage {
    /// The empty image returned when nothing has been received or decode
    /// failed.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            layout: PixelLayout::Gray8,
            utime: 0,
            data: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for DecodedImage {
    fn default() -> Self {
        Self::empty()
    }
}
