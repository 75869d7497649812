use alloc::vec::Vec;

/// Byte layout of a packed buffer handed to the encoder.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// 3 channels, 8-bit R,G,B.
    Rgb8,
    /// 4 channels, 8-bit R,G,B,A.
    Rgba8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.bytes_per_pixel()
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba8)
    }

    pub(crate) fn from_alpha(alpha: bool) -> Self {
        if alpha { Self::Rgba8 } else { Self::Rgb8 }
    }
}

/// Tightly packed, row-major RGB or RGBA bytes with no row padding.
///
/// Byte `channels * i` is the red sample of pixel `i`, followed by green,
/// blue and (for [`PixelLayout::Rgba8`]) alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedBuffer {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
}

impl PackedBuffer {
    pub(crate) fn new(data: Vec<u8>, width: u32, height: u32, layout: PixelLayout) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * layout.bytes_per_pixel()
        );
        Self {
            data,
            width,
            height,
            layout,
        }
    }

    /// Access the packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the packed bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Row stride in bytes (always `width * channels`).
    pub fn stride(&self) -> usize {
        self.width as usize * self.layout.bytes_per_pixel()
    }

    /// Reinterpret as typed RGB pixels. `None` unless the layout is [`PixelLayout::Rgb8`].
    #[cfg(feature = "rgb")]
    pub fn as_rgb(&self) -> Option<&[rgb::RGB8]> {
        use rgb::AsPixels as _;
        (self.layout == PixelLayout::Rgb8).then(|| self.data.as_pixels())
    }

    /// Reinterpret as typed RGBA pixels. `None` unless the layout is [`PixelLayout::Rgba8`].
    #[cfg(feature = "rgb")]
    pub fn as_rgba(&self) -> Option<&[rgb::RGBA8]> {
        use rgb::AsPixels as _;
        (self.layout == PixelLayout::Rgba8).then(|| self.data.as_pixels())
    }
}
