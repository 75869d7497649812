use alloc::vec::Vec;

use crate::codec::RawDecode;
use crate::error::WebpError;

/// Packed pixels returned by a successful decode.
///
/// One word per pixel: `0xAARRGGBB` with alpha, `0x00RRGGBB` without.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
    pixels: Vec<u32>,
}

impl DecodedImage {
    /// Fails unless `pixels` holds exactly `width * height` words.
    pub fn new(
        width: u32,
        height: u32,
        has_alpha: bool,
        pixels: Vec<u32>,
    ) -> Result<Self, WebpError> {
        let needed = (width as usize)
            .checked_mul(height as usize)
            .ok_or(WebpError::DimensionsTooLarge { width, height })?;
        if pixels.len() != needed {
            return Err(WebpError::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            has_alpha,
            pixels,
        })
    }

    /// Map the codec status, then take its buffer. No partial result on failure.
    pub fn from_raw(raw: RawDecode) -> Result<Self, WebpError> {
        log::debug!(
            "codec status {:?}, {}x{} alpha={}",
            raw.status,
            raw.width,
            raw.height,
            raw.has_alpha
        );
        raw.status.into_result()?;
        Self::new(raw.width, raw.height, raw.has_alpha, raw.pixels)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }
}
