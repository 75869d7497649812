//! Decoded packed pixels → a renderable raster.
//!
//! The raster adopts the decoder's buffer as its backing store. Its masks are
//! fixed: R=0x00ff0000, G=0x0000ff00, B=0x000000ff, plus A=0xff000000 when the
//! stream has alpha. Because [`Raster::as_descriptor`] exposes the same words
//! through the packed extraction path, a packed source survives a lossless
//! round trip unchanged.

use alloc::vec::Vec;

use crate::codec::RawDecode;
use crate::decoded::DecodedImage;
use crate::error::WebpError;
use crate::mask::ChannelMasks;
use crate::raster::RasterDescriptor;

/// A packed one-word-per-pixel raster with a direct color model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    masks: ChannelMasks,
    bits_per_pixel: u8,
    data: Vec<u32>,
}

/// Wrap decoded pixels. No copy; the raster owns the decoder's buffer.
pub fn assemble(decoded: DecodedImage) -> Raster {
    let (masks, bits_per_pixel) = if decoded.has_alpha {
        (ChannelMasks::ARGB32, 32)
    } else {
        (ChannelMasks::RGB24, 24)
    };
    let (width, height) = (decoded.width, decoded.height);
    Raster {
        width,
        height,
        masks,
        bits_per_pixel,
        data: decoded.into_pixels(),
    }
}

/// Status mapping plus [`assemble`].
pub fn assemble_raw(raw: RawDecode) -> Result<Raster, WebpError> {
    DecodedImage::from_raw(raw).map(assemble)
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_alpha(&self) -> bool {
        self.masks.has_alpha()
    }

    pub fn masks(&self) -> ChannelMasks {
        self.masks
    }

    /// 32 with alpha, 24 without.
    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    /// Words per row (always equal to the width).
    pub fn scanline_stride(&self) -> usize {
        self.width as usize
    }

    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.data
    }

    /// Raw packed word at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.scanline_stride() + x as usize)
            .copied()
    }

    /// `0xAARRGGBB`, with alpha forced to 0xff for opaque rasters.
    pub fn argb(&self, x: u32, y: u32) -> Option<u32> {
        let word = self.pixel(x, y)?;
        Some(if self.has_alpha() {
            word
        } else {
            0xff00_0000 | word
        })
    }

    /// `[r, g, b, a]` at `(x, y)`.
    pub fn rgba_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let [a, r, g, b] = self.argb(x, y)?.to_be_bytes();
        Some([r, g, b, a])
    }

    /// A packed-kind descriptor over this raster's own words.
    pub fn as_descriptor(&self) -> RasterDescriptor<'_> {
        RasterDescriptor::packed(
            self.width,
            self.height,
            &self.data,
            self.masks,
            self.scanline_stride(),
        )
    }

    /// Interleaved RGBA bytes, alpha 255 for opaque rasters.
    pub fn to_rgba8(&self) -> Vec<u8> {
        #[cfg(feature = "simd")]
        {
            // Little-endian ARGB words are B,G,R,A in memory.
            let mut out: Vec<u8> = self.data.iter().flat_map(|w| w.to_le_bytes()).collect();
            if !out.is_empty() {
                let swapped = garb::bytes::bgra_to_rgba_inplace(&mut out);
                debug_assert!(swapped.is_ok());
                if !self.has_alpha() {
                    let filled = garb::bytes::fill_alpha_rgba(&mut out);
                    debug_assert!(filled.is_ok());
                }
            }
            out
        }
        #[cfg(not(feature = "simd"))]
        {
            let opaque = if self.has_alpha() { 0 } else { 0xff00_0000 };
            self.data
                .iter()
                .flat_map(|&w| {
                    let [a, r, g, b] = (w | opaque).to_be_bytes();
                    [r, g, b, a]
                })
                .collect()
        }
    }

    /// Borrow the packed words as a 2D image.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, u32> {
        imgref::ImgRef::new(&self.data, self.width as usize, self.height as usize)
    }

    /// Copy out as typed RGBA pixels.
    #[cfg(feature = "imgref")]
    pub fn to_rgba_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        let opaque = if self.has_alpha() { 0 } else { 0xff00_0000 };
        let pixels = self
            .data
            .iter()
            .map(|&w| {
                let [a, r, g, b] = (w | opaque).to_be_bytes();
                rgb::RGBA8::new(r, g, b, a)
            })
            .collect();
        imgref::ImgVec::new(pixels, self.width as usize, self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecStatus;
    use crate::extract::{extract_rgb, extract_rgba};
    use alloc::vec;

    #[test]
    fn alpha_selects_argb32() {
        let decoded = DecodedImage::new(1, 1, true, vec![0x80_11_22_33]).unwrap();
        let raster = assemble(decoded);
        assert_eq!(raster.masks(), ChannelMasks::ARGB32);
        assert_eq!(raster.bits_per_pixel(), 32);
        assert_eq!(raster.rgba_at(0, 0), Some([0x11, 0x22, 0x33, 0x80]));
    }

    #[test]
    fn opaque_selects_rgb24() {
        let decoded = DecodedImage::new(1, 1, false, vec![0x00_11_22_33]).unwrap();
        let raster = assemble(decoded);
        assert_eq!(raster.masks(), ChannelMasks::RGB24);
        assert_eq!(raster.bits_per_pixel(), 24);
        assert!(!raster.has_alpha());
        assert_eq!(raster.argb(0, 0), Some(0xff11_2233));
        assert_eq!(raster.rgba_at(0, 0), Some([0x11, 0x22, 0x33, 0xff]));
    }

    #[test]
    fn buffer_is_adopted_not_copied() {
        let pixels = vec![1u32, 2, 3, 4, 5, 6];
        let ptr = pixels.as_ptr();
        let raster = assemble(DecodedImage::new(3, 2, true, pixels).unwrap());
        assert_eq!(raster.pixels().as_ptr(), ptr);
        assert_eq!(raster.pixel(2, 1), Some(6));
        assert_eq!(raster.pixel(3, 0), None);
        assert_eq!(raster.pixel(0, 2), None);
    }

    #[test]
    fn descriptor_extracts_same_channels() {
        let words = vec![0xff_ff_00_00, 0x80_00_ff_00, 0x00_00_00_ff, 0x40_7f_7f_7f];
        let raster = assemble(DecodedImage::new(2, 2, true, words).unwrap());
        let rgba = extract_rgba(&raster.as_descriptor()).unwrap();
        assert_eq!(rgba.as_bytes(), &raster.to_rgba8()[..]);
        assert_eq!(
            rgba.as_bytes(),
            &[255, 0, 0, 255, 0, 255, 0, 128, 0, 0, 255, 0, 127, 127, 127, 64][..]
        );
    }

    #[test]
    fn opaque_descriptor_only_extracts_rgb() {
        let raster = assemble(DecodedImage::new(1, 2, false, vec![0x123456, 0xabcdef]).unwrap());
        let rgb = extract_rgb(&raster.as_descriptor()).unwrap();
        assert_eq!(rgb.as_bytes(), &[0x12, 0x34, 0x56, 0xab, 0xcd, 0xef][..]);
        assert_eq!(
            raster.to_rgba8(),
            vec![0x12, 0x34, 0x56, 0xff, 0xab, 0xcd, 0xef, 0xff]
        );
    }

    #[test]
    fn raw_status_mapping() {
        let ok = RawDecode {
            status: CodecStatus::Ok,
            width: 1,
            height: 1,
            has_alpha: false,
            pixels: vec![0],
        };
        assert!(assemble_raw(ok).is_ok());
        assert!(matches!(
            assemble_raw(RawDecode::failed(CodecStatus::OutOfMemory)),
            Err(WebpError::ResourceExhausted)
        ));
        assert!(matches!(
            assemble_raw(RawDecode::failed(CodecStatus::Failure(-3))),
            Err(WebpError::DecodeFailed { status: -3 })
        ));
    }
}
