//! Source raster descriptions for the extractor.
//!
//! A [`RasterDescriptor`] borrows pixel storage; it never owns it. The storage
//! kind decides which extraction path runs.

use crate::error::WebpError;
use crate::generic::{ColorModel, SampleSource};
use crate::mask::ChannelMasks;

/// Memory layout family of a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// One byte per sample, bands addressed through bank/offset/stride.
    ComponentByte,
    /// One 32-bit word per sample, low byte used.
    ComponentInt,
    /// One 32-bit word per pixel, channels selected by bit masks.
    PackedInt,
    /// Opaque per-pixel accessor plus a color model.
    Generic,
}

/// Sample banks of a component raster.
///
/// Interleaved layouts keep every band in one bank; planar layouts use one
/// bank per band.
#[derive(Clone, Copy, Debug)]
pub enum Banks<'a, T> {
    Single(&'a [T]),
    Multi(&'a [&'a [T]]),
}

impl<'a, T> Banks<'a, T> {
    pub fn len(&self) -> usize {
        match self {
            Banks::Single(_) => 1,
            Banks::Multi(banks) => banks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&'a [T]> {
        match *self {
            Banks::Single(bank) => (index == 0).then_some(bank),
            Banks::Multi(banks) => banks.get(index).copied(),
        }
    }
}

/// Addressing of a component raster.
///
/// Sample `(x, y)` of band `b` lives at
/// `bank[bank_indices[b]][band_offsets[b] + y * scanline_stride + x * pixel_stride]`.
/// Bands are ordered R, G, B, A; only the first `bands` entries are meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentGeometry {
    pub band_offsets: [usize; 4],
    pub bank_indices: [usize; 4],
    pub bands: usize,
    pub pixel_stride: usize,
    pub scanline_stride: usize,
}

impl ComponentGeometry {
    /// Bands interleaved in a single bank, in R,G,B[,A] order, no row padding.
    pub fn interleaved(bands: usize, width: usize) -> Self {
        Self {
            band_offsets: [0, 1, 2, 3],
            bank_indices: [0; 4],
            bands,
            pixel_stride: bands,
            scanline_stride: width * bands,
        }
    }

    /// One bank per band, bank `b` holding band `b`, no row padding.
    pub fn planar(bands: usize, width: usize) -> Self {
        Self {
            band_offsets: [0; 4],
            bank_indices: [0, 1, 2, 3],
            bands,
            pixel_stride: 1,
            scanline_stride: width,
        }
    }

    /// Replace the band offsets, e.g. `[2, 1, 0, 3]` for BGRA-ordered storage.
    pub fn with_band_offsets(mut self, band_offsets: [usize; 4]) -> Self {
        self.band_offsets = band_offsets;
        self
    }

    pub fn with_scanline_stride(mut self, scanline_stride: usize) -> Self {
        self.scanline_stride = scanline_stride;
        self
    }

    pub fn with_pixel_stride(mut self, pixel_stride: usize) -> Self {
        self.pixel_stride = pixel_stride;
        self
    }
}

/// Borrowed pixel storage, tagged by storage kind.
#[derive(Clone, Copy)]
pub enum RasterData<'a> {
    ComponentByte {
        banks: Banks<'a, u8>,
        geometry: ComponentGeometry,
    },
    ComponentInt {
        banks: Banks<'a, u32>,
        geometry: ComponentGeometry,
    },
    PackedInt {
        data: &'a [u32],
        masks: ChannelMasks,
        scanline_stride: usize,
    },
    Generic {
        source: &'a dyn SampleSource,
        model: &'a dyn ColorModel,
    },
}

impl core::fmt::Debug for RasterData<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RasterData::ComponentByte { banks, geometry } => f
                .debug_struct("ComponentByte")
                .field("banks", &banks.len())
                .field("geometry", geometry)
                .finish(),
            RasterData::ComponentInt { banks, geometry } => f
                .debug_struct("ComponentInt")
                .field("banks", &banks.len())
                .field("geometry", geometry)
                .finish(),
            RasterData::PackedInt {
                data,
                masks,
                scanline_stride,
            } => f
                .debug_struct("PackedInt")
                .field("len", &data.len())
                .field("masks", masks)
                .field("scanline_stride", scanline_stride)
                .finish(),
            RasterData::Generic { model, .. } => f
                .debug_struct("Generic")
                .field("has_alpha", &model.has_alpha())
                .finish_non_exhaustive(),
        }
    }
}

/// Describes a source image without owning its pixels.
#[derive(Clone, Copy, Debug)]
pub struct RasterDescriptor<'a> {
    pub width: u32,
    pub height: u32,
    data: RasterData<'a>,
}

impl<'a> RasterDescriptor<'a> {
    pub fn component_bytes(
        width: u32,
        height: u32,
        banks: Banks<'a, u8>,
        geometry: ComponentGeometry,
    ) -> Self {
        Self {
            width,
            height,
            data: RasterData::ComponentByte { banks, geometry },
        }
    }

    pub fn component_ints(
        width: u32,
        height: u32,
        banks: Banks<'a, u32>,
        geometry: ComponentGeometry,
    ) -> Self {
        Self {
            width,
            height,
            data: RasterData::ComponentInt { banks, geometry },
        }
    }

    /// One word per pixel, rows `scanline_stride` words apart.
    pub fn packed(
        width: u32,
        height: u32,
        data: &'a [u32],
        masks: ChannelMasks,
        scanline_stride: usize,
    ) -> Self {
        Self {
            width,
            height,
            data: RasterData::PackedInt {
                data,
                masks,
                scanline_stride,
            },
        }
    }

    pub fn generic(
        width: u32,
        height: u32,
        source: &'a dyn SampleSource,
        model: &'a dyn ColorModel,
    ) -> Self {
        Self {
            width,
            height,
            data: RasterData::Generic { source, model },
        }
    }

    /// Tightly packed interleaved RGB bytes.
    pub fn rgb8(data: &'a [u8], width: u32, height: u32) -> Self {
        Self::component_bytes(
            width,
            height,
            Banks::Single(data),
            ComponentGeometry::interleaved(3, width as usize),
        )
    }

    /// Tightly packed interleaved RGBA bytes.
    pub fn rgba8(data: &'a [u8], width: u32, height: u32) -> Self {
        Self::component_bytes(
            width,
            height,
            Banks::Single(data),
            ComponentGeometry::interleaved(4, width as usize),
        )
    }

    /// View an RGB image; row padding comes from the image stride.
    #[cfg(feature = "imgref")]
    pub fn from_rgb_imgref(img: imgref::ImgRef<'a, rgb::RGB8>) -> Self {
        use rgb::ComponentBytes as _;
        let (width, height, stride) = (img.width(), img.height(), img.stride());
        Self::component_bytes(
            width as u32,
            height as u32,
            Banks::Single(img.into_buf().as_bytes()),
            ComponentGeometry::interleaved(3, width).with_scanline_stride(stride * 3),
        )
    }

    /// View an RGBA image; row padding comes from the image stride.
    #[cfg(feature = "imgref")]
    pub fn from_rgba_imgref(img: imgref::ImgRef<'a, rgb::RGBA8>) -> Self {
        use rgb::ComponentBytes as _;
        let (width, height, stride) = (img.width(), img.height(), img.stride());
        Self::component_bytes(
            width as u32,
            height as u32,
            Banks::Single(img.into_buf().as_bytes()),
            ComponentGeometry::interleaved(4, width).with_scanline_stride(stride * 4),
        )
    }

    /// View an image of packed words.
    #[cfg(feature = "imgref")]
    pub fn from_packed_imgref(img: imgref::ImgRef<'a, u32>, masks: ChannelMasks) -> Self {
        let (width, height, stride) = (img.width(), img.height(), img.stride());
        Self::packed(width as u32, height as u32, img.into_buf(), masks, stride)
    }

    pub fn kind(&self) -> StorageKind {
        match self.data {
            RasterData::ComponentByte { .. } => StorageKind::ComponentByte,
            RasterData::ComponentInt { .. } => StorageKind::ComponentInt,
            RasterData::PackedInt { .. } => StorageKind::PackedInt,
            RasterData::Generic { .. } => StorageKind::Generic,
        }
    }

    pub fn data(&self) -> &RasterData<'a> {
        &self.data
    }

    /// Whether the source declares an alpha channel.
    pub fn has_alpha(&self) -> bool {
        match &self.data {
            RasterData::ComponentByte { geometry, .. }
            | RasterData::ComponentInt { geometry, .. } => geometry.bands >= 4,
            RasterData::PackedInt { masks, .. } => masks.has_alpha(),
            RasterData::Generic { model, .. } => model.has_alpha(),
        }
    }

    /// Check that every sample the extractor will read is addressable.
    ///
    /// Runs before any pixel work; extraction relies on it for in-bounds access.
    pub fn validate(&self, with_alpha: bool) -> Result<(), WebpError> {
        let (width, height) = (self.width, self.height);
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or(WebpError::DimensionsTooLarge { width, height })?;

        let needed_bands = if with_alpha { 4 } else { 3 };
        match &self.data {
            RasterData::ComponentByte { banks, geometry } => check_component(
                banks.len(),
                |i| banks.get(i).map(<[u8]>::len),
                geometry,
                needed_bands,
                width,
                height,
            ),
            RasterData::ComponentInt { banks, geometry } => check_component(
                banks.len(),
                |i| banks.get(i).map(<[u32]>::len),
                geometry,
                needed_bands,
                width,
                height,
            ),
            RasterData::PackedInt {
                data,
                masks,
                scanline_stride,
            } => {
                masks.validate(with_alpha)?;
                if width == 0 || height == 0 {
                    return Ok(());
                }
                let needed = (height as usize - 1)
                    .checked_mul(*scanline_stride)
                    .and_then(|v| v.checked_add(width as usize))
                    .ok_or(WebpError::DimensionsTooLarge { width, height })?;
                if data.len() < needed {
                    return Err(WebpError::BufferTooSmall {
                        needed,
                        actual: data.len(),
                    });
                }
                Ok(())
            }
            RasterData::Generic { source, .. } => {
                let (src_w, src_h) = source.dimensions();
                if src_w < width || src_h < height {
                    return Err(WebpError::InvalidArgument(alloc::format!(
                        "sample source is {src_w}x{src_h}, raster is {width}x{height}"
                    )));
                }
                Ok(())
            }
        }
    }
}

fn check_component(
    bank_count: usize,
    bank_len: impl Fn(usize) -> Option<usize>,
    geometry: &ComponentGeometry,
    needed_bands: usize,
    width: u32,
    height: u32,
) -> Result<(), WebpError> {
    if geometry.bands < needed_bands {
        return Err(WebpError::IncompatibleFormat(alloc::format!(
            "component raster has {} bands, need {needed_bands}",
            geometry.bands
        )));
    }
    for band in 0..needed_bands {
        let bank = geometry.bank_indices[band];
        let len = bank_len(bank).ok_or_else(|| {
            WebpError::IncompatibleFormat(alloc::format!(
                "band {band} refers to bank {bank}, raster has {bank_count}"
            ))
        })?;
        if width == 0 || height == 0 {
            continue;
        }
        let needed = (height as usize - 1)
            .checked_mul(geometry.scanline_stride)
            .and_then(|v| {
                let last_column = (width as usize - 1).checked_mul(geometry.pixel_stride)?;
                v.checked_add(last_column)
            })
            .and_then(|v| v.checked_add(geometry.band_offsets[band]))
            .and_then(|v| v.checked_add(1))
            .ok_or(WebpError::DimensionsTooLarge { width, height })?;
        if len < needed {
            return Err(WebpError::BufferTooSmall {
                needed,
                actual: len,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn kinds_and_alpha() {
        let bytes = vec![0u8; 2 * 2 * 4];
        let rgba = RasterDescriptor::rgba8(&bytes, 2, 2);
        assert_eq!(rgba.kind(), StorageKind::ComponentByte);
        assert!(rgba.has_alpha());
        assert!(!RasterDescriptor::rgb8(&bytes, 2, 2).has_alpha());

        let words = vec![0u32; 4];
        let opaque = RasterDescriptor::packed(2, 2, &words, ChannelMasks::RGB24, 2);
        assert_eq!(opaque.kind(), StorageKind::PackedInt);
        assert!(!opaque.has_alpha());
        let argb = RasterDescriptor::packed(2, 2, &words, ChannelMasks::ARGB32, 2);
        assert!(argb.has_alpha());
    }

    #[test]
    fn undersized_interleaved_bank_rejected() {
        let bytes = vec![0u8; 2 * 2 * 3 - 1];
        let raster = RasterDescriptor::rgb8(&bytes, 2, 2);
        match raster.validate(false) {
            Err(WebpError::BufferTooSmall { needed, actual }) => {
                assert_eq!(needed, 12);
                assert_eq!(actual, 11);
            }
            other => panic!("expected BufferTooSmall, got {other:?}"),
        }
    }

    #[test]
    fn exact_extent_accepted() {
        // Last row needs no trailing padding.
        let geometry = ComponentGeometry::interleaved(3, 2).with_scanline_stride(8);
        let bytes = vec![0u8; 8 + 6];
        let raster = RasterDescriptor::component_bytes(2, 2, Banks::Single(&bytes), geometry);
        assert!(raster.validate(false).is_ok());
    }

    #[test]
    fn missing_bank_rejected() {
        let r = vec![0u8; 4];
        let g = vec![0u8; 4];
        let banks = [r.as_slice(), g.as_slice()];
        let raster = RasterDescriptor::component_bytes(
            2,
            2,
            Banks::Multi(&banks),
            ComponentGeometry::planar(3, 2),
        );
        assert!(matches!(
            raster.validate(false),
            Err(WebpError::IncompatibleFormat(_))
        ));
    }

    #[test]
    fn alpha_needs_four_bands() {
        let bytes = vec![0u8; 12];
        let raster = RasterDescriptor::rgb8(&bytes, 2, 2);
        assert!(raster.validate(false).is_ok());
        assert!(matches!(
            raster.validate(true),
            Err(WebpError::IncompatibleFormat(_))
        ));
    }

    #[test]
    fn packed_bounds_use_scanline_stride() {
        let words = vec![0u32; 3 + 2];
        let raster = RasterDescriptor::packed(2, 2, &words, ChannelMasks::RGB24, 3);
        assert!(raster.validate(false).is_ok());
        let short = &words[..4];
        let raster = RasterDescriptor::packed(2, 2, short, ChannelMasks::RGB24, 3);
        assert!(matches!(
            raster.validate(false),
            Err(WebpError::BufferTooSmall { needed: 5, actual: 4 })
        ));
    }
}
