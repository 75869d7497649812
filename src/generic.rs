//! Capability traits for the generic extraction path, plus stock models.
//!
//! The generic path asks a [`SampleSource`] for one pixel's transfer elements
//! and a [`ColorModel`] to turn them into 8-bit channel values. It handles any
//! layout the fast paths don't, at the cost of two dynamic calls per channel.

use alloc::vec::Vec;

use crate::error::WebpError;
use crate::mask::{ChannelMasks, shift_of};

/// Transfer elements of one pixel.
///
/// Up to four words. How many are meaningful, and what they mean, is agreed
/// between a [`SampleSource`] and the [`ColorModel`] it is paired with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sample(pub [u32; 4]);

/// Per-pixel accessor over arbitrary storage.
pub trait SampleSource {
    /// Addressable width and height.
    fn dimensions(&self) -> (u32, u32);

    /// Overwrite `sample` with the elements of pixel `(x, y)`.
    ///
    /// `sample` is reused across calls; implementations need not clear
    /// elements they don't write.
    fn read_sample(&self, x: u32, y: u32, sample: &mut Sample);
}

/// Interprets a [`Sample`] as normalized 0..=255 channel values.
pub trait ColorModel {
    fn red(&self, sample: &Sample) -> u8;
    fn green(&self, sample: &Sample) -> u8;
    fn blue(&self, sample: &Sample) -> u8;
    /// Alpha; opaque models return 255.
    fn alpha(&self, sample: &Sample) -> u8;
    fn has_alpha(&self) -> bool;
}

// ── Sources ──────────────────────────────────────────────────────────

/// One word per pixel. Element 0 is the word.
#[derive(Clone, Copy, Debug)]
pub struct PackedSamples<'a> {
    data: &'a [u32],
    width: u32,
    height: u32,
    scanline_stride: usize,
}

impl<'a> PackedSamples<'a> {
    pub fn new(
        data: &'a [u32],
        width: u32,
        height: u32,
        scanline_stride: usize,
    ) -> Result<Self, WebpError> {
        check_extent(data.len(), width, height, scanline_stride, 1, 1)?;
        Ok(Self {
            data,
            width,
            height,
            scanline_stride,
        })
    }
}

impl SampleSource for PackedSamples<'_> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_sample(&self, x: u32, y: u32, sample: &mut Sample) {
        sample.0[0] = self.data[y as usize * self.scanline_stride + x as usize];
    }
}

/// Interleaved bands of `u8` or `u16` samples. Element `b` is band `b`.
#[derive(Clone, Copy, Debug)]
pub struct InterleavedSamples<'a, T> {
    data: &'a [T],
    width: u32,
    height: u32,
    bands: usize,
    scanline_stride: usize,
}

impl<'a, T: Copy + Into<u32>> InterleavedSamples<'a, T> {
    /// `bands` samples per pixel (at most 4), rows `scanline_stride` elements apart.
    pub fn new(
        data: &'a [T],
        width: u32,
        height: u32,
        bands: usize,
        scanline_stride: usize,
    ) -> Result<Self, WebpError> {
        if bands == 0 || bands > 4 {
            return Err(WebpError::InvalidArgument(alloc::format!(
                "{bands} bands per pixel, expected 1..=4"
            )));
        }
        check_extent(data.len(), width, height, scanline_stride, bands, bands)?;
        Ok(Self {
            data,
            width,
            height,
            bands,
            scanline_stride,
        })
    }
}

impl<T: Copy + Into<u32>> SampleSource for InterleavedSamples<'_, T> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_sample(&self, x: u32, y: u32, sample: &mut Sample) {
        let start = y as usize * self.scanline_stride + x as usize * self.bands;
        let pixel = &self.data[start..start + self.bands];
        for (dst, &src) in sample.0.iter_mut().zip(pixel) {
            *dst = src.into();
        }
    }
}

fn check_extent(
    len: usize,
    width: u32,
    height: u32,
    scanline_stride: usize,
    pixel_stride: usize,
    pixel_len: usize,
) -> Result<(), WebpError> {
    if width == 0 || height == 0 {
        return Ok(());
    }
    let needed = (height as usize - 1)
        .checked_mul(scanline_stride)
        .and_then(|v| v.checked_add((width as usize - 1).checked_mul(pixel_stride)?))
        .and_then(|v| v.checked_add(pixel_len))
        .ok_or(WebpError::DimensionsTooLarge { width, height })?;
    if len < needed {
        return Err(WebpError::BufferTooSmall {
            needed,
            actual: len,
        });
    }
    Ok(())
}

// ── Color models ─────────────────────────────────────────────────────

/// Channels selected by bit masks from element 0, scaled to 8 bits.
///
/// Unlike the packed fast path, channels narrower or wider than 8 bits are
/// rescaled, so RGB565 or 10-bit layouts come out in the full 0..=255 range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectColorModel {
    masks: ChannelMasks,
    shifts: [u32; 4],
    bits: [u32; 4],
}

impl DirectColorModel {
    pub fn new(masks: ChannelMasks) -> Result<Self, WebpError> {
        masks.validate(masks.has_alpha())?;
        let all = [masks.red, masks.green, masks.blue, masks.alpha];
        let shifts = all.map(|m| if m == 0 { 0 } else { shift_of(m) });
        let bits = all.map(u32::count_ones);
        Ok(Self {
            masks,
            shifts,
            bits,
        })
    }

    pub fn masks(&self) -> ChannelMasks {
        self.masks
    }

    #[inline]
    fn channel(&self, word: u32, mask: u32, index: usize) -> u8 {
        scale_to_u8((word & mask) >> self.shifts[index], self.bits[index])
    }
}

impl ColorModel for DirectColorModel {
    fn red(&self, sample: &Sample) -> u8 {
        self.channel(sample.0[0], self.masks.red, 0)
    }

    fn green(&self, sample: &Sample) -> u8 {
        self.channel(sample.0[0], self.masks.green, 1)
    }

    fn blue(&self, sample: &Sample) -> u8 {
        self.channel(sample.0[0], self.masks.blue, 2)
    }

    fn alpha(&self, sample: &Sample) -> u8 {
        if self.masks.alpha == 0 {
            255
        } else {
            self.channel(sample.0[0], self.masks.alpha, 3)
        }
    }

    fn has_alpha(&self) -> bool {
        self.masks.has_alpha()
    }
}

/// Rescale an unsigned `bits`-wide value to 0..=255, rounding to nearest.
#[inline]
fn scale_to_u8(value: u32, bits: u32) -> u8 {
    match bits {
        0 => 0,
        8 => value as u8,
        b if b > 8 => (value >> (b - 8)) as u8,
        b => {
            let max = (1u32 << b) - 1;
            ((value * 255 + max / 2) / max) as u8
        }
    }
}

/// Palette lookup on element 0. Indices past the palette read as transparent black.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedColorModel {
    palette: Vec<[u8; 4]>,
    has_alpha: bool,
}

impl IndexedColorModel {
    /// Palette entries are `[r, g, b, a]`.
    pub fn new(palette: Vec<[u8; 4]>) -> Self {
        let has_alpha = palette.iter().any(|entry| entry[3] != 255);
        Self { palette, has_alpha }
    }

    #[inline]
    fn entry(&self, sample: &Sample) -> [u8; 4] {
        self.palette
            .get(sample.0[0] as usize)
            .copied()
            .unwrap_or([0; 4])
    }
}

impl ColorModel for IndexedColorModel {
    fn red(&self, sample: &Sample) -> u8 {
        self.entry(sample)[0]
    }

    fn green(&self, sample: &Sample) -> u8 {
        self.entry(sample)[1]
    }

    fn blue(&self, sample: &Sample) -> u8 {
        self.entry(sample)[2]
    }

    fn alpha(&self, sample: &Sample) -> u8 {
        self.entry(sample)[3]
    }

    fn has_alpha(&self) -> bool {
        self.has_alpha
    }
}

/// Gray in element 0, optional alpha in element 1, both `bits` wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrayColorModel {
    bits: u32,
    alpha: bool,
}

impl GrayColorModel {
    pub fn new(bits: u32, alpha: bool) -> Result<Self, WebpError> {
        if bits == 0 || bits > 16 {
            return Err(WebpError::InvalidArgument(alloc::format!(
                "gray depth {bits} not in 1..=16"
            )));
        }
        Ok(Self { bits, alpha })
    }

    pub fn gray8() -> Self {
        Self {
            bits: 8,
            alpha: false,
        }
    }

    pub fn gray16() -> Self {
        Self {
            bits: 16,
            alpha: false,
        }
    }

    #[inline]
    fn level(&self, value: u32) -> u8 {
        let max = (1u32 << self.bits) - 1;
        let value = value.min(max);
        if self.bits == 8 {
            value as u8
        } else {
            ((u64::from(value) * 255 + u64::from(max / 2)) / u64::from(max)) as u8
        }
    }
}

impl ColorModel for GrayColorModel {
    fn red(&self, sample: &Sample) -> u8 {
        self.level(sample.0[0])
    }

    fn green(&self, sample: &Sample) -> u8 {
        self.level(sample.0[0])
    }

    fn blue(&self, sample: &Sample) -> u8 {
        self.level(sample.0[0])
    }

    fn alpha(&self, sample: &Sample) -> u8 {
        if self.alpha {
            self.level(sample.0[1])
        } else {
            255
        }
    }

    fn has_alpha(&self) -> bool {
        self.alpha
    }
}
