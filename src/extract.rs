//! Raster → packed RGB/RGBA bytes.
//!
//! Dispatch happens once per call on the raster's storage kind. Each kind has
//! a loop monomorphized for 3 and 4 output channels, so there is no per-pixel
//! alpha branch. The generic path is the fallback for layouts no fast path
//! understands.

use alloc::vec;

use crate::error::WebpError;
use crate::generic::{ColorModel, Sample, SampleSource};
use crate::mask::{ChannelMasks, shift_of};
use crate::pixel::{PackedBuffer, PixelLayout};
use crate::raster::{Banks, ComponentGeometry, RasterData, RasterDescriptor};

/// A bank element that narrows to one output byte.
pub(crate) trait BankSample: Copy {
    fn low_byte(self) -> u8;
}

impl BankSample for u8 {
    #[inline(always)]
    fn low_byte(self) -> u8 {
        self
    }
}

impl BankSample for u32 {
    /// Truncates. Samples wider than 8 bits wrap instead of saturating.
    #[inline(always)]
    fn low_byte(self) -> u8 {
        self as u8
    }
}

/// Extract packed bytes, with alpha iff `include_alpha`.
pub fn extract(
    raster: &RasterDescriptor<'_>,
    include_alpha: bool,
) -> Result<PackedBuffer, WebpError> {
    if include_alpha {
        extract_rgba(raster)
    } else {
        extract_rgb(raster)
    }
}

/// Extract `width * height * 3` bytes in R,G,B order. Never reads alpha.
pub fn extract_rgb(raster: &RasterDescriptor<'_>) -> Result<PackedBuffer, WebpError> {
    extract_channels::<3>(raster)
}

/// Extract `width * height * 4` bytes in R,G,B,A order.
pub fn extract_rgba(raster: &RasterDescriptor<'_>) -> Result<PackedBuffer, WebpError> {
    extract_channels::<4>(raster)
}

fn extract_channels<const N: usize>(
    raster: &RasterDescriptor<'_>,
) -> Result<PackedBuffer, WebpError> {
    let with_alpha = N == 4;
    raster.validate(with_alpha)?;

    let (width, height) = (raster.width, raster.height);
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(N))
        .ok_or(WebpError::DimensionsTooLarge { width, height })?;
    let mut out = vec![0u8; len];
    log::debug!(
        "extracting {width}x{height} {:?} raster to {N} channels",
        raster.kind()
    );
    log::trace!("source layout {:?}", raster.data());

    if len > 0 {
        let w = width as usize;
        match *raster.data() {
            RasterData::ComponentByte { banks, ref geometry } => {
                component::<u8, N>(&mut out, w, banks, geometry)?
            }
            RasterData::ComponentInt { banks, ref geometry } => {
                component::<u32, N>(&mut out, w, banks, geometry)?
            }
            RasterData::PackedInt {
                data,
                masks,
                scanline_stride,
            } => packed::<N>(&mut out, w, data, &masks, scanline_stride),
            RasterData::Generic { source, model } => generic::<N>(&mut out, w, source, model),
        }
    }

    Ok(PackedBuffer::new(
        out,
        width,
        height,
        PixelLayout::from_alpha(with_alpha),
    ))
}

/// Per-band bank lookup, R,G,B[,A].
fn band_planes<'a, T, const N: usize>(
    banks: Banks<'a, T>,
    geometry: &ComponentGeometry,
) -> Result<[&'a [T]; N], WebpError> {
    let mut planes: [&'a [T]; N] = [&[]; N];
    for (band, plane) in planes.iter_mut().enumerate() {
        let bank = geometry.bank_indices[band];
        *plane = banks.get(bank).ok_or_else(|| {
            WebpError::IncompatibleFormat(alloc::format!(
                "band {band} refers to missing bank {bank}"
            ))
        })?;
    }
    Ok(planes)
}

fn component<T: BankSample, const N: usize>(
    out: &mut [u8],
    width: usize,
    banks: Banks<'_, T>,
    geometry: &ComponentGeometry,
) -> Result<(), WebpError> {
    let planes = band_planes::<T, N>(banks, geometry)?;
    let offsets: [usize; N] = core::array::from_fn(|band| geometry.band_offsets[band]);

    // Every index is within the extent `validate` proved; never step past it.
    for (y, row) in out.chunks_exact_mut(width * N).enumerate() {
        let row_base = y * geometry.scanline_stride;
        for (x, px) in row.chunks_exact_mut(N).enumerate() {
            let pix_base = row_base + x * geometry.pixel_stride;
            for band in 0..N {
                px[band] = planes[band][pix_base + offsets[band]].low_byte();
            }
        }
    }
    Ok(())
}

fn packed<const N: usize>(
    out: &mut [u8],
    width: usize,
    data: &[u32],
    masks: &ChannelMasks,
    scanline_stride: usize,
) {
    let all = [masks.red, masks.green, masks.blue, masks.alpha];
    let masks: [u32; N] = core::array::from_fn(|c| all[c]);
    // Only the first N masks are shifted; a zero alpha mask is never touched on the RGB path.
    let shifts: [u32; N] = core::array::from_fn(|c| shift_of(all[c]));

    for (y, row) in out.chunks_exact_mut(width * N).enumerate() {
        let start = y * scanline_stride;
        let words = &data[start..start + width];
        for (px, &word) in row.chunks_exact_mut(N).zip(words) {
            for c in 0..N {
                px[c] = ((word & masks[c]) >> shifts[c]) as u8;
            }
        }
    }
}

fn generic<const N: usize>(
    out: &mut [u8],
    width: usize,
    source: &dyn SampleSource,
    model: &dyn ColorModel,
) {
    let mut sample = Sample::default();
    for (y, row) in out.chunks_exact_mut(width * N).enumerate() {
        for (x, px) in row.chunks_exact_mut(N).enumerate() {
            source.read_sample(x as u32, y as u32, &mut sample);
            px[0] = model.red(&sample);
            px[1] = model.green(&sample);
            px[2] = model.blue(&sample);
            if N == 4 {
                px[3] = model.alpha(&sample);
            }
        }
    }
}
