//! Pure-Rust codec backend over the `image-webp` crate.
//!
//! Decoding supports every WebP flavor `image-webp` reads. Encoding is
//! lossless only; lossy requests fail rather than being encoded losslessly.
//! Cropping is applied after a full decode. Scaling is reported as an
//! unsupported feature.

use std::io::Cursor;

use alloc::vec::Vec;

use image_webp::{ColorType, DecodingError, WebPDecoder, WebPEncoder};

use crate::codec::{ByteOrder, CodecStatus, RawDecode, WebpCodec};
use crate::options::{DecoderOptions, EncoderOptions};
use crate::pixel::PixelLayout;

/// [`WebpCodec`] implemented with `image-webp`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageWebpCodec {
    _private: (),
}

impl ImageWebpCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

fn status_of(err: &DecodingError) -> CodecStatus {
    let code = match err {
        DecodingError::ImageTooLarge | DecodingError::MemoryLimitExceeded => {
            return CodecStatus::OutOfMemory;
        }
        DecodingError::IoError(_) => CodecStatus::NOT_ENOUGH_DATA,
        DecodingError::UnsupportedFeature(_) => CodecStatus::UNSUPPORTED_FEATURE,
        _ => CodecStatus::BITSTREAM_ERROR,
    };
    CodecStatus::Failure(code)
}

impl WebpCodec for ImageWebpCodec {
    fn probe(&self, data: &[u8]) -> Option<(u32, u32)> {
        WebPDecoder::new(Cursor::new(data))
            .ok()
            .map(|decoder| decoder.dimensions())
    }

    // Words are built as integers, so they read 0xAARRGGBB on any host.
    fn decode(&self, options: &DecoderOptions, data: &[u8], _byte_order: ByteOrder) -> RawDecode {
        let mut decoder = match WebPDecoder::new(Cursor::new(data)) {
            Ok(decoder) => decoder,
            Err(err) => {
                log::debug!("image-webp rejected header: {err}");
                return RawDecode::failed(status_of(&err));
            }
        };
        let (width, height) = decoder.dimensions();
        let has_alpha = decoder.has_alpha();

        let (out_w, out_h) = match options.output_dimensions(width, height) {
            Ok(dims) => dims,
            Err(_) => return RawDecode::failed(CodecStatus::Failure(CodecStatus::INVALID_PARAM)),
        };
        let crop = options.effective_crop();
        let (crop_w, crop_h) = crop.map_or((width, height), |c| (c.width, c.height));
        if (out_w, out_h) != (crop_w, crop_h) {
            log::debug!("image-webp cannot scale {crop_w}x{crop_h} to {out_w}x{out_h}");
            return RawDecode::failed(CodecStatus::Failure(CodecStatus::UNSUPPORTED_FEATURE));
        }

        let Some(size) = decoder.output_buffer_size() else {
            return RawDecode::failed(CodecStatus::OutOfMemory);
        };
        let mut bytes = Vec::new();
        if bytes.try_reserve_exact(size).is_err() {
            return RawDecode::failed(CodecStatus::OutOfMemory);
        }
        bytes.resize(size, 0);
        if let Err(err) = decoder.read_image(&mut bytes) {
            log::debug!("image-webp decode failed: {err}");
            return RawDecode::failed(status_of(&err));
        }

        let channels = if has_alpha { 4 } else { 3 };
        let (left, top) = crop.map_or((0, 0), |c| (c.left as usize, c.top as usize));
        let row_bytes = width as usize * channels;
        let mut pixels = Vec::with_capacity(out_w as usize * out_h as usize);
        for row in bytes.chunks_exact(row_bytes).skip(top).take(out_h as usize) {
            let start = left * channels;
            let cropped = &row[start..start + out_w as usize * channels];
            pixels.extend(cropped.chunks_exact(channels).map(|px| {
                let a = if has_alpha { px[3] } else { 0 };
                u32::from_be_bytes([a, px[0], px[1], px[2]])
            }));
        }

        RawDecode {
            status: CodecStatus::Ok,
            width: out_w,
            height: out_h,
            has_alpha,
            pixels,
        }
    }

    fn encode(
        &self,
        options: &EncoderOptions,
        pixels: &[u8],
        layout: PixelLayout,
        width: u32,
        height: u32,
        stride: usize,
    ) -> Option<Vec<u8>> {
        if !options.lossless {
            log::warn!(
                "image-webp cannot encode lossy (quality {}); use EncoderOptions::lossless()",
                options.quality
            );
            return None;
        }
        let color = match layout {
            PixelLayout::Rgb8 => ColorType::Rgb8,
            PixelLayout::Rgba8 => ColorType::Rgba8,
        };
        let row_bytes = width as usize * layout.bytes_per_pixel();
        if width == 0 || height == 0 || stride < row_bytes {
            return None;
        }
        let needed = (height as usize - 1).checked_mul(stride)?.checked_add(row_bytes)?;
        let src = pixels.get(..needed)?;

        let tight: Vec<u8>;
        let data = if stride == row_bytes {
            src
        } else {
            tight = src
                .chunks(stride)
                .flat_map(|row| &row[..row_bytes])
                .copied()
                .collect();
            &tight[..]
        };

        let mut out = Vec::new();
        match WebPEncoder::new(&mut out).encode(data, width, height, color) {
            Ok(()) => Some(out),
            Err(err) => {
                log::debug!("image-webp encode failed: {err}");
                None
            }
        }
    }
}
