//! The codec boundary.
//!
//! The bitstream codec is opaque: it takes flat buffers and returns flat
//! buffers. Everything on this side of [`WebpCodec`] only shapes its inputs
//! and outputs.

use alloc::vec::Vec;

use crate::error::WebpError;
use crate::options::{DecoderOptions, EncoderOptions};
use crate::pixel::PixelLayout;

/// Decode status reported by a codec.
///
/// Closed so the mapping to [`WebpError`] is checked exhaustively. Raw codes
/// follow libwebp's `VP8StatusCode` numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodecStatus {
    Ok,
    OutOfMemory,
    /// Any other status, with its raw code.
    Failure(i32),
}

impl CodecStatus {
    pub const OK: i32 = 0;
    pub const OUT_OF_MEMORY: i32 = 1;
    pub const INVALID_PARAM: i32 = 2;
    pub const BITSTREAM_ERROR: i32 = 3;
    pub const UNSUPPORTED_FEATURE: i32 = 4;
    pub const SUSPENDED: i32 = 5;
    pub const USER_ABORT: i32 = 6;
    pub const NOT_ENOUGH_DATA: i32 = 7;

    pub fn from_code(code: i32) -> Self {
        match code {
            Self::OK => CodecStatus::Ok,
            Self::OUT_OF_MEMORY => CodecStatus::OutOfMemory,
            other => CodecStatus::Failure(other),
        }
    }

    pub fn code(&self) -> i32 {
        match *self {
            CodecStatus::Ok => Self::OK,
            CodecStatus::OutOfMemory => Self::OUT_OF_MEMORY,
            CodecStatus::Failure(code) => code,
        }
    }

    /// `Ok` passes; out-of-memory is [`WebpError::ResourceExhausted`];
    /// anything else is [`WebpError::DecodeFailed`] with the raw code.
    ///
    /// Decided on the raw code, so `Failure(0)` and `Failure(1)` map like
    /// `Ok` and `OutOfMemory`.
    pub fn into_result(self) -> Result<(), WebpError> {
        match Self::from_code(self.code()) {
            CodecStatus::Ok => Ok(()),
            CodecStatus::OutOfMemory => Err(WebpError::ResourceExhausted),
            CodecStatus::Failure(status) => Err(WebpError::DecodeFailed { status }),
        }
    }
}

/// Host byte order, passed so the codec writes words readable as `0xAARRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Everything a codec decode call returns.
///
/// On success `pixels` holds `width * height` words laid out `0xAARRGGBB`
/// (`0x00RRGGBB` when `has_alpha` is false). On failure nothing but `status`
/// is meaningful.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDecode {
    pub status: CodecStatus,
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
    pub pixels: Vec<u32>,
}

impl RawDecode {
    pub fn failed(status: CodecStatus) -> Self {
        Self {
            status,
            width: 0,
            height: 0,
            has_alpha: false,
            pixels: Vec::new(),
        }
    }
}

/// A WebP bitstream codec.
///
/// Calls are atomic: the caller never looks at partial output.
pub trait WebpCodec {
    /// Dimensions if `data` is a valid stream.
    fn probe(&self, data: &[u8]) -> Option<(u32, u32)>;

    /// Decode to packed 32-bit pixels.
    fn decode(&self, options: &DecoderOptions, data: &[u8], byte_order: ByteOrder) -> RawDecode;

    /// Compress tightly described RGB or RGBA rows. `stride` is in bytes.
    fn encode(
        &self,
        options: &EncoderOptions,
        pixels: &[u8],
        layout: PixelLayout,
        width: u32,
        height: u32,
        stride: usize,
    ) -> Option<Vec<u8>>;
}

impl<C: WebpCodec + ?Sized> WebpCodec for &C {
    fn probe(&self, data: &[u8]) -> Option<(u32, u32)> {
        (**self).probe(data)
    }

    fn decode(&self, options: &DecoderOptions, data: &[u8], byte_order: ByteOrder) -> RawDecode {
        (**self).decode(options, data, byte_order)
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
        (**self).encode(options, pixels, layout, width, height, stride)
    }
}

/// Slice `data[offset..offset + length]`, failing before any read if it doesn't fit.
pub fn checked_range(data: &[u8], offset: usize, length: usize) -> Result<&[u8], WebpError> {
    let end = offset
        .checked_add(length)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| {
            WebpError::InvalidArgument(alloc::format!(
                "offset {offset} + length {length} exceeds buffer of {} bytes",
                data.len()
            ))
        })?;
    Ok(&data[offset..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for code in -1..10 {
            assert_eq!(CodecStatus::from_code(code).code(), code);
        }
        assert_eq!(CodecStatus::from_code(0), CodecStatus::Ok);
        assert_eq!(CodecStatus::from_code(1), CodecStatus::OutOfMemory);
        assert_eq!(CodecStatus::from_code(3), CodecStatus::Failure(3));
    }

    #[test]
    fn status_mapping() {
        assert!(CodecStatus::Ok.into_result().is_ok());
        assert!(matches!(
            CodecStatus::OutOfMemory.into_result(),
            Err(WebpError::ResourceExhausted)
        ));
        assert!(matches!(
            CodecStatus::Failure(CodecStatus::BITSTREAM_ERROR).into_result(),
            Err(WebpError::DecodeFailed { status: 3 })
        ));
    }

    #[test]
    fn raw_failure_codes_map_like_named_statuses() {
        assert!(CodecStatus::Failure(CodecStatus::OK).into_result().is_ok());
        assert!(matches!(
            CodecStatus::Failure(CodecStatus::OUT_OF_MEMORY).into_result(),
            Err(WebpError::ResourceExhausted)
        ));
        assert!(matches!(
            CodecStatus::Failure(-1).into_result(),
            Err(WebpError::DecodeFailed { status: -1 })
        ));
    }

    #[test]
    fn range_past_end_rejected() {
        let data = [0u8; 10];
        assert!(matches!(
            checked_range(&data, 5, 10),
            Err(WebpError::InvalidArgument(_))
        ));
        assert!(checked_range(&data, usize::MAX, 2).is_err());
        assert_eq!(checked_range(&data, 5, 5).unwrap().len(), 5);
        assert!(checked_range(&data, 10, 0).unwrap().is_empty());
    }
}
