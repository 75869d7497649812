//! # zenwebpio
//!
//! Pixel-format bridge between in-memory rasters and a WebP codec.
//!
//! The codec speaks exactly two formats: tightly packed 8-bit RGB/RGBA bytes on
//! the way in, and one packed 32-bit word per pixel (`0xAARRGGBB`, or
//! `0x00RRGGBB` when opaque) on the way out. This crate does the conversions on
//! either side of that boundary:
//!
//! - [`extract`] turns any [`RasterDescriptor`] (interleaved or planar bytes,
//!   32-bit components, packed words under arbitrary masks, or a generic
//!   [`SampleSource`] + [`ColorModel`]) into a [`PackedBuffer`].
//! - [`assemble`] wraps a decoded pixel buffer as a [`Raster`] without copying.
//!
//! The codec itself sits behind the [`WebpCodec`] trait. The `image-webp`
//! feature (on by default) provides [`ImageWebpCodec`].
//!
//! ## Usage
//!
//! ```no_run
//! # #[cfg(feature = "image-webp")]
//! # {
//! use zenwebpio::{
//!     DecodeRequest, EncodeRequest, ImageInfo, ImageWebpCodec, RasterDescriptor, Unstoppable,
//! };
//!
//! let codec = ImageWebpCodec::new();
//! let rgba = vec![255u8; 64 * 64 * 4];
//!
//! // Encode an interleaved RGBA buffer losslessly
//! let raster = RasterDescriptor::rgba8(&rgba, 64, 64);
//! let webp = EncodeRequest::lossless().encode(&codec, &raster, Unstoppable)?;
//!
//! // Probe without decoding
//! let info = ImageInfo::probe(&codec, &webp, 0, webp.len())?;
//! assert_eq!((info.width, info.height), (64, 64));
//!
//! // Decode to packed ARGB words
//! let decoded = DecodeRequest::new(&webp).decode(&codec, Unstoppable)?;
//! assert_eq!(decoded.to_rgba8(), rgba);
//! # }
//! # Ok::<(), zenwebpio::WebpError>(())
//! ```
//!
//! ## Non-Goals
//!
//! - Color management, gamma, premultiplication
//! - Sample depths above 8 bits on the encode path (wider samples truncate)
//! - Animation and metadata

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod assemble;
mod codec;
mod decode;
mod decoded;
mod encode;
mod error;
mod extract;
mod generic;
mod info;
mod limits;
mod mask;
mod options;
mod pixel;
mod raster;

#[cfg(feature = "image-webp")]
mod image_webp;

// Re-exports
pub use assemble::{Raster, assemble, assemble_raw};
pub use codec::{ByteOrder, CodecStatus, RawDecode, WebpCodec, checked_range};
pub use decode::DecodeRequest;
pub use decoded::DecodedImage;
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::WebpError;
pub use extract::{extract, extract_rgb, extract_rgba};
pub use generic::{
    ColorModel, DirectColorModel, GrayColorModel, IndexedColorModel, InterleavedSamples,
    PackedSamples, Sample, SampleSource,
};
pub use info::ImageInfo;
pub use limits::Limits;
pub use mask::{ChannelMasks, is_contiguous, shift_of};
pub use options::{CompressionType, CropRect, DecoderOptions, EncoderOptions};
pub use pixel::{PackedBuffer, PixelLayout};
pub use raster::{Banks, ComponentGeometry, RasterData, RasterDescriptor, StorageKind};

#[cfg(feature = "image-webp")]
pub use crate::image_webp::ImageWebpCodec;
