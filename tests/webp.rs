//! Round trips through the `image-webp` backend.
#![cfg(feature = "image-webp")]

use enough::Unstoppable;
use zenwebpio::*;

fn noise_argb(w: usize, h: usize, seed: u32) -> Vec<u32> {
    let mut state = seed;
    (0..w * h)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        })
        .collect()
}

fn checkerboard_rgb(w: usize, h: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * 3;
            let px = if (x + y) % 2 == 0 {
                [255, 0, 128]
            } else {
                [0, 200, 50]
            };
            pixels[off..off + 3].copy_from_slice(&px);
        }
    }
    pixels
}

#[test]
fn lossless_argb_256_roundtrip() {
    let (w, h) = (256, 256);
    let words = noise_argb(w, h, 42);
    let codec = ImageWebpCodec::new();
    let source = RasterDescriptor::packed(w as u32, h as u32, &words, ChannelMasks::ARGB32, w);

    let webp = EncodeRequest::lossless()
        .encode(&codec, &source, Unstoppable)
        .unwrap();
    assert!(webp.starts_with(b"RIFF"));
    assert_eq!(&webp[8..12], b"WEBP");

    let info = ImageInfo::probe(&codec, &webp, 0, webp.len()).unwrap();
    assert_eq!((info.width, info.height), (256, 256));

    let raster = DecodeRequest::new(&webp).decode(&codec, Unstoppable).unwrap();
    assert_eq!((raster.width(), raster.height()), (256, 256));
    assert!(raster.has_alpha());

    let expected = extract_rgba(&source).unwrap();
    let decoded = extract_rgba(&raster.as_descriptor()).unwrap();
    assert_eq!(decoded.as_bytes(), expected.as_bytes());
    assert_eq!(raster.to_rgba8(), expected.into_vec());
}

#[test]
fn lossless_rgb_roundtrip_is_opaque() {
    let (w, h) = (17, 9);
    let rgb = checkerboard_rgb(w, h);
    let codec = ImageWebpCodec::new();
    let webp = EncodeRequest::lossless()
        .encode(&codec, &RasterDescriptor::rgb8(&rgb, w as u32, h as u32), Unstoppable)
        .unwrap();

    let raster = DecodeRequest::new(&webp).decode(&codec, Unstoppable).unwrap();
    assert!(!raster.has_alpha());
    assert_eq!(raster.bits_per_pixel(), 24);
    let back = extract_rgb(&raster.as_descriptor()).unwrap();
    assert_eq!(back.as_bytes(), &rgb[..]);
}

#[test]
fn crop_request() {
    let (w, h) = (8, 8);
    let rgb = checkerboard_rgb(w, h);
    let codec = ImageWebpCodec::new();
    let webp = EncodeRequest::lossless()
        .encode(&codec, &RasterDescriptor::rgb8(&rgb, w as u32, h as u32), Unstoppable)
        .unwrap();

    let raster = DecodeRequest::new(&webp)
        .with_options(DecoderOptions::new().with_crop(3, 2, 4, 3))
        .decode(&codec, Unstoppable)
        .unwrap();
    assert_eq!((raster.width(), raster.height()), (4, 3));
    // Left snaps to 2, so (0, 0) is source (2, 2): an even square.
    assert_eq!(raster.rgba_at(0, 0), Some([255, 0, 128, 255]));
    assert_eq!(raster.rgba_at(1, 0), Some([0, 200, 50, 255]));
}

#[test]
fn truncated_stream_fails() {
    let codec = ImageWebpCodec::new();
    let words = noise_argb(32, 32, 3);
    let webp = EncodeRequest::lossless()
        .encode(
            &codec,
            &RasterDescriptor::packed(32, 32, &words, ChannelMasks::ARGB32, 32),
            Unstoppable,
        )
        .unwrap();

    let result = DecodeRequest::new(&webp)
        .with_range(0, webp.len() / 2)
        .decode(&codec, Unstoppable);
    assert!(matches!(
        result,
        Err(WebpError::DecodeFailed { .. } | WebpError::InvalidStreamData)
    ));
}

#[test]
fn lossy_request_is_not_downgraded() {
    let (w, h) = (64, 64);
    let rgb = checkerboard_rgb(w, h);
    let raster = RasterDescriptor::rgb8(&rgb, w as u32, h as u32);
    let opts = EncoderOptions::new().with_quality(5.0).with_method(0);
    let result = EncodeRequest::new()
        .with_options(opts)
        .encode(&ImageWebpCodec::new(), &raster, Unstoppable);
    assert!(matches!(result, Err(WebpError::EncodeFailed(_))));
}
