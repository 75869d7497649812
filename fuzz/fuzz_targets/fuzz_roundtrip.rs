#![no_main]
use libfuzzer_sys::fuzz_target;
use zenwebpio::*;

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the size, the rest are packed ARGB words
    let [w, pad, rest @ ..] = data else { return };
    let width = u32::from(*w % 64) + 1;
    let stride = width as usize + usize::from(*pad % 4);
    let words: Vec<u32> = rest
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    let height = (words.len() / stride) as u32;
    if height == 0 {
        return;
    }

    let codec = ImageWebpCodec::new();
    let source = RasterDescriptor::packed(width, height, &words, ChannelMasks::ARGB32, stride);
    let Ok(webp) = EncodeRequest::lossless().encode(&codec, &source, enough::Unstoppable) else {
        return;
    };
    let Ok(raster) = DecodeRequest::new(&webp).decode(&codec, enough::Unstoppable) else {
        panic!("encoded stream failed to decode");
    };

    let expected = extract_rgba(&source).unwrap();
    assert_eq!(expected.as_bytes(), &raster.to_rgba8()[..], "roundtrip pixel mismatch");
});
