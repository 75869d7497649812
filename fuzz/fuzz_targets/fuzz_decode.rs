#![no_main]
use libfuzzer_sys::fuzz_target;
use zenwebpio::*;

fuzz_target!(|data: &[u8]| {
    let codec = ImageWebpCodec::new();

    // Probe and decode must never panic
    let _ = ImageInfo::from_bytes(&codec, data);
    let Ok(raster) = DecodeRequest::new(data).decode(&codec, enough::Unstoppable) else {
        return;
    };

    // Whatever decodes must extract back out at the advertised size
    let channels = if raster.has_alpha() { 4 } else { 3 };
    let packed = extract(&raster.as_descriptor(), raster.has_alpha()).unwrap();
    assert_eq!(
        packed.as_bytes().len(),
        raster.width() as usize * raster.height() as usize * channels
    );
});
