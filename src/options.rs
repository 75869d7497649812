//! Decoder and encoder settings handed to the codec.

use crate::error::WebpError;

/// Crop rectangle applied before scaling, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Decoder settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    pub crop: Option<CropRect>,
    /// Target size after cropping. A zero component keeps the aspect ratio.
    pub scale: Option<(u32, u32)>,
}

impl DecoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crop(mut self, left: u32, top: u32, width: u32, height: u32) -> Self {
        self.crop = Some(CropRect {
            left,
            top,
            width,
            height,
        });
        self
    }

    pub fn with_scale(mut self, width: u32, height: u32) -> Self {
        self.scale = Some((width, height));
        self
    }

    /// Effective crop: left/top snapped down to even, as the decoder does.
    pub fn effective_crop(&self) -> Option<CropRect> {
        self.crop.map(|c| CropRect {
            left: c.left & !1,
            top: c.top & !1,
            ..c
        })
    }

    /// Output size for a `width`x`height` bitstream under these options.
    pub fn output_dimensions(&self, width: u32, height: u32) -> Result<(u32, u32), WebpError> {
        if width == 0 || height == 0 {
            return Err(WebpError::InvalidArgument(alloc::format!(
                "bitstream size {width}x{height}"
            )));
        }
        let (mut w, mut h) = (width, height);

        if let Some(crop) = self.effective_crop() {
            let fits = crop.width > 0
                && crop.height > 0
                && u64::from(crop.left) + u64::from(crop.width) <= u64::from(width)
                && u64::from(crop.top) + u64::from(crop.height) <= u64::from(height);
            if !fits {
                return Err(WebpError::InvalidArgument(alloc::format!(
                    "crop {}x{}+{}+{} outside {width}x{height} frame",
                    crop.width,
                    crop.height,
                    crop.left,
                    crop.top
                )));
            }
            w = crop.width;
            h = crop.height;
        }

        if let Some((sw, sh)) = self.scale {
            (w, h) = scaled_dimensions(w, h, sw, sh).ok_or_else(|| {
                WebpError::InvalidArgument(alloc::format!(
                    "cannot scale {w}x{h} to {sw}x{sh}"
                ))
            })?;
        }
        Ok((w, h))
    }
}

/// Fill in a zero target dimension proportionally, rounding to nearest.
fn scaled_dimensions(src_w: u32, src_h: u32, width: u32, height: u32) -> Option<(u32, u32)> {
    let (src_w, src_h) = (u64::from(src_w), u64::from(src_h));
    let mut w = u64::from(width);
    let mut h = u64::from(height);
    if w == 0 {
        w = (src_w * h + src_h / 2) / src_h;
    }
    if h == 0 {
        h = (src_h * w + src_w / 2) / src_w;
    }
    if w == 0 || h == 0 {
        return None;
    }
    Some((u32::try_from(w).ok()?, u32::try_from(h).ok()?))
}

/// Lossy or lossless compression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompressionType {
    #[default]
    Lossy,
    Lossless,
}

/// Encoder settings.
///
/// A backend that cannot honor a setting fails the encode instead of
/// substituting another mode.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderOptions {
    /// 0..=100. For lossless, effort rather than fidelity.
    pub quality: f32,
    /// Speed/size trade-off, 0 (fast) ..= 6 (small).
    pub method: u8,
    pub lossless: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            quality: 75.0,
            method: 4,
            lossless: false,
        }
    }
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lossless() -> Self {
        Self {
            lossless: true,
            ..Self::default()
        }
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_method(mut self, method: u8) -> Self {
        self.method = method;
        self
    }

    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.lossless = compression == CompressionType::Lossless;
        self
    }

    pub fn compression(&self) -> CompressionType {
        if self.lossless {
            CompressionType::Lossless
        } else {
            CompressionType::Lossy
        }
    }

    /// Reject values outside libwebp's accepted ranges.
    pub fn validate(&self) -> Result<(), WebpError> {
        // NaN is outside every range.
        if !(0.0..=100.0).contains(&self.quality) {
            return Err(WebpError::InvalidArgument(alloc::format!(
                "quality {} not in 0..=100",
                self.quality
            )));
        }
        if self.method > 6 {
            return Err(WebpError::InvalidArgument(alloc::format!(
                "method {} not in 0..=6",
                self.method
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_decode_keeps_size() {
        assert_eq!(DecoderOptions::new().output_dimensions(400, 301).unwrap(), (400, 301));
    }

    #[test]
    fn crop_snaps_to_even_origin() {
        let opts = DecoderOptions::new().with_crop(3, 5, 10, 20);
        let crop = opts.effective_crop().unwrap();
        assert_eq!((crop.left, crop.top), (2, 4));
        assert_eq!(opts.output_dimensions(100, 100).unwrap(), (10, 20));
    }

    #[test]
    fn crop_outside_frame() {
        let opts = DecoderOptions::new().with_crop(0, 0, 101, 10);
        assert!(matches!(
            opts.output_dimensions(100, 100),
            Err(WebpError::InvalidArgument(_))
        ));
        let empty = DecoderOptions::new().with_crop(0, 0, 0, 10);
        assert!(empty.output_dimensions(100, 100).is_err());
    }

    #[test]
    fn proportional_scale() {
        let opts = DecoderOptions::new().with_scale(200, 0);
        assert_eq!(opts.output_dimensions(400, 301).unwrap(), (200, 151));
        let opts = DecoderOptions::new().with_scale(0, 150);
        assert_eq!(opts.output_dimensions(400, 300).unwrap(), (200, 150));
    }

    #[test]
    fn crop_then_scale() {
        let opts = DecoderOptions::new().with_crop(0, 0, 50, 100).with_scale(25, 0);
        assert_eq!(opts.output_dimensions(400, 300).unwrap(), (25, 50));
    }

    #[test]
    fn degenerate_scale_rejected() {
        let opts = DecoderOptions::new().with_scale(0, 0);
        assert!(opts.output_dimensions(10, 10).is_err());
        let opts = DecoderOptions::new().with_scale(1, 0);
        // 1 * 1 / 1000 rounds to zero height
        assert!(opts.output_dimensions(1000, 1).is_err());
    }

    #[test]
    fn encoder_defaults_validate() {
        assert!(EncoderOptions::default().validate().is_ok());
        assert!(EncoderOptions::lossless().validate().is_ok());
        assert_eq!(
            EncoderOptions::lossless().compression(),
            CompressionType::Lossless
        );
    }

    #[test]
    fn encoder_ranges() {
        assert!(EncoderOptions::new().with_quality(100.5).validate().is_err());
        assert!(EncoderOptions::new().with_quality(f32::NAN).validate().is_err());
        assert!(EncoderOptions::new().with_quality(-1.0).validate().is_err());
        assert!(EncoderOptions::new().with_method(7).validate().is_err());
        assert!(EncoderOptions::new().with_method(6).validate().is_ok());
    }
}
