use alloc::vec::Vec;

use enough::Stop;

use crate::codec::WebpCodec;
use crate::error::WebpError;
use crate::extract::extract;
use crate::limits::Limits;
use crate::options::EncoderOptions;
use crate::raster::RasterDescriptor;

/// Compress a raster to a WebP stream.
///
/// Alpha is encoded iff the raster declares it. Pixels are extracted to tight
/// RGB or RGBA rows first, so row padding and band order in the source never
/// reach the codec.
#[derive(Clone, Debug, Default)]
pub struct EncodeRequest<'a> {
    options: EncoderOptions,
    limits: Option<&'a Limits>,
}

impl<'a> EncodeRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lossless with default effort.
    pub fn lossless() -> Self {
        Self::new().with_options(EncoderOptions::lossless())
    }

    pub fn with_options(mut self, options: EncoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn encode<C: WebpCodec>(
        self,
        codec: &C,
        raster: &RasterDescriptor<'_>,
        stop: impl Stop,
    ) -> Result<Vec<u8>, WebpError> {
        self.options.validate()?;
        let (width, height) = (raster.width, raster.height);
        if width == 0 || height == 0 {
            return Err(WebpError::InvalidArgument(alloc::format!(
                "cannot encode a {width}x{height} image"
            )));
        }

        let with_alpha = raster.has_alpha();
        let channels = if with_alpha { 4 } else { 3 };
        if let Some(limits) = self.limits {
            limits.check_image(width, height, channels)?;
        }

        stop.check()?;

        let packed = extract(raster, with_alpha)?;

        stop.check()?;

        let stride = packed.stride();
        log::debug!(
            "encoding {width}x{height} {:?}, lossless={}",
            packed.layout,
            self.options.lossless
        );
        codec
            .encode(
                &self.options,
                packed.as_bytes(),
                packed.layout,
                width,
                height,
                stride,
            )
            .ok_or_else(|| {
                WebpError::EncodeFailed(alloc::format!(
                    "codec rejected {width}x{height} {:?} input",
                    packed.layout
                ))
            })
    }
}
