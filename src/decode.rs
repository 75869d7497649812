use enough::Stop;

use crate::assemble::{Raster, assemble};
use crate::codec::{ByteOrder, WebpCodec, checked_range};
use crate::decoded::DecodedImage;
use crate::error::WebpError;
use crate::info::ImageInfo;
use crate::limits::Limits;
use crate::options::DecoderOptions;

/// Decode a WebP stream into a packed [`Raster`].
///
/// ```no_run
/// # #[cfg(feature = "image-webp")]
/// # {
/// use zenwebpio::{DecodeRequest, ImageWebpCodec, Unstoppable};
///
/// let data: &[u8] = &[]; // your WebP bytes
/// let raster = DecodeRequest::new(data).decode(&ImageWebpCodec::new(), Unstoppable)?;
/// println!("{}x{} alpha={}", raster.width(), raster.height(), raster.has_alpha());
/// # }
/// # Ok::<(), zenwebpio::WebpError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    range: Option<(usize, usize)>,
    options: DecoderOptions,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            range: None,
            options: DecoderOptions::default(),
            limits: None,
        }
    }

    /// Decode only `data[offset..offset + length]`.
    pub fn with_range(mut self, offset: usize, length: usize) -> Self {
        self.range = Some((offset, length));
        self
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// The stream bytes this request covers. Fails if the range overruns the buffer.
    pub fn stream(&self) -> Result<&'a [u8], WebpError> {
        match self.range {
            Some((offset, length)) => checked_range(self.data, offset, length),
            None => Ok(self.data),
        }
    }

    /// Probe, decode and assemble. Nothing is returned on failure.
    pub fn decode<C: WebpCodec>(self, codec: &C, stop: impl Stop) -> Result<Raster, WebpError> {
        let stream = self.stream()?;
        let info = ImageInfo::from_bytes(codec, stream)?;
        let (width, height) = self.options.output_dimensions(info.width, info.height)?;
        if let Some(limits) = self.limits {
            // Backends may decode the full frame before cropping.
            limits.check_image(info.width, info.height, 4)?;
            limits.check_image(width, height, 4)?;
        }

        stop.check()?;

        log::debug!(
            "decoding {}x{} stream to {width}x{height}, {} bytes",
            info.width,
            info.height,
            stream.len()
        );
        let raw = codec.decode(&self.options, stream, ByteOrder::native());

        stop.check()?;

        let decoded = DecodedImage::from_raw(raw)?;
        if (decoded.width, decoded.height) != (width, height) {
            log::warn!(
                "codec returned {}x{}, expected {width}x{height}",
                decoded.width,
                decoded.height
            );
            if let Some(limits) = self.limits {
                limits.check_image(decoded.width, decoded.height, 4)?;
            }
        }
        Ok(assemble(decoded))
    }
}
