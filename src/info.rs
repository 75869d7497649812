use crate::codec::{WebpCodec, checked_range};
use crate::error::WebpError;

/// Image dimensions read from a bitstream header without decoding pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    /// Probe `data[offset..offset + length]`.
    ///
    /// The range is checked before the codec sees any byte.
    pub fn probe<C: WebpCodec>(
        codec: &C,
        data: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<Self, WebpError> {
        let stream = checked_range(data, offset, length)?;
        Self::from_bytes(codec, stream)
    }

    /// Probe a whole buffer.
    pub fn from_bytes<C: WebpCodec>(codec: &C, data: &[u8]) -> Result<Self, WebpError> {
        let (width, height) = codec.probe(data).ok_or(WebpError::InvalidStreamData)?;
        log::trace!("probed {width}x{height} from {} bytes", data.len());
        Ok(Self { width, height })
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}
