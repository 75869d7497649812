use alloc::string::String;
use enough::StopReason;

/// Errors from raster extraction, WebP decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WebpError {
    #[error("incompatible image: {0}")]
    IncompatibleFormat(String),

    #[error("codec ran out of memory")]
    ResourceExhausted,

    #[error("decode returned status {status}")]
    DecodeFailed { status: i32 },

    #[error("invalid WebP data")]
    InvalidStreamData,

    #[error("encode failed: {0}")]
    EncodeFailed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("buffer too small: need {needed} elements, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for WebpError {
    fn from(r: StopReason) -> Self {
        WebpError::Cancelled(r)
    }
}
