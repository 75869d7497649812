use crate::error::WebpError;

/// Resource limits for decode/encode operations.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for a pixel buffer allocation.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), WebpError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(WebpError::LimitExceeded(alloc::format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(WebpError::LimitExceeded(alloc::format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(WebpError::LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), WebpError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(WebpError::LimitExceeded(alloc::format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }

    /// Dimension and memory check for a buffer of `bytes_per_pixel`-sized pixels.
    pub(crate) fn check_image(
        &self,
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
    ) -> Result<(), WebpError> {
        self.check(width, height)?;
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(bytes_per_pixel))
            .ok_or(WebpError::DimensionsTooLarge { width, height })?;
        self.check_memory(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_by_default() {
        let limits = Limits::default();
        assert!(limits.check_image(100_000, 100_000, 4).is_ok());
    }

    #[test]
    fn pixel_limit() {
        let limits = Limits {
            max_pixels: Some(100),
            ..Default::default()
        };
        assert!(limits.check(10, 10).is_ok());
        assert!(matches!(
            limits.check(10, 11),
            Err(WebpError::LimitExceeded(_))
        ));
    }

    #[test]
    fn memory_limit_counts_bytes_per_pixel() {
        let limits = Limits {
            max_memory_bytes: Some(400),
            ..Default::default()
        };
        assert!(limits.check_image(10, 10, 4).is_ok());
        assert!(limits.check_image(10, 10, 3).is_ok());
        assert!(limits.check_image(11, 10, 4).is_err());
    }
}
