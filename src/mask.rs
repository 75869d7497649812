//! Channel bit masks for one-word-per-pixel layouts.

use crate::error::WebpError;

/// Index of the lowest set bit of `mask`, found by scanning up from bit 0.
///
/// `mask` must be non-zero. A zero mask has no set bit; the scan stops at 32
/// (and trips a debug assertion) instead of looping forever, so callers must
/// reject zero masks first. The no-alpha extraction paths never call this on
/// the alpha mask.
#[inline]
pub fn shift_of(mask: u32) -> u32 {
    debug_assert_ne!(mask, 0, "shift_of called with a zero mask");
    let mut shift = 0;
    while shift < 32 && (mask >> shift) & 1 == 0 {
        shift += 1;
    }
    shift
}

/// Whether the set bits of `mask` form one unbroken run.
#[inline]
pub fn is_contiguous(mask: u32) -> bool {
    if mask == 0 {
        return false;
    }
    let aligned = mask >> mask.trailing_zeros();
    aligned & aligned.wrapping_add(1) == 0
}

/// Red/green/blue/alpha masks of a packed 32-bit pixel word.
///
/// An alpha mask of zero means the layout is opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
}

impl ChannelMasks {
    /// `0xAARRGGBB`, the layout produced by the decoder with alpha.
    pub const ARGB32: Self = Self {
        red: 0x00ff_0000,
        green: 0x0000_ff00,
        blue: 0x0000_00ff,
        alpha: 0xff00_0000,
    };

    /// `0x00RRGGBB`, the opaque layout produced by the decoder without alpha.
    pub const RGB24: Self = Self {
        red: 0x00ff_0000,
        green: 0x0000_ff00,
        blue: 0x0000_00ff,
        alpha: 0,
    };

    /// `0xAABBGGRR`, a packed RGBA word read on a little-endian host.
    pub const ABGR32: Self = Self {
        red: 0x0000_00ff,
        green: 0x0000_ff00,
        blue: 0x00ff_0000,
        alpha: 0xff00_0000,
    };

    pub const fn new(red: u32, green: u32, blue: u32, alpha: u32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha != 0
    }

    /// Reject masks that the packed extraction path cannot shift.
    ///
    /// Color masks must be non-zero and contiguous. The alpha mask is only
    /// checked when `with_alpha` is set.
    pub fn validate(&self, with_alpha: bool) -> Result<(), WebpError> {
        let named = [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ];
        let checked = if with_alpha { 4 } else { 3 };
        for (name, mask) in named.into_iter().take(checked) {
            if mask == 0 {
                return Err(WebpError::IncompatibleFormat(alloc::format!(
                    "{name} mask is zero"
                )));
            }
            if !is_contiguous(mask) {
                return Err(WebpError::IncompatibleFormat(alloc::format!(
                    "{name} mask {mask:#010x} is not contiguous"
                )));
            }
        }
        Ok(())
    }
}
