// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Type conversion utilities
//!
//! Font data is expressed in *font units* (see [`DPU`]); radii handed to the
//! [`Stroker`](crate::stroker::Stroker) are kept in 26.6 fixed point, i.e.
//! 1/64 pixel steps, so that repeated initialization with the same radius is
//! detected exactly.

use easy_cast::ConvFloat;

/// Number of sub-pixel steps per pixel in 26.6 fixed point
pub const SUBPIXEL_STEPS: i32 = 64;

/// Convert pixels → 26.6 fixed point
///
/// Values are rounded to the nearest step and saturate at the `i32` bounds.
#[inline]
pub fn to_26dot6(px: f64) -> i32 {
    let x = px * f64::from(SUBPIXEL_STEPS);
    i32::try_conv_nearest(x).unwrap_or(if x > 0.0 {
        i32::MAX
    } else if x < 0.0 {
        i32::MIN
    } else {
        0
    })
}

/// Convert 26.6 fixed point → pixels
#[inline]
pub fn from_26dot6(x: i32) -> f64 {
    f64::from(x) / f64::from(SUBPIXEL_STEPS)
}

/// Convert a style's text size to a pixel size suitable for a face
///
/// Negative and non-finite sizes map to 0 (unsized).
#[inline]
pub fn to_pixel_size(size: f64) -> u32 {
    if size.is_finite() && size > 0.0 {
        u32::try_conv_nearest(size).unwrap_or(u32::MAX)
    } else {
        0
    }
}

/// Scale factor: pixels per font unit
///
/// Conversions multiply before dividing so that whole-pixel results (e.g.
/// an ascent of 800 units at 20px per 1000 units) are exact.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DPU {
    /// Pixels per Em
    pub dpem: f64,
    /// Font units per Em
    pub upem: f64,
}

impl DPU {
    /// Construct from a pixel size (pixels per Em) and the face's units per Em
    ///
    /// A non-positive `units_per_em` yields a zero scale.
    #[inline]
    pub fn new(pixel_size: u32, units_per_em: f32) -> Self {
        if units_per_em > 0.0 {
            DPU {
                dpem: f64::from(pixel_size),
                upem: f64::from(units_per_em),
            }
        } else {
            DPU::default()
        }
    }

    /// Scale factor as a single value
    #[inline]
    pub fn factor(self) -> f64 {
        if self.upem > 0.0 {
            self.dpem / self.upem
        } else {
            0.0
        }
    }

    #[inline]
    pub(crate) fn to_px(self, x: f32) -> f64 {
        if self.upem > 0.0 {
            f64::from(x) * self.dpem / self.upem
        } else {
            0.0
        }
    }

    #[cfg(feature = "rustybuzz")]
    #[inline]
    pub(crate) fn i32_to_px(self, x: i32) -> f64 {
        use easy_cast::Conv;
        if self.upem > 0.0 {
            f64::conv(x) * self.dpem / self.upem
        } else {
            0.0
        }
    }
}
