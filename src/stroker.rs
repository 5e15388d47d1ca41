// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Halo stroking
//!
//! A halo is the glyph coverage grown outwards by a radius with round caps
//! and joins. This is computed as a morphological dilation of a rastered
//! [`Sprite`] by an anti-aliased disc.

use crate::conv::{from_26dot6, to_26dot6};
use crate::raster::Sprite;
use easy_cast::{Cast, Conv, ConvFloat};

/// Largest supported radius, in pixels
///
/// Larger radii are clamped to this value.
pub const MAX_RADIUS: f64 = 256.0;

/// Grows glyph coverage by a radius
///
/// The radius is held in 26.6 fixed point; the kernel is rebuilt only when
/// [`Stroker::init`] changes it. Obtain via
/// [`crate::fonts::FontEngine::create_stroker`].
#[derive(Clone, Debug)]
pub struct Stroker {
    radius: i32,
    extent: i32,
    /// `(dx, dy, weight)` with `weight > 0`
    kernel: Vec<(i32, i32, f32)>,
}

impl Stroker {
    pub(crate) fn new() -> Self {
        Stroker {
            radius: 0,
            extent: 0,
            kernel: vec![(0, 0, 1.0)],
        }
    }

    /// Set the stroke radius, in pixels
    ///
    /// Negative and non-finite radii are treated as zero; radii above
    /// [`MAX_RADIUS`] are clamped.
    pub fn init(&mut self, radius: f64) {
        let radius = if radius.is_finite() {
            radius.clamp(0.0, MAX_RADIUS)
        } else {
            0.0
        };
        let fixed = to_26dot6(radius);
        if fixed == self.radius {
            return;
        }

        self.radius = fixed;
        let r = from_26dot6(fixed);
        // A source pixel spans ±0.5, so a tap at distance d is reached by the
        // disc if d < r + 1; the weight ramps over the last pixel.
        let extent = i32::conv_ceil(r);
        let side = usize::conv(2 * extent + 1);
        let mut kernel = Vec::with_capacity(side * side);
        for dy in -extent..=extent {
            for dx in -extent..=extent {
                let dist = f64::from(dx * dx + dy * dy).sqrt();
                let weight = (r + 1.0 - dist).clamp(0.0, 1.0) as f32;
                if weight > 0.0 {
                    kernel.push((dx, dy, weight));
                }
            }
        }
        log::trace!("Stroker::init: radius {r}, kernel of {} taps", kernel.len());

        self.extent = extent;
        self.kernel = kernel;
    }

    /// Current radius in pixels (after 26.6 quantization)
    #[inline]
    pub fn radius(&self) -> f64 {
        from_26dot6(self.radius)
    }

    /// Number of pixels by which a stroked sprite grows on each side
    #[inline]
    pub fn extent(&self) -> i32 {
        self.extent
    }

    /// Stroke a coverage sprite
    ///
    /// The result covers every pixel within the radius of some covered pixel
    /// of `sprite`, with anti-aliased edges. It is larger than the input by
    /// [`Self::extent`] on each side; the offset is adjusted to match.
    pub fn stroke(&self, sprite: &Sprite) -> Sprite {
        let e = self.extent;
        let (w, h): (i32, i32) = (sprite.size.0.cast(), sprite.size.1.cast());
        let (out_w, out_h) = (w + 2 * e, h + 2 * e);
        let mut data = vec![0u8; usize::conv(out_w) * usize::conv(out_h)];

        for (x, y, a) in sprite.pixels() {
            let (x, y) = (i32::conv(x) + e, i32::conv(y) + e);
            for &(dx, dy, weight) in &self.kernel {
                let (ox, oy) = (x + dx, y + dy);
                let i = usize::conv(oy) * usize::conv(out_w) + usize::conv(ox);
                let v = u8::conv_nearest(f32::from(a) * weight);
                if v > data[i] {
                    data[i] = v;
                }
            }
        }

        Sprite {
            offset: (sprite.offset.0 - e, sprite.offset.1 - e),
            size: (out_w.cast(), out_h.cast()),
            data,
        }
    }
}
