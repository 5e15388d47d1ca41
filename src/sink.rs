// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Pixel sinks: render targets of [`crate::TextRenderer`]

use crate::Color;
use easy_cast::{Conv, ConvFloat};

/// A render target
///
/// Coordinates are in screen pixels (y-down) and may lie outside the target;
/// implementations must ignore such writes.
pub trait PixelSink {
    /// Blend `color` at `(x, y)`
    ///
    /// `coverage` is the glyph coverage (never 0: uncovered pixels are not
    /// passed); `opacity` in `[0, 1]` scales the colour's alpha.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: u8, opacity: f64);

    /// Write a feature identifier at `(x, y)`
    fn set_pixel_id(&mut self, x: i32, y: i32, feature_id: i32);
}

fn index(width: u32, height: u32, x: i32, y: i32) -> Option<usize> {
    let (x, y) = (u32::try_conv(x).ok()?, u32::try_conv(y).ok()?);
    if x >= width || y >= height {
        return None;
    }
    Some(usize::conv(y) * usize::conv(width) + usize::conv(x))
}

/// An RGBA image, one `u32` per pixel (see [`Color::to_u32`])
///
/// Blending is straight-alpha "source over".
#[derive(Clone, Debug, PartialEq)]
pub struct Image32 {
    width: u32,
    height: u32,
    data: Vec<u32>,
}

impl Image32 {
    /// Construct, filled with transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Image32 {
            width,
            height,
            data: vec![0; usize::conv(width) * usize::conv(height)],
        }
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill with a colour
    pub fn fill(&mut self, color: Color) {
        let v = color.to_u32();
        self.data.iter_mut().for_each(|p| *p = v);
    }

    /// Get a pixel; `None` if out of bounds
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let i = index(self.width, self.height, x, y)?;
        Some(Color::from_u32(self.data[i]))
    }

    /// Raw pixel data, row major
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }
}

impl PixelSink for Image32 {
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: u8, opacity: f64) {
        let Some(i) = index(self.width, self.height, x, y) else {
            return;
        };

        let opacity = opacity.clamp(0.0, 1.0);
        let sa = f64::from(color.a) / 255.0 * f64::from(coverage) / 255.0 * opacity;
        if !(sa > 0.0) {
            return;
        }

        let dst = Color::from_u32(self.data[i]);
        let da = f64::from(dst.a) / 255.0;
        let oa = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| {
            let c = (f64::from(s) * sa + f64::from(d) * da * (1.0 - sa)) / oa;
            u8::conv_nearest(c.clamp(0.0, 255.0))
        };

        let out = Color::rgba(
            mix(color.r, dst.r),
            mix(color.g, dst.g),
            mix(color.b, dst.b),
            u8::conv_nearest((oa * 255.0).clamp(0.0, 255.0)),
        );
        self.data[i] = out.to_u32();
    }

    /// Images do not store identifiers
    fn set_pixel_id(&mut self, _: i32, _: i32, _: i32) {}
}

/// A buffer of feature identifiers, for hit-testing
///
/// The last write to a pixel wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdBuffer {
    width: u32,
    height: u32,
    data: Vec<i32>,
}

impl IdBuffer {
    /// Construct, filled with `background`
    pub fn new(width: u32, height: u32, background: i32) -> Self {
        IdBuffer {
            width,
            height,
            data: vec![background; usize::conv(width) * usize::conv(height)],
        }
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the identifier at a pixel; `None` if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<i32> {
        index(self.width, self.height, x, y).map(|i| self.data[i])
    }

    /// Raw identifiers, row major
    #[inline]
    pub fn data(&self) -> &[i32] {
        &self.data
    }
}

impl PixelSink for IdBuffer {
    /// Colour is ignored
    fn blend_pixel(&mut self, _: i32, _: i32, _: Color, _: u8, _: f64) {}

    fn set_pixel_id(&mut self, x: i32, y: i32, feature_id: i32) {
        if let Some(i) = index(self.width, self.height, x, y) {
            self.data[i] = feature_id;
        }
    }
}
