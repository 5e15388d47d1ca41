// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Simple data types

use easy_cast::Cast;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Glyph identifier within a font face
///
/// `GlyphId(0)` is the "missing glyph" (`.notdef`) which every TrueType and
/// OpenType face is required to provide.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct GlyphId(pub u16);

impl GlyphId {
    /// The missing glyph
    pub const MISSING: GlyphId = GlyphId(0);

    /// True if this is the missing glyph
    #[inline]
    pub fn is_missing(self) -> bool {
        self.0 == 0
    }
}

impl From<GlyphId> for ab_glyph::GlyphId {
    #[inline]
    fn from(id: GlyphId) -> Self {
        ab_glyph::GlyphId(id.0)
    }
}

/// 2D vector (position or offset) in pixels
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2(pub f64, pub f64);

impl Vec2 {
    /// Zero
    pub const ZERO: Vec2 = Vec2(0.0, 0.0);
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 - rhs.0, self.1 - rhs.1)
    }
}

/// Axis-aligned bounding box
///
/// Coordinates follow the convention of whoever produced the box; glyph boxes
/// from [`crate::TextRenderer::prepare_glyphs`] are y-up and relative to the
/// text path origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Construct from corner coordinates
    #[inline]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect {
            min: Vec2(x0.min(x1), y0.min(y1)),
            max: Vec2(x0.max(x1), y0.max(y1)),
        }
    }

    /// Width
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.0 - self.min.0
    }

    /// Height
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.1 - self.min.1
    }

    /// Smallest box containing both `self` and `rhs`
    #[inline]
    pub fn union(&self, rhs: &Rect) -> Rect {
        Rect {
            min: Vec2(self.min.0.min(rhs.min.0), self.min.1.min(rhs.min.1)),
            max: Vec2(self.max.0.max(rhs.max.0), self.max.1.max(rhs.max.1)),
        }
    }
}

/// An RGBA colour (straight alpha)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fully transparent
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Construct an opaque colour
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Construct from components
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Pack as `0xAABBGGRR`
    #[inline]
    pub fn to_u32(self) -> u32 {
        u32::from(self.a) << 24 | u32::from(self.b) << 16 | u32::from(self.g) << 8 | u32::from(self.r)
    }

    /// Unpack from `0xAABBGGRR`
    #[inline]
    pub fn from_u32(v: u32) -> Self {
        Color {
            r: (v & 0xFF).cast(),
            g: ((v >> 8) & 0xFF).cast(),
            b: ((v >> 16) & 0xFF).cast(),
            a: (v >> 24).cast(),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
