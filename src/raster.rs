// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Support for rastering glyphs
//!
//! A glyph is first loaded into a [`GlyphImage`]: its outline scaled to the
//! face's pixel size, rotated and translated into *path space* (pixels, y-up,
//! relative to a text path's origin). The image is then rastered at a screen
//! origin into a grayscale coverage [`Sprite`]:
//!
//! ```
//! use carto_text::raster::Sprite;
//!
//! fn draw(sprite: &Sprite, mut blend: impl FnMut(i32, i32, u8)) {
//!     for (x, y, coverage) in sprite.pixels() {
//!         let x = sprite.offset.0 + x as i32;
//!         let y = sprite.offset.1 + y as i32;
//!         blend(x, y, coverage);
//!     }
//! }
//! ```

use crate::fonts::FontGlyph;
use crate::{Rect, Vec2};
use ab_glyph::{point, OutlineCurve, Point};
use ab_glyph_rasterizer::Rasterizer;
use easy_cast::{Cast, Conv, ConvFloat};

/// A rastered sprite
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    /// Screen position of the top-left pixel
    pub offset: (i32, i32),
    /// Size of the sprite in pixels
    pub size: (u32, u32),
    /// Grayscale image, row major order, length `size.0 * size.1`
    pub data: Vec<u8>,
}

impl Sprite {
    /// Coverage at `(x, y)` relative to the sprite; 0 if out of bounds
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.size.0 || y >= self.size.1 {
            return 0;
        }
        let i = usize::conv(y) * usize::conv(self.size.0) + usize::conv(x);
        self.data.get(i).copied().unwrap_or(0)
    }

    /// Iterate over pixels with non-zero coverage as `(x, y, coverage)`
    ///
    /// Coordinates are relative to the sprite.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, u8)> + '_ {
        let width = usize::conv(self.size.0.max(1));
        self.data
            .iter()
            .enumerate()
            .filter(|(_, a)| **a != 0)
            .map(move |(i, a)| ((i % width).cast(), (i / width).cast(), *a))
    }

    /// True if no pixel has coverage
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|a| *a == 0)
    }
}

/// A glyph outline transformed into path space
///
/// Coordinates are in pixels, y-up, relative to the text path's origin.
#[derive(Clone, Debug, Default)]
pub struct GlyphImage {
    curves: Vec<OutlineCurve>,
}

impl GlyphImage {
    /// Load the outline of `glyph` at its face's current pixel size
    ///
    /// The outline is rotated by `angle` (radians, counter-clockwise) about
    /// the glyph origin, then translated to `pen`. Glyphs without contours
    /// (e.g. spaces) yield an empty image.
    pub fn load(glyph: &FontGlyph, pen: Vec2, angle: f64) -> Self {
        let face = glyph.face();
        let Some(outline) = face.outline(glyph.index()) else {
            return GlyphImage::default();
        };

        let dpu = face.dpu();
        let (sin, cos) = angle.sin_cos();
        let map = |p: Point| {
            let x = dpu.to_px(p.x);
            let y = dpu.to_px(p.y);
            point(
                (pen.0 + x * cos - y * sin) as f32,
                (pen.1 + x * sin + y * cos) as f32,
            )
        };

        let curves = outline
            .curves
            .into_iter()
            .map(|curve| map_curve(curve, map))
            .collect();
        GlyphImage { curves }
    }

    /// True if the image has no contours
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.curves.iter().flat_map(|curve| {
            let (pts, n): ([Point; 4], usize) = match *curve {
                OutlineCurve::Line(a, b) => ([a, b, b, b], 2),
                OutlineCurve::Quad(a, b, c) => ([a, b, c, c], 3),
                OutlineCurve::Cubic(a, b, c, d) => ([a, b, c, d], 4),
            };
            pts.into_iter().take(n)
        })
    }

    /// Exact bounds of all control points (path space)
    fn bounds(&self) -> Option<Rect> {
        let mut points = self.points();
        let first = points.next()?;
        let (mut x0, mut y0) = (first.x, first.y);
        let (mut x1, mut y1) = (x0, y0);
        for p in points {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Rect::new(x0.into(), y0.into(), x1.into(), y1.into()))
    }

    /// Control box on the pixel grid (path space, y-up)
    ///
    /// The bounds of all control points, with minima rounded down and maxima
    /// rounded up. `None` if the image is empty.
    pub fn cbox(&self) -> Option<Rect> {
        let b = self.bounds()?;
        Some(Rect::new(
            b.min.0.floor(),
            b.min.1.floor(),
            b.max.0.ceil(),
            b.max.1.ceil(),
        ))
    }

    /// Raster to a coverage sprite
    ///
    /// `origin` is the screen position of the path origin; path y is flipped
    /// (screen y = `origin.1 - y`). Returns `None` if the image is empty or
    /// rasters to a zero-sized bitmap.
    pub fn rasterize(&self, origin: Vec2) -> Option<Sprite> {
        let bounds = self.bounds()?;
        let left = (origin.0 + bounds.min.0).floor();
        let right = (origin.0 + bounds.max.0).ceil();
        let top = (origin.1 - bounds.max.1).floor();
        let bottom = (origin.1 - bounds.min.1).ceil();

        let size = match (u32::try_conv_trunc(right - left), u32::try_conv_trunc(bottom - top)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                log::debug!("rasterize: zero-sized glyph at {origin:?}");
                return None;
            }
        };
        let offset = (i32::try_conv_trunc(left).ok()?, i32::try_conv_trunc(top).ok()?);

        let (w, h) = (f32::conv(size.0), f32::conv(size.1));
        // Points must stay inside the raster; clamp away float noise.
        let map = |p: Point| {
            let x = (origin.0 + f64::from(p.x) - left) as f32;
            let y = (origin.1 - f64::from(p.y) - top) as f32;
            point(x.clamp(0.0, w), y.clamp(0.0, h))
        };

        let mut raster = Rasterizer::new(usize::conv(size.0), usize::conv(size.1));
        for curve in &self.curves {
            match map_curve(curve.clone(), map) {
                OutlineCurve::Line(a, b) => raster.draw_line(a, b),
                OutlineCurve::Quad(a, b, c) => raster.draw_quad(a, b, c),
                OutlineCurve::Cubic(a, b, c, d) => raster.draw_cubic(a, b, c, d),
            }
        }

        let mut data = vec![0; usize::conv(size.0) * usize::conv(size.1)];
        raster.for_each_pixel_2d(|x, y, c| {
            // Convert to u8 with saturating conversion, rounding down:
            data[usize::conv((y * size.0) + x)] = (c * 256.0) as u8;
        });

        Some(Sprite { offset, size, data })
    }
}

fn map_curve(curve: OutlineCurve, f: impl Fn(Point) -> Point) -> OutlineCurve {
    match curve {
        OutlineCurve::Line(a, b) => OutlineCurve::Line(f(a), f(b)),
        OutlineCurve::Quad(a, b, c) => OutlineCurve::Quad(f(a), f(b), f(c)),
        OutlineCurve::Cubic(a, b, c, d) => OutlineCurve::Cubic(f(a), f(b), f(c), f(d)),
    }
}
