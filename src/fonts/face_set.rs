// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Fallback chains of font faces

use super::{FacePtr, FontGlyph};
use crate::text::{CharInfo, CharProperties, StringInfo};
use crate::{shaper, GlyphId};
use std::collections::HashMap;

/// Metrics of a character at a face's configured pixel size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimension {
    /// Horizontal advance
    pub width: f64,
    /// `ymax - ymin` of the glyph's pixel box
    pub height: f64,
    /// Distance between baselines
    pub line_spacing: f64,
    /// Bottom of the glyph's pixel box (y-up, relative to the baseline)
    pub ymin: f64,
}

impl Dimension {
    /// Construct from an advance, vertical extents and line spacing
    #[inline]
    pub fn new(width: f64, ymax: f64, ymin: f64, line_spacing: f64) -> Self {
        Dimension {
            width,
            height: ymax - ymin,
            line_spacing,
            ymin,
        }
    }
}

/// An ordered fallback chain of font faces
///
/// Characters are resolved by the first face which has a glyph for them.
///
/// Character dimensions are cached by codepoint. The cache is cleared by
/// [`Self::add`] and [`Self::clear_dimension_cache`] but *not* by
/// [`Self::set_pixel_sizes`]: after changing the size, cached dimensions
/// still reflect the old size until the cache is cleared.
#[derive(Debug, Default)]
pub struct FontFaceSet {
    faces: Vec<FacePtr>,
    dimension_cache: HashMap<char, Dimension>,
}

impl FontFaceSet {
    /// Construct an empty set
    pub fn new() -> Self {
        FontFaceSet::default()
    }

    /// Append a face to the fallback chain
    pub fn add(&mut self, face: FacePtr) {
        self.faces.push(face);
        self.dimension_cache.clear();
    }

    /// Number of faces
    #[inline]
    pub fn size(&self) -> usize {
        self.faces.len()
    }

    /// True if the set has no faces
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Faces in fallback order
    #[inline]
    pub fn faces(&self) -> &[FacePtr] {
        &self.faces
    }

    /// Index of the first face with a glyph for `c`, and that glyph
    pub(crate) fn resolve(&self, c: char) -> Option<(usize, GlyphId)> {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, face)| (i, face.get_char(c)))
            .find(|(_, id)| !id.is_missing())
    }

    /// Resolve a character to a glyph
    ///
    /// Returns the glyph from the first face which maps `c`. If no face does,
    /// the missing glyph of the first face is returned, thus the result is
    /// always renderable. Returns `None` only if the set is empty.
    pub fn get_glyph(&self, c: char) -> Option<FontGlyph> {
        let (face, id) = match self.resolve(c) {
            Some((i, id)) => (&self.faces[i], id),
            None => (self.faces.first()?, GlyphId::MISSING),
        };
        Some(FontGlyph::new(face.clone(), id))
    }

    /// Get metrics of a character
    ///
    /// Metrics are computed at the resolving face's current pixel size and
    /// cached by codepoint. An empty set yields zero metrics.
    pub fn character_dimensions(&mut self, c: char) -> Dimension {
        if let Some(dim) = self.dimension_cache.get(&c) {
            return *dim;
        }

        let Some(glyph) = self.get_glyph(c) else {
            return Dimension::default();
        };
        let face = glyph.face();
        let dpu = face.dpu();

        // Outline bounds are in font units; `bounds.min.y` holds the top edge.
        let (ymax, ymin) = match face.outline(glyph.index()) {
            Some(outline) => (
                dpu.to_px(outline.bounds.min.y).ceil(),
                dpu.to_px(outline.bounds.max.y).floor(),
            ),
            None => (0.0, 0.0),
        };

        let dim = Dimension::new(
            face.h_advance(glyph.index()),
            ymax,
            ymin,
            face.line_spacing(),
        );
        self.dimension_cache.insert(c, dim);
        dim
    }

    /// Drop all cached character dimensions
    #[inline]
    pub fn clear_dimension_cache(&mut self) {
        self.dimension_cache.clear();
    }

    /// Set the pixel size of every face
    ///
    /// Note: cached dimensions are retained (see type documentation).
    pub fn set_pixel_sizes(&self, size: u32) {
        for face in &self.faces {
            face.set_pixel_sizes(size);
        }
    }

    /// Shape and measure `text`, appending to `info`
    ///
    /// Text is reordered according to the Unicode Bidirectional Algorithm and
    /// contextually shaped; characters are appended in visual order, each
    /// tagged with `format`. The dimensions of `info` are grown by the width
    /// and height of `text`, and its direction is set from `text`'s base
    /// direction.
    pub fn get_string_info<'p>(
        &mut self,
        info: &mut StringInfo<'p>,
        text: &str,
        format: Option<&'p CharProperties>,
    ) {
        if self.faces.is_empty() {
            log::debug!("get_string_info: empty face set");
            return;
        }

        let avg_height = self.character_dimensions('X').height;
        let (mut width, mut height) = info.get_dimensions();

        let (runs, rtl) = shaper::visual_runs(text);
        for run in &runs {
            for shaped in shaper::shape(self, text, run) {
                let dim = self.character_dimensions(shaped.c);
                info.add_info(CharInfo {
                    c: shaped.c,
                    glyph: shaped.glyph,
                    width: shaped.advance,
                    height: dim.height,
                    ymin: dim.ymin,
                    avg_height,
                    line_spacing: dim.line_spacing,
                    format,
                });
                width += shaped.advance;
                height = height.max(dim.height);
            }
        }

        info.set_dimensions(width, height);
        if rtl {
            info.set_rtl(true);
        }
    }
}
