// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text shaping
//!
//! To quote the HarfBuzz manual:
//!
//! > Text shaping is the process of translating a string of character codes
//! > (such as Unicode codepoints) into a properly arranged sequence of glyphs
//! > that can be rendered onto a screen or into final output form for
//! > inclusion in a document.
//!
//! Input text is first split into level runs by the Unicode Bidirectional
//! Algorithm (TR9), yielded in visual order. Each run is then shaped:
//!
//! -   with the `rustybuzz` feature, the run is split further into segments
//!     resolved by the same face of the [`FontFaceSet`] and each segment is
//!     shaped by rustybuzz in the run's direction (joining forms, mirroring)
//! -   otherwise, characters of right-to-left runs are reversed and mirrored, then each character is
//!     resolved individually
//!
//! This module *does not* perform line-breaking or wrapping.

use crate::fonts::{FontFaceSet, FontGlyph};
use std::ops::Range;
use unicode_bidi::{BidiInfo, Level};

/// A maximal sequence of text at a single embedding level
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LevelRun {
    /// Byte range in the source text
    pub range: Range<usize>,
    pub level: Level,
}

/// A shaped character
#[derive(Clone, Debug)]
pub(crate) struct ShapedChar {
    /// Source character (first of its cluster)
    pub c: char,
    pub glyph: FontGlyph,
    /// Horizontal advance in pixels
    pub advance: f64,
}

/// Split `text` into level runs, in visual order
///
/// Also returns true if the (first paragraph's) base direction is RTL.
pub(crate) fn visual_runs(text: &str) -> (Vec<LevelRun>, bool) {
    let bidi = BidiInfo::new(text, None);
    let rtl = bidi
        .paragraphs
        .first()
        .map(|para| para.level.is_rtl())
        .unwrap_or(false);

    let mut runs = Vec::new();
    for para in &bidi.paragraphs {
        let line = para.range.clone();
        if line.is_empty() {
            continue;
        }
        let (levels, level_runs) = bidi.visual_runs(para, line);
        for range in level_runs {
            let level = levels[range.start];
            runs.push(LevelRun { range, level });
        }
    }

    (runs, rtl)
}

/// Shape a `run` of text
pub(crate) fn shape(faces: &mut FontFaceSet, text: &str, run: &LevelRun) -> Vec<ShapedChar> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "rustybuzz")] {
            shape_rustybuzz(faces, text, run)
        } else {
            shape_simple(faces, text, run)
        }
    }
}

/// Shape without a shaping engine: reverse, mirror and map chars directly
#[cfg(not(feature = "rustybuzz"))]
fn shape_simple(faces: &mut FontFaceSet, text: &str, run: &LevelRun) -> Vec<ShapedChar> {
    let slice = &text[run.range.clone()];
    let chars: Vec<char> = if run.level.is_rtl() {
        slice
            .chars()
            .rev()
            .map(|c| unicode_bidi_mirroring::get_mirrored(c).unwrap_or(c))
            .collect()
    } else {
        slice.chars().collect()
    };

    let mut glyphs = Vec::with_capacity(chars.len());
    for c in chars {
        let Some(glyph) = faces.get_glyph(c) else {
            break;
        };
        let advance = faces.character_dimensions(c).width;
        glyphs.push(ShapedChar { c, glyph, advance });
    }
    glyphs
}

#[cfg(feature = "rustybuzz")]
fn shape_rustybuzz(faces: &mut FontFaceSet, text: &str, run: &LevelRun) -> Vec<ShapedChar> {
    use crate::GlyphId;
    use easy_cast::{Cast, Conv};
    use rustybuzz::{Direction, UnicodeBuffer};
    use smallvec::SmallVec;

    let rtl = run.level.is_rtl();

    // Segments are (face index, byte range) in logical order.
    let mut segments = SmallVec::<[(usize, Range<usize>); 4]>::new();
    for (i, c) in text[run.range.clone()].char_indices() {
        let start = run.range.start + i;
        let end = start + c.len_utf8();
        let face = faces.resolve(c).map(|(index, _)| index).unwrap_or(0);
        match segments.last_mut() {
            Some((f, range)) if *f == face => range.end = end,
            _ => segments.push((face, start..end)),
        }
    }
    if rtl {
        segments.reverse();
    }

    let mut glyphs = Vec::with_capacity(run.range.len());
    for (face_index, range) in segments {
        let Some(face) = faces.faces().get(face_index).cloned() else {
            break;
        };
        let slice = &text[range.clone()];
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(slice);
        buffer.set_direction(match rtl {
            false => Direction::LeftToRight,
            true => Direction::RightToLeft,
        });
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(face.rustybuzz(), &[], buffer);

        let dpu = face.dpu();
        for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
            let index = usize::conv(info.cluster);
            let c = slice
                .get(index..)
                .and_then(|s| s.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            let glyph = FontGlyph::new(face.clone(), GlyphId(info.glyph_id.cast()));
            let advance = dpu.i32_to_px(pos.x_advance);
            glyphs.push(ShapedChar { c, glyph, advance });
        }
    }
    glyphs
}
