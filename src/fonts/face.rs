// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font face types

use super::FontError;
use crate::conv::DPU;
use crate::GlyphId;
use ab_glyph::{Font, FontVec, Outline};
use std::cell::Cell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// Shared handle to a loaded [`FontFace`]
///
/// A face may be referenced by a [`super::FaceManager`] cache and by any
/// number of [`super::FontFaceSet`]s; it is released with its last handle.
pub type FacePtr = Rc<FontFace>;

/// Read family and style names from a parsed face
///
/// Both must be present: a face without names cannot be registered.
pub(crate) fn read_names(face: &ttf_parser::Face) -> Option<(String, String)> {
    use ttf_parser::name_id;

    let find = |id: u16| {
        face.names()
            .into_iter()
            .filter(|name| name.name_id == id)
            .find_map(|name| name.to_string())
    };

    let family = find(name_id::FAMILY)?;
    let style = find(name_id::SUBFAMILY)?;
    Some((family, style))
}

/// A loaded font face
///
/// The face owns its font data. Family and style names are read once at load
/// time. The pixel size is configured through [`FontFace::set_pixel_sizes`]
/// and applies to every user of the face.
pub struct FontFace {
    // Borrows the data owned by `font`, so must be declared (dropped) first
    #[cfg(feature = "rustybuzz")]
    rustybuzz: rustybuzz::Face<'static>,
    font: FontVec,
    index: u32,
    family: String,
    style: String,
    pixel_size: Cell<u32>,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("style", &self.style)
            .field("index", &self.index)
            .field("pixel_size", &self.pixel_size.get())
            .finish()
    }
}

impl FontFace {
    /// Load face `index` from a font file
    pub fn from_file(path: &Path, index: u32) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        Self::from_vec(data, index)
    }

    /// Load face `index` from font data
    pub fn from_vec(data: Vec<u8>, index: u32) -> Result<Self, FontError> {
        let (family, style) = {
            let face = ttf_parser::Face::parse(&data, index)?;
            read_names(&face).ok_or(FontError::MissingNames)?
        };
        let font = FontVec::try_from_vec_and_index(data, index)?;

        #[cfg(feature = "rustybuzz")]
        let rustybuzz = {
            // Safety: the slice is the heap buffer owned by `font`. It is
            // never mutated and outlives `rustybuzz`, which is dropped first.
            let data = unsafe { extend_lifetime(font.as_slice()) };
            rustybuzz::Face::from_face(ttf_parser::Face::parse(data, index)?)
        };

        Ok(FontFace {
            #[cfg(feature = "rustybuzz")]
            rustybuzz,
            font,
            index,
            family,
            style,
            pixel_size: Cell::new(0),
        })
    }

    /// Family name, e.g. "DejaVu Sans"
    #[inline]
    pub fn family_name(&self) -> &str {
        &self.family
    }

    /// Style name, e.g. "Bold"
    #[inline]
    pub fn style_name(&self) -> &str {
        &self.style
    }

    /// Registry name: `"family style"`
    pub fn name(&self) -> String {
        format!("{} {}", self.family, self.style)
    }

    /// Index of this face within its font file
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Raw font file data
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.font.as_slice()
    }

    /// Access the shaping face
    #[cfg(feature = "rustybuzz")]
    #[inline]
    pub(crate) fn rustybuzz(&self) -> &rustybuzz::Face<'static> {
        &self.rustybuzz
    }

    /// Get glyph identifier for a char
    ///
    /// If the char is not found, `GlyphId(0)` is returned (the 'missing glyph'
    /// representation).
    #[inline]
    pub fn get_char(&self, c: char) -> GlyphId {
        GlyphId(self.font.glyph_id(c).0)
    }

    /// Set the size in pixels per Em
    ///
    /// Returns false (and leaves the size unchanged) if `size == 0`.
    pub fn set_pixel_sizes(&self, size: u32) -> bool {
        if size == 0 {
            return false;
        }
        self.pixel_size.set(size);
        true
    }

    /// Current size in pixels per Em (0 if never set)
    #[inline]
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size.get()
    }

    /// Scale at the current pixel size
    #[inline]
    pub fn dpu(&self) -> DPU {
        DPU::new(self.pixel_size(), self.font.units_per_em().unwrap_or(0.0))
    }

    /// Horizontal advance of a glyph at the current size, in pixels
    #[inline]
    pub fn h_advance(&self, id: GlyphId) -> f64 {
        self.dpu().to_px(self.font.h_advance_unscaled(id.into()))
    }

    /// Distance between baselines at the current size, in pixels
    ///
    /// This is `ascent - descent + line_gap`.
    #[inline]
    pub fn line_spacing(&self) -> f64 {
        let font = &self.font;
        let units = font.ascent_unscaled() - font.descent_unscaled() + font.line_gap_unscaled();
        self.dpu().to_px(units)
    }

    /// Unscaled glyph outline (font units, y-up)
    ///
    /// Returns `None` for glyphs without contours, e.g. a space.
    #[inline]
    pub fn outline(&self, id: GlyphId) -> Option<Outline> {
        self.font.outline(id.into())
    }
}

#[cfg(feature = "rustybuzz")]
unsafe fn extend_lifetime<'b, T: ?Sized>(r: &'b T) -> &'static T {
    std::mem::transmute::<&'b T, &'static T>(r)
}

impl Drop for FontFace {
    fn drop(&mut self) {
        log::trace!("release face \"{} {}\"", self.family, self.style);
    }
}

/// A glyph resolved within a specific face
#[derive(Clone, Debug)]
pub struct FontGlyph {
    face: FacePtr,
    index: GlyphId,
}

impl FontGlyph {
    /// Construct
    #[inline]
    pub fn new(face: FacePtr, index: GlyphId) -> Self {
        FontGlyph { face, index }
    }

    /// The face owning this glyph
    #[inline]
    pub fn face(&self) -> &FacePtr {
        &self.face
    }

    /// Glyph index within [`Self::face`]
    #[inline]
    pub fn index(&self) -> GlyphId {
        self.index
    }

    /// True if this is the missing-glyph placeholder
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.index.is_missing()
    }
}
