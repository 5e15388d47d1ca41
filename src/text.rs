// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text layout records: per-character style, string info and text paths

use crate::fonts::{FontGlyph, FontSet};
use crate::{Color, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Style properties of a character
///
/// These are owned by the caller's text layout and borrowed by
/// [`StringInfo`], [`TextPath`] and [`crate::TextRenderer`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharProperties {
    /// Registry name of the face (used if `fontset` is empty)
    pub face_name: String,
    /// Fallback chain; takes priority over `face_name` when non-empty
    pub fontset: FontSet,
    /// Size in pixels per Em
    pub text_size: f64,
    /// Extra space added after each character, in pixels
    pub character_spacing: f64,
    /// Glyph colour
    pub fill: Color,
    /// Halo colour
    pub halo_fill: Color,
    /// Halo radius in pixels; no halo is drawn if zero
    pub halo_radius: f64,
    /// Opacity applied to both fill and halo, in `[0, 1]`
    pub text_opacity: f64,
}

impl Default for CharProperties {
    fn default() -> Self {
        CharProperties {
            face_name: String::new(),
            fontset: FontSet::default(),
            text_size: 10.0,
            character_spacing: 0.0,
            fill: Color::BLACK,
            halo_fill: Color::WHITE,
            halo_radius: 0.0,
            text_opacity: 1.0,
        }
    }
}

/// Layout information for a single (shaped) character
#[derive(Clone, Debug)]
pub struct CharInfo<'p> {
    /// The character
    pub c: char,
    /// Resolved glyph
    pub glyph: FontGlyph,
    /// Horizontal advance in pixels
    pub width: f64,
    /// Height of the glyph's pixel box (`ymax - ymin`)
    pub height: f64,
    /// Bottom of the glyph's pixel box relative to the baseline (y-up)
    pub ymin: f64,
    /// Height of `'X'` in the same face set; a stable measure for placement
    pub avg_height: f64,
    /// Distance between baselines
    pub line_spacing: f64,
    /// Style of this character, if any
    pub format: Option<&'p CharProperties>,
}

/// Shaped and measured characters of a string, in visual order
///
/// Filled by [`crate::fonts::FontFaceSet::get_string_info`], which appends;
/// calling it once per run with a different `format` yields rich text.
#[derive(Clone, Debug, Default)]
pub struct StringInfo<'p> {
    characters: Vec<CharInfo<'p>>,
    width: f64,
    height: f64,
    is_rtl: bool,
}

impl<'p> StringInfo<'p> {
    /// Construct empty
    pub fn new() -> Self {
        StringInfo::default()
    }

    /// Append a character
    #[inline]
    pub fn add_info(&mut self, info: CharInfo<'p>) {
        self.characters.push(info);
    }

    /// Number of characters
    #[inline]
    pub fn num_characters(&self) -> usize {
        self.characters.len()
    }

    /// Access a character
    #[inline]
    pub fn at(&self, i: usize) -> Option<&CharInfo<'p>> {
        self.characters.get(i)
    }

    /// All characters in visual order
    #[inline]
    pub fn characters(&self) -> &[CharInfo<'p>] {
        &self.characters
    }

    /// Iterate over characters
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, CharInfo<'p>> {
        self.characters.iter()
    }

    /// Set overall `(width, height)`
    #[inline]
    pub fn set_dimensions(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Overall `(width, height)`
    #[inline]
    pub fn get_dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Mark as having right-to-left base direction
    #[inline]
    pub fn set_rtl(&mut self, rtl: bool) {
        self.is_rtl = rtl;
    }

    /// True if the base direction is right-to-left
    #[inline]
    pub fn is_rtl(&self) -> bool {
        self.is_rtl
    }

    /// Remove all characters and reset dimensions
    pub fn clear(&mut self) {
        self.characters.clear();
        self.width = 0.0;
        self.height = 0.0;
        self.is_rtl = false;
    }
}

impl<'a, 'p> IntoIterator for &'a StringInfo<'p> {
    type Item = &'a CharInfo<'p>;
    type IntoIter = std::slice::Iter<'a, CharInfo<'p>>;

    fn into_iter(self) -> Self::IntoIter {
        self.characters.iter()
    }
}

/// A positioned character of a [`TextPath`]
#[derive(Clone, Debug)]
pub struct CharNode<'p> {
    /// The character
    pub c: char,
    /// Glyph resolved during shaping; if `None` the renderer resolves `c`
    pub glyph: Option<FontGlyph>,
    /// Pen position relative to the path center, in pixels (y-up)
    pub pos: Vec2,
    /// Rotation in radians, counter-clockwise
    pub angle: f64,
    /// Style
    pub properties: &'p CharProperties,
}

/// A sequence of positioned characters, as produced by label placement
#[derive(Clone, Debug, Default)]
pub struct TextPath<'p> {
    /// Anchor of the path (in the caller's coordinate space)
    pub center: Vec2,
    nodes: Vec<CharNode<'p>>,
}

impl<'p> TextPath<'p> {
    /// Construct empty
    pub fn new(center: Vec2) -> Self {
        TextPath {
            center,
            nodes: Vec::new(),
        }
    }

    /// Lay out `info` along a horizontal baseline starting at the origin
    ///
    /// Characters without a format use `default_format`. Each character
    /// advances the pen by its width plus its format's `character_spacing`.
    pub fn from_string_info(
        info: &StringInfo<'p>,
        center: Vec2,
        default_format: &'p CharProperties,
    ) -> Self {
        let mut path = TextPath::new(center);
        let mut x = 0.0;
        for ci in info {
            let properties = ci.format.unwrap_or(default_format);
            path.nodes.push(CharNode {
                c: ci.c,
                glyph: Some(ci.glyph.clone()),
                pos: Vec2(x, 0.0),
                angle: 0.0,
                properties,
            });
            x += ci.width + properties.character_spacing;
        }
        path
    }

    /// Append a character to be resolved by the renderer
    pub fn add_node(&mut self, c: char, x: f64, y: f64, angle: f64, properties: &'p CharProperties) {
        self.nodes.push(CharNode {
            c,
            glyph: None,
            pos: Vec2(x, y),
            angle,
            properties,
        });
    }

    /// Append a pre-resolved node
    #[inline]
    pub fn push(&mut self, node: CharNode<'p>) {
        self.nodes.push(node);
    }

    /// Number of nodes
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Access a node
    #[inline]
    pub fn vertex(&self, i: usize) -> Option<&CharNode<'p>> {
        self.nodes.get(i)
    }

    /// All nodes in path order
    #[inline]
    pub fn nodes(&self) -> &[CharNode<'p>] {
        &self.nodes
    }

    /// Remove all nodes
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
