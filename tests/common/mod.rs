// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Shared test utilities: a minimal TrueType writer
//!
//! Fonts have 1000 units per Em, ascender 800, descender -200 and no line
//! gap. Glyphs are axis-aligned rectangles (or empty). Glyph ids are assigned
//! in order of [`FontBuilder::glyph`] calls, starting from 1; id 0 is an
//! empty `.notdef`.

#![allow(dead_code)]

use carto_text::fonts::{FacePtr, FontFace};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

pub const UNITS_PER_EM: u16 = 1000;
pub const ASCENDER: i16 = 800;
pub const DESCENDER: i16 = -200;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Glyph {
    c: char,
    advance: u16,
    /// `[x_min, y_min, x_max, y_max]`
    rect: Option<[i16; 4]>,
}

pub struct FontBuilder {
    family: String,
    style: String,
    glyphs: Vec<Glyph>,
    /// `(feature, from, to)`, one single-substitution lookup each
    substitutions: Vec<([u8; 4], char, char)>,
}

impl FontBuilder {
    pub fn new(family: &str, style: &str) -> Self {
        FontBuilder {
            family: family.to_string(),
            style: style.to_string(),
            glyphs: vec![],
            substitutions: vec![],
        }
    }

    /// Add a glyph for `c`
    pub fn glyph(mut self, c: char, advance: u16, rect: Option<[i16; 4]>) -> Self {
        self.glyphs.push(Glyph { c, advance, rect });
        self
    }

    /// Add glyphs for each char of `chars`, all alike
    pub fn glyphs(mut self, chars: &str, advance: u16, rect: Option<[i16; 4]>) -> Self {
        for c in chars.chars() {
            self = self.glyph(c, advance, rect);
        }
        self
    }

    /// Under OpenType `feature`, substitute the glyph of `from` by that of `to`
    ///
    /// Each feature tag may be used once.
    pub fn substitute(mut self, feature: &[u8; 4], from: char, to: char) -> Self {
        self.substitutions.push((*feature, from, to));
        self
    }

    /// Glyph id of `c` (0 if not added)
    pub fn id_of(&self, c: char) -> u16 {
        self.glyphs
            .iter()
            .position(|g| g.c == c)
            .map(|i| i as u16 + 1)
            .unwrap_or(0)
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Build with table offsets relative to `base` (for collections)
    fn build_at(&self, base: u32) -> Vec<u8> {
        let num_glyphs = self.glyphs.len() as u16 + 1;

        // glyf + loca
        let mut glyf = Vec::new();
        // .notdef is empty: it starts and ends at offset 0
        let mut loca = vec![0u32, 0];
        let mut bbox = [0i16; 4];
        let mut max_advance = 500;
        for glyph in &self.glyphs {
            max_advance = max_advance.max(glyph.advance);
            if let Some([x0, y0, x1, y1]) = glyph.rect {
                bbox = [bbox[0].min(x0), bbox[1].min(y0), bbox[2].max(x1), bbox[3].max(y1)];
                push_i16(&mut glyf, 1); // numberOfContours
                for v in [x0, y0, x1, y1] {
                    push_i16(&mut glyf, v);
                }
                push_u16(&mut glyf, 3); // endPtsOfContours
                push_u16(&mut glyf, 0); // instructionLength
                glyf.extend_from_slice(&[0x01; 4]); // on-curve, i16 deltas
                for dx in [x0, 0, x1 - x0, 0] {
                    push_i16(&mut glyf, dx);
                }
                for dy in [y0, y1 - y0, 0, y0 - y1] {
                    push_i16(&mut glyf, dy);
                }
                pad4(&mut glyf);
            }
            loca.push(glyf.len() as u32);
        }
        if glyf.is_empty() {
            // some parsers dislike empty tables
            glyf.extend_from_slice(&[0; 4]);
        }
        let loca: Vec<u8> = loca.iter().flat_map(|v| v.to_be_bytes()).collect();

        let mut head = Vec::new();
        push_u32(&mut head, 0x0001_0000); // version
        push_u32(&mut head, 0x0001_0000); // fontRevision
        push_u32(&mut head, 0); // checksumAdjustment
        push_u32(&mut head, 0x5F0F_3CF5); // magicNumber
        push_u16(&mut head, 0x0003); // flags
        push_u16(&mut head, UNITS_PER_EM);
        head.extend_from_slice(&[0; 16]); // created, modified
        for v in bbox {
            push_i16(&mut head, v);
        }
        push_u16(&mut head, 0); // macStyle
        push_u16(&mut head, 8); // lowestRecPPEM
        push_i16(&mut head, 2); // fontDirectionHint
        push_i16(&mut head, 1); // indexToLocFormat: long
        push_i16(&mut head, 0); // glyphDataFormat

        let mut hhea = Vec::new();
        push_u32(&mut hhea, 0x0001_0000);
        push_i16(&mut hhea, ASCENDER);
        push_i16(&mut hhea, DESCENDER);
        push_i16(&mut hhea, 0); // lineGap
        push_u16(&mut hhea, max_advance);
        push_i16(&mut hhea, 0); // minLeftSideBearing
        push_i16(&mut hhea, 0); // minRightSideBearing
        push_i16(&mut hhea, bbox[2]); // xMaxExtent
        push_i16(&mut hhea, 1); // caretSlopeRise
        push_i16(&mut hhea, 0); // caretSlopeRun
        push_i16(&mut hhea, 0); // caretOffset
        hhea.extend_from_slice(&[0; 8]); // reserved
        push_i16(&mut hhea, 0); // metricDataFormat
        push_u16(&mut hhea, num_glyphs);

        let mut hmtx = Vec::new();
        push_u16(&mut hmtx, 500); // .notdef
        push_i16(&mut hmtx, 0);
        for glyph in &self.glyphs {
            push_u16(&mut hmtx, glyph.advance);
            push_i16(&mut hmtx, glyph.rect.map(|r| r[0]).unwrap_or(0));
        }

        let mut maxp = Vec::new();
        push_u32(&mut maxp, 0x0000_5000);
        push_u16(&mut maxp, num_glyphs);

        // cmap: a single format 12 subtable, groups sorted by code point
        let mut groups: Vec<(u32, u32)> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| (g.c as u32, i as u32 + 1))
            .collect();
        groups.sort();
        let mut cmap = Vec::new();
        push_u16(&mut cmap, 0); // version
        push_u16(&mut cmap, 1); // numTables
        push_u16(&mut cmap, 3); // platform: Windows
        push_u16(&mut cmap, 10); // encoding: Unicode full repertoire
        push_u32(&mut cmap, 12); // offset
        push_u16(&mut cmap, 12); // format
        push_u16(&mut cmap, 0);
        push_u32(&mut cmap, 16 + 12 * groups.len() as u32);
        push_u32(&mut cmap, 0); // language
        push_u32(&mut cmap, groups.len() as u32);
        for (c, id) in groups {
            push_u32(&mut cmap, c);
            push_u32(&mut cmap, c);
            push_u32(&mut cmap, id);
        }

        let mut name = Vec::new();
        let strings: Vec<Vec<u8>> = [&self.family, &self.style]
            .iter()
            .map(|s| s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect())
            .collect();
        push_u16(&mut name, 0); // format
        push_u16(&mut name, 2); // count
        push_u16(&mut name, 6 + 12 * 2); // stringOffset
        let mut offset = 0;
        for (id, s) in strings.iter().enumerate() {
            push_u16(&mut name, 3); // platform: Windows
            push_u16(&mut name, 1); // encoding: Unicode BMP
            push_u16(&mut name, 0x0409); // language: en-US
            push_u16(&mut name, id as u16 + 1); // FAMILY, SUBFAMILY
            push_u16(&mut name, s.len() as u16);
            push_u16(&mut name, offset);
            offset += s.len() as u16;
        }
        for s in &strings {
            name.extend_from_slice(s);
        }

        // Table records must be sorted by tag.
        let mut tables: Vec<(&[u8; 4], Vec<u8>)> = vec![];
        if let Some(gsub) = self.gsub() {
            tables.push((b"GSUB", gsub));
        }
        tables.extend([
            (b"cmap", cmap),
            (b"glyf", glyf),
            (b"head", head),
            (b"hhea", hhea),
            (b"hmtx", hmtx),
            (b"loca", loca),
            (b"maxp", maxp),
            (b"name", name),
        ]);
        write_sfnt(&tables, base)
    }

    /// A GSUB table with a single `DFLT` script whose default language
    /// system enables every feature of [`Self::substitute`]
    fn gsub(&self) -> Option<Vec<u8>> {
        if self.substitutions.is_empty() {
            return None;
        }
        let mut subs: Vec<([u8; 4], u16, u16)> = self
            .substitutions
            .iter()
            .map(|(tag, from, to)| (*tag, self.id_of(*from), self.id_of(*to)))
            .collect();
        subs.sort();
        let n = subs.len() as u16;

        let mut scripts = Vec::new();
        push_u16(&mut scripts, 1); // scriptCount
        scripts.extend_from_slice(b"DFLT");
        push_u16(&mut scripts, 8); // Script offset
        push_u16(&mut scripts, 4); // defaultLangSys offset
        push_u16(&mut scripts, 0); // langSysCount
        push_u16(&mut scripts, 0); // lookupOrder
        push_u16(&mut scripts, 0xFFFF); // requiredFeatureIndex: none
        push_u16(&mut scripts, n);
        for i in 0..n {
            push_u16(&mut scripts, i);
        }

        // Feature i uses lookup i
        let mut features = Vec::new();
        push_u16(&mut features, n);
        for (i, (tag, _, _)) in subs.iter().enumerate() {
            features.extend_from_slice(tag);
            push_u16(&mut features, 2 + 6 * n + 6 * i as u16);
        }
        for i in 0..n {
            push_u16(&mut features, 0); // featureParams
            push_u16(&mut features, 1); // lookupIndexCount
            push_u16(&mut features, i);
        }

        // Lookups are 22 bytes: header, single subst format 2, coverage
        let mut lookups = Vec::new();
        push_u16(&mut lookups, n);
        for i in 0..n {
            push_u16(&mut lookups, 2 + 2 * n + 22 * i);
        }
        for (_, from, to) in &subs {
            push_u16(&mut lookups, 1); // lookupType: single substitution
            push_u16(&mut lookups, 0); // lookupFlag
            push_u16(&mut lookups, 1); // subTableCount
            push_u16(&mut lookups, 8); // subtable offset
            push_u16(&mut lookups, 2); // substFormat
            push_u16(&mut lookups, 8); // coverage offset
            push_u16(&mut lookups, 1); // glyphCount
            push_u16(&mut lookups, *to);
            push_u16(&mut lookups, 1); // coverage format
            push_u16(&mut lookups, 1); // glyphCount
            push_u16(&mut lookups, *from);
        }

        let mut gsub = Vec::new();
        push_u16(&mut gsub, 1); // majorVersion
        push_u16(&mut gsub, 0); // minorVersion
        push_u16(&mut gsub, 10);
        push_u16(&mut gsub, 10 + scripts.len() as u16);
        push_u16(&mut gsub, 10 + (scripts.len() + features.len()) as u16);
        gsub.extend(scripts);
        gsub.extend(features);
        gsub.extend(lookups);
        Some(gsub)
    }
}

fn write_sfnt(tables: &[(&[u8; 4], Vec<u8>)], base: u32) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1 << entry_selector) * 16;

    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, num_tables);
    push_u16(&mut out, search_range);
    push_u16(&mut out, entry_selector);
    push_u16(&mut out, num_tables * 16 - search_range);

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in tables {
        out.extend_from_slice(&tag[..]);
        push_u32(&mut out, 0); // checksum
        push_u32(&mut out, base + (offset + body.len()) as u32);
        push_u32(&mut out, data.len() as u32);
        body.extend_from_slice(data);
        pad4(&mut body);
    }
    offset += body.len();
    out.extend_from_slice(&body);
    debug_assert_eq!(out.len(), offset);
    out
}

/// Build a collection (`.ttc`) of fonts
pub fn build_collection(fonts: &[FontBuilder]) -> Vec<u8> {
    let header_len = 12 + 4 * fonts.len();
    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    push_u32(&mut out, 0x0001_0000);
    push_u32(&mut out, fonts.len() as u32);

    let mut body = Vec::new();
    for font in fonts {
        let base = (header_len + body.len()) as u32;
        push_u32(&mut out, base);
        body.extend_from_slice(&font.build_at(base));
        pad4(&mut body);
    }
    out.extend_from_slice(&body);
    out
}

fn push_u16(v: &mut Vec<u8>, x: u16) {
    v.extend_from_slice(&x.to_be_bytes());
}

fn push_i16(v: &mut Vec<u8>, x: i16) {
    v.extend_from_slice(&x.to_be_bytes());
}

fn push_u32(v: &mut Vec<u8>, x: u32) {
    v.extend_from_slice(&x.to_be_bytes());
}

fn pad4(v: &mut Vec<u8>) {
    while v.len() % 4 != 0 {
        v.push(0);
    }
}

/// Rectangle of `'X'` and other capitals: 10×14 px at 20 px per Em
pub const CAPITAL: [i16; 4] = [50, 0, 550, 700];
/// Rectangle of lowercase letters
pub const SMALL: [i16; 4] = [50, 0, 450, 500];
/// Rectangle of Hebrew letters
pub const HEBREW: [i16; 4] = [50, 0, 550, 600];
/// Rectangle of the CJK ideograph: 18×18 px at 20 px per Em
pub const IDEOGRAPH: [i16; 4] = [50, -100, 950, 800];

/// "Test Sans Regular": latin letters, space, parentheses and Hebrew
pub fn sans() -> FontBuilder {
    FontBuilder::new("Test Sans", "Regular")
        .glyph(' ', 300, None)
        .glyphs("ABCDEFGHIJKLMNOPQRSTUVWXYZ", 600, Some(CAPITAL))
        .glyphs("abcdefghijklmnopqrstuvwxyz", 500, Some(SMALL))
        .glyph('(', 400, Some([100, -100, 300, 750]))
        .glyph(')', 400, Some([100, -100, 300, 750]))
        .glyphs("\u{5D0}\u{5D1}\u{5D2}", 600, Some(HEBREW))
}

/// "Test Serif Bold": capitals only, narrower than [`sans`]
pub fn serif() -> FontBuilder {
    FontBuilder::new("Test Serif", "Bold").glyphs("ABCDEFGHIJKLMNOPQRSTUVWXYZ", 550, Some(CAPITAL))
}

/// "Test CJK Regular": a single ideograph
pub fn cjk() -> FontBuilder {
    FontBuilder::new("Test CJK", "Regular").glyph('\u{4E2D}', 1000, Some(IDEOGRAPH))
}

/// Rectangle of Arabic letters
pub const ARABIC: [i16; 4] = [50, 0, 450, 400];

/// "Test Naskh Regular": beh with initial and final forms
///
/// The forms are also mapped from private use code points.
pub fn arabic() -> FontBuilder {
    FontBuilder::new("Test Naskh", "Regular")
        .glyph('\u{628}', 500, Some(ARABIC))
        .glyph('\u{E000}', 450, Some(ARABIC))
        .glyph('\u{E001}', 550, Some(ARABIC))
        .substitute(b"init", '\u{628}', '\u{E000}')
        .substitute(b"fina", '\u{628}', '\u{E001}')
}

/// Load a face directly from built data
pub fn face(builder: &FontBuilder) -> FacePtr {
    let face = FontFace::from_vec(builder.build(), 0).expect("test font must load");
    Rc::new(face)
}

/// A fresh, empty temporary directory, removed when dropped
pub fn temp_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("carto-text-{name}-"))
        .tempdir()
        .expect("create temp dir")
}

/// Write `data` to `dir/file`
pub fn write(dir: impl AsRef<Path>, file: &str, data: &[u8]) -> PathBuf {
    let path = dir.as_ref().join(file);
    std::fs::write(&path, data).expect("write font file");
    path
}
