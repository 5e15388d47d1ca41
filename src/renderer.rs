// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text renderer: draws positioned text paths onto a [`PixelSink`]

use crate::conv::to_pixel_size;
use crate::fonts::FaceManager;
use crate::raster::{GlyphImage, Sprite};
use crate::text::{CharProperties, TextPath};
use crate::{PixelSink, Rect, Vec2};
use easy_cast::Conv;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Renderer configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Halos are drawn only for radii strictly between 0 and this limit
    pub halo_limit: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config { halo_limit: 256.0 }
    }
}

/// A glyph prepared for rendering
#[derive(Debug)]
struct GlyphRecord<'p> {
    image: GlyphImage,
    properties: &'p CharProperties,
}

/// Draws text paths
///
/// Usage is a two-step cycle: [`Self::prepare_glyphs`] loads and transforms
/// the glyphs of a path (returning their bounding box, e.g. for collision
/// detection), then [`Self::render`] or [`Self::render_id`] draws them at a
/// screen position. Prepared glyphs are consumed by rendering.
pub struct TextRenderer<'a, 'e, 'p, S: PixelSink + ?Sized> {
    sink: &'a mut S,
    manager: &'a mut FaceManager<'e>,
    glyphs: Vec<GlyphRecord<'p>>,
    config: Config,
}

impl<'a, 'e, 'p, S: PixelSink + ?Sized> TextRenderer<'a, 'e, 'p, S> {
    /// Construct with default [`Config`]
    pub fn new(sink: &'a mut S, manager: &'a mut FaceManager<'e>) -> Self {
        Self::with_config(sink, manager, Config::default())
    }

    /// Construct
    pub fn with_config(sink: &'a mut S, manager: &'a mut FaceManager<'e>, config: Config) -> Self {
        TextRenderer {
            sink,
            manager,
            glyphs: Vec::new(),
            config,
        }
    }

    /// Access the configuration
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of prepared glyphs
    #[inline]
    pub fn num_prepared(&self) -> usize {
        self.glyphs.len()
    }

    /// Load and position the glyphs of `path`
    ///
    /// Glyphs from a previous call which were not rendered are discarded.
    /// Each node uses its pre-resolved glyph if any, otherwise its character
    /// is resolved through the node's font set (or face name). Nodes whose
    /// face cannot be loaded or whose size is zero are skipped.
    ///
    /// Returns the union of the glyphs' pixel control boxes, in path space
    /// (y-up, relative to the path origin); an empty box at the origin if
    /// no glyph has contours.
    pub fn prepare_glyphs(&mut self, path: &TextPath<'p>) -> Rect {
        self.glyphs.clear();
        let mut bbox: Option<Rect> = None;

        for node in path.nodes() {
            let properties = node.properties;
            let size = to_pixel_size(properties.text_size);
            if size == 0 {
                log::debug!("prepare_glyphs: zero text size for '{}'", node.c);
                continue;
            }

            let glyph = match &node.glyph {
                Some(glyph) => {
                    glyph.face().set_pixel_sizes(size);
                    glyph.clone()
                }
                None => {
                    let faces = self
                        .manager
                        .select_face_set(&properties.face_name, &properties.fontset);
                    faces.set_pixel_sizes(size);
                    match faces.get_glyph(node.c) {
                        Some(glyph) => glyph,
                        None => {
                            log::debug!(
                                "prepare_glyphs: no face for '{}' (\"{}\")",
                                node.c,
                                properties.face_name
                            );
                            continue;
                        }
                    }
                }
            };

            let image = GlyphImage::load(&glyph, node.pos, node.angle);
            if let Some(cbox) = image.cbox() {
                bbox = Some(match bbox {
                    Some(b) => b.union(&cbox),
                    None => cbox,
                });
            }
            self.glyphs.push(GlyphRecord { image, properties });
        }

        bbox.unwrap_or_default()
    }

    /// Draw prepared glyphs with the path origin at screen position `(x0, y0)`
    ///
    /// Glyphs are drawn in path order; each glyph's halo (if any) is drawn
    /// immediately beneath its fill.
    pub fn render(&mut self, x0: f64, y0: f64) {
        let glyphs = std::mem::take(&mut self.glyphs);
        let origin = Vec2(x0, y0);
        let halo_limit = self.config.halo_limit;

        for glyph in &glyphs {
            let Some(sprite) = glyph.image.rasterize(origin) else {
                continue;
            };
            let props = glyph.properties;

            let radius = props.halo_radius;
            if radius > 0.0 && radius < halo_limit {
                let stroker = self.manager.get_stroker();
                stroker.init(radius);
                let halo = stroker.stroke(&sprite);
                blit(&halo, |x, y, a| {
                    self.sink
                        .blend_pixel(x, y, props.halo_fill, a, props.text_opacity)
                });
            }

            blit(&sprite, |x, y, a| {
                self.sink.blend_pixel(x, y, props.fill, a, props.text_opacity)
            });
        }
    }

    /// Write `feature_id` to the pixels covered by prepared glyphs
    ///
    /// Coverage is first grown by `max(halo_radius, min_radius)` so that thin
    /// glyphs remain easy to hit, limited to [`Config::halo_limit`]. See also
    /// [`Self::render_id_default`].
    pub fn render_id(&mut self, feature_id: i32, x0: f64, y0: f64, min_radius: f64) {
        let glyphs = std::mem::take(&mut self.glyphs);
        let origin = Vec2(x0, y0);
        let halo_limit = self.config.halo_limit;

        for glyph in &glyphs {
            let Some(sprite) = glyph.image.rasterize(origin) else {
                continue;
            };
            let radius = glyph.properties.halo_radius.max(min_radius).min(halo_limit);
            let stroker = self.manager.get_stroker();
            stroker.init(radius);
            let grown = stroker.stroke(&sprite);
            blit(&grown, |x, y, _| self.sink.set_pixel_id(x, y, feature_id));
        }
    }

    /// [`Self::render_id`] with `min_radius = 1`
    #[inline]
    pub fn render_id_default(&mut self, feature_id: i32, x0: f64, y0: f64) {
        self.render_id(feature_id, x0, y0, 1.0);
    }
}

/// Call `f(x, y, coverage)` in screen coordinates for each covered pixel
fn blit(sprite: &Sprite, mut f: impl FnMut(i32, i32, u8)) {
    for (x, y, a) in sprite.pixels() {
        f(sprite.offset.0 + i32::conv(x), sprite.offset.1 + i32::conv(y), a);
    }
}
