// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text rendering for map labels
//!
//! This library resolves font requests to loaded faces, shapes and measures
//! text, and rasters positioned glyphs (optionally with a halo) onto a
//! [`PixelSink`].
//!
//! ```no_run
//! use carto_text::fonts::{FaceManager, FontEngine};
//! use carto_text::text::{CharProperties, StringInfo, TextPath};
//! use carto_text::{Image32, TextRenderer, Vec2};
//!
//! let engine = FontEngine::new();
//! engine.register_fonts("/usr/share/fonts", true);
//!
//! let mut manager = FaceManager::new(&engine);
//! let props = CharProperties {
//!     face_name: "DejaVu Sans Book".into(),
//!     halo_radius: 1.0,
//!     ..Default::default()
//! };
//!
//! let mut faces = manager.get_face_set(&props.face_name);
//! faces.set_pixel_sizes(12);
//! let mut info = StringInfo::new();
//! faces.get_string_info(&mut info, "Hello world", Some(&props));
//! let path = TextPath::from_string_info(&info, Vec2::ZERO, &props);
//!
//! let mut image = Image32::new(256, 64);
//! let mut renderer = TextRenderer::new(&mut image, &mut manager);
//! let _bbox = renderer.prepare_glyphs(&path);
//! renderer.render(10.0, 40.0);
//! ```
//!
//! # Features
//!
//! -   `shaping` (default): contextual shaping via `rustybuzz`; without it,
//!     characters are mapped to glyphs directly
//! -   `serde`: (de)serialization of style and configuration types

mod data;
pub use data::*;

pub mod conv;
pub mod fonts;
pub mod raster;
pub(crate) mod shaper;
pub mod stroker;
pub mod text;

mod renderer;
pub use renderer::{Config, TextRenderer};

mod sink;
pub use sink::{IdBuffer, Image32, PixelSink};
