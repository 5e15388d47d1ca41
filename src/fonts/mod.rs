// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font selection and loading
//!
//! Font files are registered with a [`FontRegistry`], of which a process-wide
//! instance exists and can be accessed via [`registry()`]. Registration maps
//! a face's *registry name*, `"family style"` (e.g. `"DejaVu Sans Bold"`), to
//! its file and index.
//!
//! A [`FontEngine`] loads faces from a registry. Rendering code does not use
//! the engine directly but through a [`FaceManager`], which caches loaded
//! faces by name and assembles [`FontFaceSet`]s: ordered fallback chains,
//! used to resolve characters to glyphs and to measure text.
//!
//! ### Font sizes
//!
//! Faces are sized in *pixels per Em*, via [`FontFace::set_pixel_sizes`].
//! Digital font files have an internally defined unit known as the *font
//! unit*; the [`crate::conv::DPU`] type converts from font units to pixels.
//!
//! Note that the size is a property of the face instance, shared by every
//! set containing that face.

mod engine;
mod face;
mod face_set;
mod font_set;
mod manager;

pub use engine::{registry, FontEngine, FontError, FontFile, FontRegistry};
pub use face::{FacePtr, FontFace, FontGlyph};
pub use face_set::{Dimension, FontFaceSet};
pub use font_set::FontSet;
pub use manager::FaceManager;
