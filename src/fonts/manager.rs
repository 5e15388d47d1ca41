// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Per-renderer face cache

use super::{FacePtr, FontEngine, FontFaceSet, FontSet};
use crate::stroker::Stroker;
use std::collections::HashMap;

/// Loads faces through a [`FontEngine`] and caches them by name
///
/// A manager belongs to a single rendering thread. Each face is loaded at
/// most once per manager; repeated requests return the same instance. Failed
/// loads are not cached, thus a later request (e.g. after more fonts were
/// registered) tries again.
#[derive(Debug)]
pub struct FaceManager<'e> {
    engine: &'e FontEngine,
    faces: HashMap<String, FacePtr>,
    stroker: Stroker,
}

impl<'e> FaceManager<'e> {
    /// Construct with an empty cache
    pub fn new(engine: &'e FontEngine) -> Self {
        FaceManager {
            engine,
            faces: HashMap::new(),
            stroker: engine.create_stroker(),
        }
    }

    /// The engine used to load faces
    #[inline]
    pub fn engine(&self) -> &'e FontEngine {
        self.engine
    }

    /// Get a face by registered name, loading it on first use
    pub fn get_face(&mut self, name: &str) -> Option<FacePtr> {
        if let Some(face) = self.faces.get(name) {
            return Some(face.clone());
        }

        let face = self.engine.create_face(name)?;
        log::debug!("FaceManager: loaded face \"{name}\"");
        self.faces.insert(name.to_string(), face.clone());
        Some(face)
    }

    /// Get a set containing the single face `name`
    ///
    /// The set is empty if the face cannot be loaded.
    pub fn get_face_set(&mut self, name: &str) -> FontFaceSet {
        let mut set = FontFaceSet::new();
        if let Some(face) = self.get_face(name) {
            set.add(face);
        }
        set
    }

    /// Get a set of the faces of `fontset`, in order
    ///
    /// Names which cannot be loaded are skipped.
    pub fn get_face_set_from(&mut self, fontset: &FontSet) -> FontFaceSet {
        let mut set = FontFaceSet::new();
        for name in fontset.face_names() {
            match self.get_face(name) {
                Some(face) => set.add(face),
                None => log::debug!(
                    "FaceManager: skipping face \"{name}\" of font set \"{}\"",
                    fontset.name()
                ),
            }
        }
        set
    }

    /// Get the face set for a style
    ///
    /// Uses `fontset` if it names any faces, otherwise `name`.
    pub fn select_face_set(&mut self, name: &str, fontset: &FontSet) -> FontFaceSet {
        if fontset.is_empty() {
            self.get_face_set(name)
        } else {
            self.get_face_set_from(fontset)
        }
    }

    /// Access the stroker
    #[inline]
    pub fn get_stroker(&mut self) -> &mut Stroker {
        &mut self.stroker
    }

    /// Number of cached faces
    #[inline]
    pub fn num_cached_faces(&self) -> usize {
        self.faces.len()
    }
}
