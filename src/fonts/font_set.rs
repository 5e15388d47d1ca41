// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Named font sets

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered list of face names
///
/// Names are registry names (`"family style"`). Order is fallback order: see
/// [`super::FaceManager::get_face_set_from`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontSet {
    name: String,
    face_names: Vec<String>,
}

impl FontSet {
    /// Construct an empty set
    pub fn new(name: impl Into<String>) -> Self {
        FontSet {
            name: name.into(),
            face_names: Vec::new(),
        }
    }

    /// Construct from a list of face names
    pub fn with_faces<I>(name: impl Into<String>, faces: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        FontSet {
            name: name.into(),
            face_names: faces.into_iter().map(|s| s.into()).collect(),
        }
    }

    /// Name of this set
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a face name
    #[inline]
    pub fn add_face_name(&mut self, face_name: impl Into<String>) {
        self.face_names.push(face_name.into());
    }

    /// Face names, in fallback order
    #[inline]
    pub fn face_names(&self) -> &[String] {
        &self.face_names
    }

    /// Number of face names
    #[inline]
    pub fn size(&self) -> usize {
        self.face_names.len()
    }

    /// True if there are no face names
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.face_names.is_empty()
    }
}
