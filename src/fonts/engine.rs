// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font registry and engine

use super::face::{read_names, FacePtr, FontFace};
use crate::stroker::Stroker;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Font loading errors
#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font file")]
    Io(#[from] std::io::Error),
    #[error("font load error")]
    TtfParser(#[from] ttf_parser::FaceParsingError),
    #[error("font load error")]
    AbGlyph(#[from] ab_glyph::InvalidFont),
    #[error("font face has no family or style name")]
    MissingNames,
    #[error("no font registered as \"{0}\"")]
    Unregistered(String),
}

/// Location of a registered face
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontFile {
    /// Path of the font file
    pub path: PathBuf,
    /// Index of the face within the file (non-zero only for collections)
    pub index: u32,
}

/// Registry of font files, keyed by `"family style"` name
///
/// The registry is populated only through [`FontRegistry::register_font`] and
/// [`FontRegistry::register_fonts`]; it performs no implicit filesystem
/// scanning. All access is serialized by a single lock, thus one registry may
/// be shared between rendering threads.
///
/// A process-wide instance (empty at startup) is available via [`registry`].
#[derive(Debug, Default)]
pub struct FontRegistry {
    name2file: Mutex<BTreeMap<String, FontFile>>,
}

impl FontRegistry {
    /// Construct an empty registry
    pub fn new() -> Self {
        FontRegistry::default()
    }

    // The map is only ever modified by single inserts, so a poisoned lock
    // still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, FontFile>> {
        self.name2file.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True if the file name has a supported font extension
    ///
    /// No I/O is performed.
    pub fn is_font_file(path: &Path) -> bool {
        const EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    fn try_register(&self, path: &Path) -> Result<usize, FontError> {
        let data = std::fs::read(path)?;
        let num_faces = ttf_parser::fonts_in_collection(&data).unwrap_or(1);

        let mut registered = 0;
        let mut last_err: Option<FontError> = None;
        for index in 0..num_faces {
            let face = match ttf_parser::Face::parse(&data, index) {
                Ok(face) => face,
                Err(err) => {
                    last_err = Some(err.into());
                    continue;
                }
            };
            let Some((family, style)) = read_names(&face) else {
                last_err = Some(FontError::MissingNames);
                continue;
            };

            let name = format!("{family} {style}");
            log::info!("Registered font \"{name}\" from {}", path.display());
            let file = FontFile {
                path: path.to_path_buf(),
                index,
            };
            self.lock().insert(name, file);
            registered += 1;
        }

        match last_err {
            Some(err) if registered == 0 => Err(err),
            _ => Ok(registered),
        }
    }

    /// Register all faces found in a font file
    ///
    /// Returns true if at least one face was registered. Unreadable or
    /// unsupported files are skipped with a warning.
    pub fn register_font(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_register(path) {
            Ok(n) => n > 0,
            Err(err) => {
                log::warn!("Failed to register font {}: {err}", path.display());
                false
            }
        }
    }

    /// Register fonts in a directory
    ///
    /// If `dir` is a file, it is registered directly. Otherwise, entries with
    /// a font extension (see [`Self::is_font_file`]) are registered, in name
    /// order, descending into sub-directories only if `recurse`. Symbolic
    /// links are followed; links back to an ancestor directory are skipped.
    ///
    /// Returns true if at least one font was registered.
    pub fn register_fonts(&self, dir: impl AsRef<Path>, recurse: bool) -> bool {
        let dir = dir.as_ref();
        if !dir.exists() {
            log::warn!("Font path does not exist: {}", dir.display());
            return false;
        }
        if !dir.is_dir() {
            return self.register_font(dir);
        }

        let walker = WalkDir::new(dir)
            .follow_links(true)
            .max_depth(if recurse { usize::MAX } else { 1 })
            .sort_by_file_name();

        let mut success = false;
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping font path: {err}");
                    continue;
                }
            };
            if entry.file_type().is_file() && Self::is_font_file(entry.path()) {
                success |= self.register_font(entry.path());
            }
        }
        success
    }

    /// Names of all registered faces, sorted
    pub fn face_names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// A snapshot of the name → file mapping
    pub fn get_mapping(&self) -> BTreeMap<String, FontFile> {
        self.lock().clone()
    }

    /// Look up the file registered for `name`
    pub fn lookup(&self, name: &str) -> Option<FontFile> {
        self.lock().get(name).cloned()
    }
}

static REGISTRY: LazyLock<Arc<FontRegistry>> = LazyLock::new(|| Arc::new(FontRegistry::new()));

/// Access the process-wide [`FontRegistry`]
pub fn registry() -> Arc<FontRegistry> {
    REGISTRY.clone()
}

/// Font engine: loads faces from a [`FontRegistry`]
///
/// The engine holds its registry explicitly; components needing faces are
/// passed a reference to an engine.
#[derive(Clone, Debug)]
pub struct FontEngine {
    registry: Arc<FontRegistry>,
}

impl Default for FontEngine {
    fn default() -> Self {
        FontEngine::new()
    }
}

impl FontEngine {
    /// Construct over the process-wide registry
    pub fn new() -> Self {
        FontEngine::with_registry(registry())
    }

    /// Construct over the given registry
    pub fn with_registry(registry: Arc<FontRegistry>) -> Self {
        FontEngine { registry }
    }

    /// Access the registry
    #[inline]
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// See [`FontRegistry::is_font_file`]
    #[inline]
    pub fn is_font_file(path: &Path) -> bool {
        FontRegistry::is_font_file(path)
    }

    /// See [`FontRegistry::register_font`]
    #[inline]
    pub fn register_font(&self, path: impl AsRef<Path>) -> bool {
        self.registry.register_font(path)
    }

    /// See [`FontRegistry::register_fonts`]
    #[inline]
    pub fn register_fonts(&self, dir: impl AsRef<Path>, recurse: bool) -> bool {
        self.registry.register_fonts(dir, recurse)
    }

    /// See [`FontRegistry::face_names`]
    #[inline]
    pub fn face_names(&self) -> Vec<String> {
        self.registry.face_names()
    }

    /// See [`FontRegistry::get_mapping`]
    #[inline]
    pub fn get_mapping(&self) -> BTreeMap<String, FontFile> {
        self.registry.get_mapping()
    }

    /// Load a face by registered name
    pub fn try_create_face(&self, family_name: &str) -> Result<FacePtr, FontError> {
        let file = self
            .registry
            .lookup(family_name)
            .ok_or_else(|| FontError::Unregistered(family_name.to_string()))?;
        let face = FontFace::from_file(&file.path, file.index)?;
        Ok(Rc::new(face))
    }

    /// Load a new instance of a face by registered name
    ///
    /// Returns `None` if the name is not registered or loading fails.
    pub fn create_face(&self, family_name: &str) -> Option<FacePtr> {
        match self.try_create_face(family_name) {
            Ok(face) => Some(face),
            Err(FontError::Unregistered(name)) => {
                log::debug!("create_face: \"{name}\" is not registered");
                None
            }
            Err(err) => {
                log::warn!("Failed to load face \"{family_name}\": {err}");
                None
            }
        }
    }

    /// Construct a new stroker
    pub fn create_stroker(&self) -> Stroker {
        Stroker::new()
    }
}
