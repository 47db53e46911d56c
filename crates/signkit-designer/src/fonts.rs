//! Font lookup and caching.
//!
//! Wraps a `fontdb` database with a cache of parsed `rusttype` faces keyed
//! by (family, bold, italic). Raw font bytes are retained so the export
//! pipeline can embed the faces actually used by a design. The catalog is an
//! injected dependency of the session and exporter, never a global.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::Font;
use std::{
    collections::{HashMap, HashSet},
    fs,
    sync::{Arc, Mutex},
};

#[derive(Clone, Eq, PartialEq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

/// A parsed face together with the bytes it was parsed from.
pub struct LoadedFace {
    pub font: Font<'static>,
    pub data: Vec<u8>,
}

/// Font database with a face cache.
pub struct FontCatalog {
    db: Database,
    cache: Mutex<HashMap<FaceKey, Option<Arc<LoadedFace>>>>,
}

impl FontCatalog {
    /// Catalog backed by the system font database.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self {
            db,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Catalog with no faces at all. Measurement falls back to the
    /// average-character-width heuristic; useful for deterministic tests.
    pub fn empty() -> Self {
        Self {
            db: Database::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// All distinct family names known to the catalog, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut set = HashSet::new();
        for face in self.db.faces() {
            for (name, _) in &face.families {
                set.insert(name.clone());
            }
        }
        let mut out: Vec<_> = set.into_iter().collect();
        out.sort();
        out
    }

    /// Looks up the face for (family, bold, italic), loading and caching it
    /// on first use. Returns `None` when no face matches.
    pub fn face(&self, family: &str, bold: bool, italic: bool) -> Option<Arc<LoadedFace>> {
        let key = FaceKey {
            family: family.to_string(),
            bold,
            italic,
        };

        let mut cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(entry) = cache.get(&key) {
            return entry.clone();
        }

        let loaded = self.load_face(family, bold, italic).map(Arc::new);
        cache.insert(key, loaded.clone());
        loaded
    }

    /// Whether a usable face exists for the combination. This is the
    /// "font ready" signal auto-fit waits on after a family change.
    pub fn is_available(&self, family: &str, bold: bool, italic: bool) -> bool {
        self.face(family, bold, italic).is_some()
    }

    fn load_face(&self, family: &str, bold: bool, italic: bool) -> Option<LoadedFace> {
        let families: Vec<Family<'_>> = match family.trim() {
            "" | "Sans" => vec![Family::SansSerif],
            "Serif" => vec![Family::Serif],
            "Monospace" => vec![Family::Monospace],
            other => vec![Family::Name(other), Family::SansSerif],
        };

        let query = Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            stretch: Stretch::Normal,
            style: if italic { Style::Italic } else { Style::Normal },
        };

        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;

        let bytes = match &face.source {
            fontdb::Source::File(path) => fs::read(path).ok()?,
            fontdb::Source::SharedFile(path, _) => fs::read(path).ok()?,
            fontdb::Source::Binary(bytes) => bytes.as_ref().as_ref().to_vec(),
        };

        let font = Font::try_from_vec(bytes.clone())?;
        Some(LoadedFace { font, data: bytes })
    }
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new()
    }
}
