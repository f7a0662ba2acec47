//! Font store used by the presenter.
//!
//! Same lazy scheme as the
//! [`TextureStore`](crate::resources::texturestore::TextureStore): fonts are
//! keyed by resolved path and loaded the first time a text command uses them.
//! Text whose font failed to load falls back to raylib's default font.

use log::{debug, warn};
use raylib::prelude::{Font, RaylibHandle, RaylibThread};
use rustc_hash::{FxHashMap, FxHashSet};

/// Map of font paths to loaded fonts.
#[derive(Default)]
pub struct FontStore {
    fonts: FxHashMap<String, Font>,
    failed: FxHashSet<String>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `key` if it is not loaded yet.
    pub fn ensure(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, key: &str) {
        if self.fonts.contains_key(key) || self.failed.contains(key) {
            return;
        }
        match rl.load_font(thread, key) {
            Ok(font) => {
                debug!("font loaded '{}'", key);
                self.fonts.insert(key.to_string(), font);
            }
            Err(e) => {
                warn!("font load failed '{}': {}", key, e);
                self.failed.insert(key.to_string());
            }
        }
    }

    /// Get a font by its key.
    pub fn get(&self, id: impl AsRef<str>) -> Option<&Font> {
        self.fonts.get(id.as_ref())
    }

    /// Get the number of loaded fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
