//! Texture store used by the presenter.
//!
//! Textures are keyed by the resolved image path carried in draw commands and
//! uploaded on first use. A path that fails to load is remembered and
//! skipped afterwards, so a broken asset logs once instead of every frame.
//!
//! Raylib textures must stay on the main thread, so the store lives in
//! `main` next to the window rather than in an ECS world.

use log::{debug, warn};
use raylib::prelude::{RaylibHandle, RaylibThread, Texture2D};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Default)]
pub struct TextureStore {
    map: FxHashMap<String, Texture2D>,
    failed: FxHashSet<String>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload `key` if it is not loaded yet.
    pub fn ensure(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, key: &str) {
        if self.map.contains_key(key) || self.failed.contains(key) {
            return;
        }
        match rl.load_texture(thread, key) {
            Ok(texture) => {
                debug!("texture loaded '{}'", key);
                self.map.insert(key.to_string(), texture);
            }
            Err(e) => {
                warn!("texture load failed '{}': {}", key, e);
                self.failed.insert(key.to_string());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Texture2D> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
