//! Image size cache used while building levels.
//!
//! Level loading needs the pixel size of every tile and sprite sheet to
//! place entities and shape their bodies, but never the pixels themselves.
//! [`ImageStore`] reads only the image header through
//! [`image::image_dimensions`], so a level can be built without a window or
//! GPU. Textures are uploaded later, lazily, by the presenter's
//! [`TextureStore`](crate::resources::texturestore::TextureStore).

use std::path::{Path, PathBuf};

use log::debug;
use rustc_hash::FxHashMap;

use crate::error::LoadError;

#[derive(Debug, Default)]
pub struct ImageStore {
    sizes: FxHashMap<PathBuf, (u32, u32)>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width and height of the image at `path`, reading its header on first use.
    pub fn size(&mut self, path: &Path) -> Result<(u32, u32), LoadError> {
        if let Some(size) = self.sizes.get(path) {
            return Ok(*size);
        }
        let size = image::image_dimensions(path).map_err(|e| LoadError::missing_asset(path, e))?;
        debug!("image {:?} is {}x{}", path, size.0, size.1);
        self.sizes.insert(path.to_path_buf(), size);
        Ok(size)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_size_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.png");
        image::RgbaImage::new(32, 16).save(&path).unwrap();

        let mut store = ImageStore::new();
        assert_eq!(store.size(&path).unwrap(), (32, 16));
        assert_eq!(store.size(&path).unwrap(), (32, 16));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reads_jpeg_and_bmp_headers() {
        let dir = tempfile::tempdir().unwrap();
        let jpg = dir.path().join("menu.jpg");
        let bmp = dir.path().join("icon.bmp");
        image::RgbImage::new(24, 12).save(&jpg).unwrap();
        image::RgbImage::new(8, 40).save(&bmp).unwrap();

        let mut store = ImageStore::new();
        assert_eq!(store.size(&jpg).unwrap(), (24, 12));
        assert_eq!(store.size(&bmp).unwrap(), (8, 40));
    }

    #[test]
    fn unreadable_image_is_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let mut store = ImageStore::new();
        assert!(store.size(&path).unwrap_err().is_missing_asset());
        assert!(store.size(&dir.path().join("absent.png")).unwrap_err().is_missing_asset());
        assert!(store.is_empty());
    }
}
