//! Load-time errors.
//!
//! Everything that reads a file the game depends on (the game config, level
//! maps, player descriptions, images, fonts, sounds) reports failures as a
//! [`LoadError`]. Contract violations (querying a world with no player) are
//! panics instead: they are caller bugs, not data problems.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// A required attribute or section is absent, or a value is out of its domain.
    #[error("malformed {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
    /// A referenced file could not be opened or decoded.
    #[error("missing asset {}: {reason}", .path.display())]
    MissingAsset { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn malformed(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn missing_asset(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        LoadError::MissingAsset {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, LoadError::Malformed { .. })
    }

    pub fn is_missing_asset(&self) -> bool {
        matches!(self, LoadError::MissingAsset { .. })
    }
}

/// Read a whole text file, mapping I/O failures to [`LoadError::MissingAsset`].
pub fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::missing_asset(path, e))
}

/// Fail with [`LoadError::MissingAsset`] unless `path` names an existing file.
pub fn require_file(path: &Path) -> Result<(), LoadError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoadError::missing_asset(path, "file not found"))
    }
}

/// Resolve `relative` against the directory containing `referrer`.
pub fn resolve_relative(referrer: &Path, relative: &str) -> PathBuf {
    let candidate = Path::new(relative);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    match referrer.parent() {
        Some(dir) => dir.join(candidate),
        None => candidate.to_path_buf(),
    }
}
