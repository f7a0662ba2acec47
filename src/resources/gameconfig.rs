//! Game configuration.
//!
//! Window settings, the assets of every screen and the level list with its
//! completion flags, loaded from an INI file. Asset paths are resolved
//! against the directory holding the INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 600
//! caption = Wonder World
//! fullscreen = 0
//! fps = 60
//!
//! [menu]
//! background = img/menu_bg.png
//! start = img/start.png
//! exit = img/exit.png
//! music = snd/menu.ogg
//!
//! [levels]
//! background = img/levels_bg.png
//! loading = img/loading.png
//! per_line = 4
//! lines = 3
//! music = snd/levels.ogg
//! count = 2
//!
//! [level.0]
//! image = img/level0.png
//! file = maps/level0.json
//! music = snd/level0.ogg
//! completed = 0
//!
//! [win]
//! background = img/win_bg.png
//! image = img/win.png
//! music = snd/win.ogg
//!
//! [fail]
//! background = img/fail_bg.png
//! image = img/fail.png
//! ```
//!
//! `music` keys are optional everywhere; every other key is required.

use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, resolve_relative};

const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_TARGET_FPS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    pub caption: String,
    pub fullscreen: bool,
    pub target_fps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    pub background: PathBuf,
    pub start: PathBuf,
    pub exit: PathBuf,
    pub music: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub image: PathBuf,
    pub file: PathBuf,
    pub music: Option<PathBuf>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelsConfig {
    pub background: PathBuf,
    pub loading: PathBuf,
    pub per_line: usize,
    pub lines: usize,
    pub music: Option<PathBuf>,
    pub levels: Vec<LevelEntry>,
}

impl LevelsConfig {
    /// Level `index` can be entered when it is the first one or its
    /// predecessor has been completed.
    pub fn is_unlocked(&self, index: usize) -> bool {
        index == 0
            || self
                .levels
                .get(index - 1)
                .is_some_and(|previous| previous.completed)
    }
}

/// Background and centered image of the win and fail screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoConfig {
    pub background: PathBuf,
    pub image: PathBuf,
    pub music: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub menu: MenuConfig,
    pub levels: LevelsConfig,
    pub win: InfoConfig,
    pub fail: InfoConfig,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

fn level_section(index: usize) -> String {
    format!("level.{index}")
}

struct Reader<'a> {
    ini: &'a Ini,
    path: &'a Path,
}

impl Reader<'_> {
    fn string(&self, section: &str, key: &str) -> Result<String, LoadError> {
        self.ini
            .get(section, key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| LoadError::malformed(self.path, format!("missing [{section}] {key}")))
    }

    fn asset(&self, section: &str, key: &str) -> Result<PathBuf, LoadError> {
        Ok(resolve_relative(self.path, &self.string(section, key)?))
    }

    fn optional_asset(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.ini
            .get(section, key)
            .filter(|value| !value.is_empty())
            .map(|value| resolve_relative(self.path, &value))
    }

    fn uint(&self, section: &str, key: &str) -> Result<u64, LoadError> {
        self.ini
            .getuint(section, key)
            .map_err(|e| LoadError::malformed(self.path, format!("[{section}] {key}: {e}")))?
            .ok_or_else(|| LoadError::malformed(self.path, format!("missing [{section}] {key}")))
    }

    fn flag(&self, section: &str, key: &str) -> Result<bool, LoadError> {
        self.ini
            .getboolcoerce(section, key)
            .map_err(|e| LoadError::malformed(self.path, format!("[{section}] {key}: {e}")))?
            .ok_or_else(|| LoadError::malformed(self.path, format!("missing [{section}] {key}")))
    }

    fn info(&self, section: &str) -> Result<InfoConfig, LoadError> {
        Ok(InfoConfig {
            background: self.asset(section, "background")?,
            image: self.asset(section, "image")?,
            music: self.optional_asset(section, "music"),
        })
    }
}

impl GameConfig {
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Load the configuration from an INI file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|e| LoadError::missing_asset(path, format!("failed to load config file: {e}")))?;
        let r = Reader { ini: &ini, path };

        let window = WindowConfig {
            width: r.uint("window", "width")? as i32,
            height: r.uint("window", "height")? as i32,
            caption: r.string("window", "caption")?,
            fullscreen: r.flag("window", "fullscreen")?,
            target_fps: ini
                .getuint("window", "fps")
                .ok()
                .flatten()
                .map_or(DEFAULT_TARGET_FPS, |fps| fps as u32),
        };

        let menu = MenuConfig {
            background: r.asset("menu", "background")?,
            start: r.asset("menu", "start")?,
            exit: r.asset("menu", "exit")?,
            music: r.optional_asset("menu", "music"),
        };

        let count = r.uint("levels", "count")? as usize;
        let mut levels = Vec::with_capacity(count);
        for index in 0..count {
            let section = level_section(index);
            levels.push(LevelEntry {
                image: r.asset(&section, "image")?,
                file: r.asset(&section, "file")?,
                music: r.optional_asset(&section, "music"),
                completed: r.flag(&section, "completed")?,
            });
        }
        let per_line = r.uint("levels", "per_line")? as usize;
        let lines = r.uint("levels", "lines")? as usize;
        if per_line == 0 || lines == 0 {
            return Err(LoadError::malformed(path, "[levels] per_line and lines must be positive"));
        }
        let levels = LevelsConfig {
            background: r.asset("levels", "background")?,
            loading: r.asset("levels", "loading")?,
            per_line,
            lines,
            music: r.optional_asset("levels", "music"),
            levels,
        };

        let config = GameConfig {
            window,
            menu,
            levels,
            win: r.info("win")?,
            fail: r.info("fail")?,
            config_path: path.to_path_buf(),
        };

        info!(
            "Loaded config {:?}: {}x{} window, fps={}, fullscreen={}, {} levels",
            config.config_path,
            config.window.width,
            config.window.height,
            config.window.target_fps,
            config.window.fullscreen,
            config.levels.levels.len()
        );
        Ok(config)
    }

    /// Mark the level whose (resolved) file is `level_file` as completed and
    /// write the flag back to the INI file.
    ///
    /// Returns `Ok(false)` when no configured level matches.
    pub fn mark_level_completed(&mut self, level_file: &Path) -> Result<bool, LoadError> {
        let Some(index) = self
            .levels
            .levels
            .iter()
            .position(|level| level.file == level_file)
        else {
            return Ok(false);
        };
        self.levels.levels[index].completed = true;

        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(|e| {
            LoadError::missing_asset(&self.config_path, format!("failed to reload config file: {e}"))
        })?;
        ini.set(&level_section(index), "completed", Some("1".to_string()));
        ini.write(&self.config_path)
            .map_err(|e| LoadError::missing_asset(&self.config_path, format!("failed to save config file: {e}")))?;

        info!("Level {:?} marked as completed", level_file);
        Ok(true)
    }
}
