//! Top-level screen flow.
//!
//! [`Game`] drives the screens of the game: main menu, level selection, the
//! level being played and the win/fail screens. Each frame `main` hands it
//! the input state, the frame time and an empty [`Frame`]; the game handles
//! the input for the current screen, fills the frame, and applies any
//! transition requested through [`NextGameState`] at the end of the frame,
//! starting the music of the screen being entered.
//!
//! Nothing here touches raylib: screens are laid out from image sizes read by
//! [`ImageStore`] and audio goes out through an [`AudioQueue`].

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use raylib::prelude::{Color, Rectangle, Vector2};
use rustc_hash::FxHashSet;

use crate::error::LoadError;
use crate::frame::{DrawCmd, Frame};
use crate::level::spawn::path_key;
use crate::resources::audio::{AudioQueue, MusicPlaylist};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::imagestore::ImageStore;
use crate::resources::input::InputState;
use crate::world::World;

/// Weight of the newest frame time in the smoothed tick delta.
const DT_SMOOTHING: f32 = 0.4;

/// Tint of level icons that cannot be entered yet.
const LOCKED_TINT: Color = Color::BLUE;

/// Where a level to start comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LevelRequest {
    /// Entry of the level list.
    Listed(usize),
    /// File given on the command line.
    File(PathBuf),
}

pub struct Game {
    config: GameConfig,
    state: GameState,
    next: NextGameState,
    world: World,
    music: MusicPlaylist,
    audio: AudioQueue,
    images: ImageStore,
    missing_images: FxHashSet<PathBuf>,
    /// Level whose loading screen was shown last frame.
    loading: Option<LevelRequest>,
    fdt: f32,
}

fn track(path: &Option<PathBuf>) -> Option<String> {
    path.as_deref().map(path_key)
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut music = MusicPlaylist::default();
        for (state, path) in [
            (GameStates::Menu, track(&config.menu.music)),
            (GameStates::LevelSelect, track(&config.levels.music)),
            (GameStates::Win, track(&config.win.music)),
            (GameStates::Fail, track(&config.fail.music)),
        ] {
            if let Some(path) = path {
                music.set_music(state, path);
            }
        }

        let mut game = Self {
            config,
            state: GameState::new(GameStates::Menu),
            next: NextGameState::new(),
            world: World::new(),
            music,
            audio: AudioQueue::default(),
            images: ImageStore::new(),
            missing_images: FxHashSet::default(),
            loading: None,
            fdt: 0.0,
        };
        game.enter(GameStates::Menu);
        game
    }

    pub fn state(&self) -> GameStates {
        self.state.get()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Audio commands issued since the last drain.
    pub fn audio_mut(&mut self) -> &mut AudioQueue {
        &mut self.audio
    }

    /// Load a level file directly, bypassing the menus. On success the game
    /// is in [`GameStates::Playing`].
    pub fn start_level_file(&mut self, path: impl Into<PathBuf>) -> Result<(), LoadError> {
        self.start(LevelRequest::File(path.into()))?;
        self.apply_transition();
        Ok(())
    }

    /// Handle one frame. Returns the state the game is in afterwards.
    pub fn update(&mut self, input: &InputState, dt: f32, frame: &mut Frame) -> GameStates {
        match self.state.get() {
            GameStates::Menu => self.menu(input, frame),
            GameStates::LevelSelect => self.level_select(input, frame),
            GameStates::Playing => self.playing(input, dt, frame),
            GameStates::Win => self.info_screen(input, frame, GameStates::Win),
            GameStates::Fail => self.info_screen(input, frame, GameStates::Fail),
            GameStates::Exit => {}
        }
        self.world.drain_audio(&mut self.audio);
        self.apply_transition();
        self.state.get()
    }

    fn apply_transition(&mut self) {
        if let Some(state) = self.next.take() {
            info!("game state {:?} -> {:?}", self.state.get(), state);
            self.state.set(state);
            self.enter(state);
        }
    }

    fn enter(&mut self, state: GameStates) {
        if state == GameStates::Playing {
            self.fdt = 0.0;
        }
        self.music.play(state, &mut self.audio);
    }

    fn image_size(&mut self, path: &Path) -> Option<Vector2> {
        match self.images.size(path) {
            Ok((w, h)) => Some(Vector2::new(w as f32, h as f32)),
            Err(e) => {
                if self.missing_images.insert(path.to_path_buf()) {
                    warn!("{}", e);
                }
                None
            }
        }
    }

    /// Draw a whole image with its top-left corner at `at`. Returns where it landed.
    fn place(&mut self, frame: &mut Frame, path: &Path, at: Vector2, tint: Color) -> Option<Rectangle> {
        let size = self.image_size(path)?;
        let dest = Rectangle::new(at.x, at.y, size.x, size.y);
        frame.overlay.push(DrawCmd::image(
            path_key(path),
            Rectangle::new(0.0, 0.0, size.x, size.y),
            dest,
            tint,
        ));
        Some(dest)
    }

    fn stretch(&mut self, frame: &mut Frame, path: &Path) {
        let Some(size) = self.image_size(path) else {
            return;
        };
        let dest = Rectangle::new(0.0, 0.0, frame.screen.w as f32, frame.screen.h as f32);
        frame.overlay.push(DrawCmd::image(
            path_key(path),
            Rectangle::new(0.0, 0.0, size.x, size.y),
            dest,
            Color::WHITE,
        ));
    }

    /// Draw an image centered on screen, or horizontally centered at `top` when given.
    fn center(&mut self, frame: &mut Frame, path: &Path, top: Option<f32>) -> Option<Rectangle> {
        let size = self.image_size(path)?;
        let x = (frame.screen.w as f32 - size.x) / 2.0;
        let y = top.unwrap_or((frame.screen.h as f32 - size.y) / 2.0);
        self.place(frame, path, Vector2::new(x, y), Color::WHITE)
    }

    fn menu(&mut self, input: &InputState, frame: &mut Frame) {
        let background = self.config.menu.background.clone();
        let start = self.config.menu.start.clone();
        let exit = self.config.menu.exit.clone();
        let h = frame.screen.h as f32;

        self.stretch(frame, &background);
        let start_rect = self.center(frame, &start, Some(h / 4.0));
        let exit_rect = self.center(frame, &exit, Some(h / 2.0));

        if !input.mouse_clicked {
            return;
        }
        let hit = |rect: Option<Rectangle>| {
            rect.is_some_and(|r| r.check_collision_point_rec(input.mouse_position))
        };
        if hit(start_rect) {
            self.next.set(GameStates::LevelSelect);
        } else if hit(exit_rect) {
            self.next.set(GameStates::Exit);
        }
    }

    /// Top-left corner of level icon `index`.
    fn icon_position(&self, frame: &Frame, index: usize) -> Vector2 {
        let levels = &self.config.levels;
        let xpart = frame.screen.w as f32 / (levels.per_line + 2) as f32;
        let ypart = frame.screen.h as f32 / (levels.lines + 2) as f32;
        Vector2::new(
            xpart + (index % levels.per_line) as f32 * xpart,
            ypart + (index / levels.per_line) as f32 * ypart,
        )
    }

    fn level_select(&mut self, input: &InputState, frame: &mut Frame) {
        let loading = self.config.levels.loading.clone();

        if let Some(request) = self.loading.take() {
            self.center(frame, &loading, None);
            if let Err(e) = self.start(request) {
                error!("level could not be started: {}", e);
            }
            return;
        }

        if input.back.just_pressed {
            self.next.set(GameStates::Menu);
        }

        let background = self.config.levels.background.clone();
        self.stretch(frame, &background);

        let mut clicked = None;
        for index in 0..self.config.levels.levels.len() {
            let unlocked = self.config.levels.is_unlocked(index);
            let image = self.config.levels.levels[index].image.clone();
            let at = self.icon_position(frame, index);
            let tint = if unlocked { Color::WHITE } else { LOCKED_TINT };
            let Some(rect) = self.place(frame, &image, at, tint) else {
                continue;
            };
            if unlocked && input.mouse_clicked && rect.check_collision_point_rec(input.mouse_position) {
                clicked = Some(index);
            }
        }

        if let Some(index) = clicked {
            self.center(frame, &loading, None);
            self.loading = Some(LevelRequest::Listed(index));
        }
    }

    /// Set the level's music and load it. Requests Playing on success.
    fn start(&mut self, request: LevelRequest) -> Result<(), LoadError> {
        let (file, music) = match &request {
            LevelRequest::Listed(index) => {
                let entry = &self.config.levels.levels[*index];
                (entry.file.clone(), track(&entry.music))
            }
            LevelRequest::File(path) => (path.clone(), None),
        };
        match music {
            Some(path) => self.music.set_music(GameStates::Playing, path),
            None => self.music.clear_music(GameStates::Playing),
        }

        self.world.load_from_file(&file)?;
        if self.world.player().is_none() {
            return Err(LoadError::malformed(&file, "level has no player"));
        }
        self.next.set(GameStates::Playing);
        Ok(())
    }

    fn playing(&mut self, input: &InputState, dt: f32, frame: &mut Frame) {
        if input.back.just_pressed {
            self.next.set(GameStates::LevelSelect);
        }

        self.fdt = dt * DT_SMOOTHING + self.fdt * (1.0 - DT_SMOOTHING);
        self.world.set_intent(input.move_intent());
        self.world.run_game_timing(self.fdt);

        if self.world.is_fail() {
            self.next.set(GameStates::Fail);
        } else if self.world.is_win() {
            if let Some(level) = self.world.last_level().map(Path::to_path_buf) {
                match self.config.mark_level_completed(&level) {
                    Ok(true) => {}
                    Ok(false) => info!("level {:?} is not in the level list", level),
                    Err(e) => error!("could not record completed level: {}", e),
                }
            }
            self.next.set(GameStates::Win);
        }

        self.world.run_drawing(frame);
    }

    fn info_screen(&mut self, input: &InputState, frame: &mut Frame, state: GameStates) {
        let screen = if state == GameStates::Win {
            &self.config.win
        } else {
            &self.config.fail
        };
        let (background, image) = (screen.background.clone(), screen.image.clone());
        self.stretch(frame, &background);
        self.center(frame, &image, None);

        if input.back.just_pressed {
            self.next.set(GameStates::LevelSelect);
        }
    }
}
