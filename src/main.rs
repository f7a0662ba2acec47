//! Wonder World entry point.
//!
//! A 2D platformer written in Rust using:
//! - **raylib** for windowing, graphics, and audio
//! - **bevy_ecs** for the level's entities and systems
//! - **rapier2d** for the physics simulation
//!
//! # Main Loop
//!
//! 1. Load the INI configuration, open the window, start the audio thread
//! 2. Each frame:
//!    - poll input into [`InputState`]
//!    - let [`Game`] handle the current screen and fill a [`Frame`]
//!    - forward queued audio commands to the audio thread
//!    - upload the textures and fonts the frame needs, then present it
//! 3. Stop the audio thread on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config config.ini
//! cargo run --release -- --level levels/level1.json
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;
use log::{debug, error, info};

use ww_platformer::frame::Frame;
use ww_platformer::game::Game;
use ww_platformer::resources::audio::AudioBridge;
use ww_platformer::resources::fontstore::FontStore;
use ww_platformer::resources::gameconfig::GameConfig;
use ww_platformer::resources::gamestate::GameStates;
use ww_platformer::resources::input::InputState;
use ww_platformer::resources::screensize::ScreenSize;
use ww_platformer::resources::texturestore::TextureStore;
use ww_platformer::systems::input::update_input_state;
use ww_platformer::systems::render::present;

/// Wonder World, a physics platformer
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Game configuration file.
    #[arg(long, value_name = "PATH", default_value_os_t = GameConfig::default_path())]
    config: PathBuf,

    /// Skip the menus and play this level file.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match GameConfig::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let window = config.window.clone();

    let (mut rl, thread) = raylib::init()
        .size(window.width, window.height)
        .title(&window.caption)
        .build();
    rl.set_target_fps(window.target_fps);
    // Escape goes back a screen instead of closing the window
    rl.set_exit_key(None);
    if window.fullscreen {
        rl.toggle_fullscreen();
    }
    info!(
        "window {}x{} '{}' at {} fps",
        window.width, window.height, window.caption, window.target_fps
    );

    let audio = AudioBridge::spawn();
    let mut game = Game::new(config);
    if let Some(level) = cli.level {
        if let Err(e) = game.start_level_file(&level) {
            error!("cannot start level {:?}: {}", level, e);
        }
    }

    let mut textures = TextureStore::new();
    let mut fonts = FontStore::new();
    let default_font = rl.get_font_default();
    let mut input = InputState::default();
    let mut frame = Frame::new(ScreenSize::new(window.width, window.height));

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        update_input_state(&mut input, &rl);
        frame.begin(ScreenSize::new(rl.get_screen_width(), rl.get_screen_height()));

        let state = game.update(&input, dt, &mut frame);
        audio.forward(game.audio_mut());
        for message in audio.poll() {
            debug!("audio: {:?}", message);
        }
        if state == GameStates::Exit {
            break;
        }

        for key in frame.texture_keys() {
            textures.ensure(&mut rl, &thread, key);
        }
        for key in frame.font_keys() {
            fonts.ensure(&mut rl, &thread, key);
        }

        let mut d = rl.begin_drawing(&thread);
        present(&mut d, &frame, &textures, &fonts, &default_font);
    }

    info!("{} textures and {} fonts were loaded", textures.len(), fonts.len());
    audio.shutdown();
}
