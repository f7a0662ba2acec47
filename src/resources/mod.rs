//! Long-lived data used by the game and the level world.
//!
//! Some of these are ECS resources inserted into the level's world (physics,
//! time, audio outbox); the rest are owned by the game loop directly.
//!
//! Overview
//! - `audio` – audio outbox, music playlist and the bridge to the audio thread
//! - `fontstore` – fonts loaded lazily by path
//! - `gameconfig` – INI game configuration and level progress
//! - `gamestate` – authoritative and pending high-level game state
//! - `imagestore` – image sizes read from file headers
//! - `input` – per-frame keyboard and mouse state
//! - `physics` – the rapier simulation of the current level
//! - `screensize` – current framebuffer dimensions in pixels
//! - `texturestore` – textures loaded lazily by path
//! - `worldtime` – level clock and time warp
pub mod audio;
pub mod fontstore;
pub mod gameconfig;
pub mod gamestate;
pub mod imagestore;
pub mod input;
pub mod physics;
pub mod screensize;
pub mod texturestore;
pub mod worldtime;
