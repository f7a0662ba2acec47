//! Level systems.
//!
//! The gameplay systems run in a fixed chain every tick (see
//! [`crate::world::World`]); the rest are called directly by the game loop.
//!
//! Submodules overview
//! - [`audio`] – the background audio thread
//! - [`cleanup`] – despawn triggers spent during the tick
//! - [`input`] – read hardware input into [`crate::resources::input::InputState`]
//! - [`physics`] – step the simulation, dispatch contacts, sync transforms
//! - [`platform`] – drive patrol platforms between their endpoints
//! - [`player`] – player steering, sounds and animation state
//! - [`render`] – fill a [`crate::frame::Frame`] from the world and present it with raylib
//! - [`time`] – advance the level clock

pub mod audio;
pub mod cleanup;
pub mod input;
pub mod physics;
pub mod platform;
pub mod player;
pub mod render;
pub mod time;
