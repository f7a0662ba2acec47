//! Wonder World platformer.
//!
//! A 2D platform game built on `bevy_ecs`, `rapier2d` and raylib. Levels are
//! Tiled maps loaded into a [`world::World`], whose entities are driven by
//! physics contacts; [`game::Game`] runs the menus around it.

pub mod components;
pub mod error;
pub mod events;
pub mod frame;
pub mod game;
pub mod level;
pub mod resources;
pub mod systems;
pub mod world;
