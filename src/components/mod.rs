//! ECS components for level entities.
//!
//! Every level object is a flat entity assembled from these components; the
//! variant it plays (terrain, platform, trigger, ...) follows from which of
//! them it carries.
//!
//! Submodules overview:
//! - [`animation`] – frame sequences keyed by movement state
//! - [`group`] – tag naming the entity variant
//! - [`hud`] – the player's overlay
//! - [`mapposition`] – world-space pivot in pixels
//! - [`physicsbody`] – rigid-body handle and collision descriptors
//! - [`platform`] – kinematic patrol between two points
//! - [`player`] – life, coins, footing and movement intent
//! - [`rotation`] – rotation angle in degrees
//! - [`sprite`] – 2D sprite rendering component
//! - [`trigger`] – bonus/hazard applying an effect on contact
//! - [`zindex`] – rendering order hint for 2D drawing

pub mod animation;
pub mod group;
pub mod hud;
pub mod mapposition;
pub mod physicsbody;
pub mod platform;
pub mod player;
pub mod rotation;
pub mod sprite;
pub mod trigger;
pub mod zindex;
