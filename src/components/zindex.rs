//! Z-index component for render ordering.
//!
//! Level entities receive increasing [`ZIndex`] values in the order they are
//! spawned, so the painter's order matches the load order: transparent layers,
//! opaque layers, then objects.

use bevy_ecs::prelude::Component;

/// Rendering order hint for 2D drawing.
///
/// Higher values are drawn later (on top).
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
