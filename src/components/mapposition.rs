use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// World-space pivot of an entity in pixels.
///
/// Decoration keeps the position it was spawned with; physics-backed entities
/// get it rewritten from their rigid body after every step.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vector2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vector2 { x, y },
        }
    }
}
