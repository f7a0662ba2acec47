use bevy_ecs::prelude::Component;

/// Clockwise rotation in degrees, mirrored from the rigid body angle.
#[derive(Component, Clone, Debug, Copy, Default)]
pub struct Rotation {
    pub degrees: f32,
}
