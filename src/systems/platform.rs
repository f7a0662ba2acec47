//! Patrol platform logic.
use bevy_ecs::prelude::*;

use crate::components::physicsbody::PhysicsBody;
use crate::components::platform::PatrolPlatform;
use crate::resources::physics::Physics;
use crate::resources::worldtime::WorldTime;

/// Push every platform toward its current target.
///
/// On the tick a platform arrives it only swaps its endpoints and keeps its
/// previous velocity; the new heading is applied from the next tick on.
pub fn platform_logic(
    mut platforms: Query<(&PhysicsBody, &mut PatrolPlatform)>,
    mut physics: ResMut<Physics>,
    time: Res<WorldTime>,
) {
    for (body, mut patrol) in platforms.iter_mut() {
        let Some(position) = physics.translation(body.handle) else {
            continue;
        };
        if let Some(velocity) = patrol.steer(position, time.delta) {
            physics.set_linvel(body.handle, velocity);
        }
    }
}
