//! End-of-tick removal of spent triggers.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::physicsbody::PhysicsBody;
use crate::components::trigger::Trigger;
use crate::resources::physics::Physics;

/// Remove the body of every spent trigger, then despawn it.
///
/// Runs after the physics step so a trigger spent by this tick's contacts is
/// gone before the next one.
pub fn destroy_spent_triggers(
    mut commands: Commands,
    triggers: Query<(Entity, &Trigger, Option<&PhysicsBody>)>,
    mut physics: ResMut<Physics>,
) {
    for (entity, trigger, body) in triggers.iter() {
        if !trigger.wants_destroy() {
            continue;
        }
        if let Some(body) = body {
            physics.remove_body(body.handle);
        }
        commands.entity(entity).despawn();
        debug!("trigger {:?} destroyed", entity);
    }
}
