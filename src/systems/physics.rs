//! Physics step and transform sync.
//!
//! [`physics_step`] is an exclusive system: contact callbacks need the whole
//! ECS world, so the contacts collected during the step are dispatched once
//! the step has returned. [`sync_transforms`] then copies body positions back
//! into [`MapPosition`]/[`Rotation`] for drawing.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::physicsbody::PhysicsBody;
use crate::components::rotation::Rotation;
use crate::events::contact::dispatch_contact;
use crate::resources::physics::{Physics, physic_to_pixel};
use crate::resources::worldtime::WorldTime;

pub fn physics_step(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    let contacts = world.resource_mut::<Physics>().step(dt);
    for contact in contacts {
        dispatch_contact(world, contact);
    }
}

/// Bodies are drawn at the floor of their pixel position. Static bodies keep
/// the position they were spawned with.
pub fn sync_transforms(
    mut bodies: Query<(&PhysicsBody, &mut MapPosition, &mut Rotation)>,
    physics: Res<Physics>,
) {
    for (body, mut position, mut rotation) in bodies.iter_mut() {
        if physics.is_fixed(body.handle) {
            continue;
        }
        let (Some(translation), Some(angle)) =
            (physics.translation(body.handle), physics.angle(body.handle))
        else {
            continue;
        };
        position.pos.x = physic_to_pixel(translation.x).floor();
        position.pos.y = physic_to_pixel(translation.y).floor();
        rotation.degrees = angle.to_degrees();
    }
}
