//! Contact notifications and their dispatch to collision callbacks.
//!
//! [`Physics::step`](crate::resources::physics::Physics::step) reports every
//! contact that began or ended as a [`Contact`] holding the user data of both
//! colliders. [`dispatch_contact`] turns the user data back into
//! [`Collision`] descriptors and, only if both sides resolve, runs each
//! side's callback with the other side's descriptor. A side without a
//! callback simply has no interest in the contact.
//!
//! Dispatch happens after the step has returned, so callbacks can mutate
//! components freely; anything that must remove bodies only flags itself and
//! is cleaned up at the end of the tick.

use bevy_ecs::prelude::World;
use log::trace;

use crate::components::physicsbody::{ColliderLink, Collision, PhysicsBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Began,
    Ended,
}

/// One contact event between two colliders, by user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub phase: ContactPhase,
    pub a: u128,
    pub b: u128,
}

/// Look up the descriptor a collider's user data points at.
pub fn resolve_collision(world: &World, user_data: u128) -> Option<Collision> {
    let link = ColliderLink::from_user_data(user_data)?;
    let body = world.get::<PhysicsBody>(link.entity)?;
    body.collision(link.slot).copied()
}

/// Notify both sides of `contact`.
pub fn dispatch_contact(world: &mut World, contact: Contact) {
    let (Some(a), Some(b)) = (
        resolve_collision(world, contact.a),
        resolve_collision(world, contact.b),
    ) else {
        return;
    };
    trace!("{:?} {:?} <-> {:?}", contact.phase, a.kind, b.kind);
    let (callback_a, callback_b) = match contact.phase {
        ContactPhase::Began => (a.on_collide, b.on_collide),
        ContactPhase::Ended => (a.on_uncollide, b.on_uncollide),
    };
    if let Some(callback) = callback_a {
        callback(world, &a, &b);
    }
    if let Some(callback) = callback_b {
        callback(world, &b, &a);
    }
}
