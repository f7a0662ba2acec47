//! Rigid-body simulation resource backed by rapier2d.
//!
//! [`Physics`] owns every rapier set plus the pipeline, and is the only place
//! in the crate that talks rapier types beyond handles. Gameplay code works
//! in raylib `Vector2`s expressed in physics units; [`pixel_to_physic`] and
//! [`physic_to_pixel`] convert at 10 pixels per unit.
//!
//! Bodies are created with [`Physics::create_body`] and fixtures attached
//! with [`Physics::create_fixture`]. Every fixture reports collision events;
//! [`Physics::step`] collects them through a channel during the step and
//! returns them as [`Contact`]s carrying both colliders' user data, to be
//! dispatched once the step has fully resolved.
//!
//! Friction combines with the minimum of both sides (a zero-friction edge
//! never grips), restitution with the maximum (a bounce pad bounces whatever
//! lands on it). Box2D mixes friction as `sqrt(a * b)`, which rapier has no
//! rule for, so grip between two nonzero materials is weaker than in a Box2D
//! level: terrain at 0.1 under a player at 1.0 grips with 0.1, not 0.32.

use std::num::NonZeroUsize;

use bevy_ecs::prelude::Resource;
use log::debug;
use rapier2d::prelude::*;
use raylib::prelude::Vector2;

use crate::events::contact::{Contact, ContactPhase};

pub const PIXELS_PER_UNIT: f32 = 10.0;
pub const VELOCITY_ITERATIONS: usize = 6;
pub const POSITION_ITERATIONS: usize = 2;

pub fn pixel_to_physic(v: f32) -> f32 {
    v / PIXELS_PER_UNIT
}

pub fn physic_to_pixel(v: f32) -> f32 {
    v * PIXELS_PER_UNIT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    /// Moved by setting its velocity; unaffected by forces and contacts.
    Kinematic,
    Dynamic { fixed_rotation: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureShape {
    /// Segment between two points relative to the body.
    Edge(Vector2, Vector2),
    /// Box with the given half extents centered at `offset`.
    Box { half_extents: Vector2, offset: Vector2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureDef {
    pub shape: FixtureShape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub sensor: bool,
    pub user_data: u128,
}

impl FixtureDef {
    pub fn new(shape: FixtureShape, user_data: u128) -> Self {
        Self {
            shape,
            density: 0.0,
            friction: 0.0,
            restitution: 0.0,
            sensor: false,
            user_data,
        }
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }
}

fn to_vector(v: Vector2) -> rapier2d::math::Vector<Real> {
    vector![v.x, v.y]
}

fn to_vector2(v: &rapier2d::math::Vector<Real>) -> Vector2 {
    Vector2::new(v.x, v.y)
}

#[derive(Resource)]
pub struct Physics {
    pipeline: PhysicsPipeline,
    gravity: rapier2d::math::Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl Physics {
    pub fn new(gravity: Vector2) -> Self {
        let mut integration_params = IntegrationParameters::default();
        integration_params.num_solver_iterations =
            NonZeroUsize::new(VELOCITY_ITERATIONS).unwrap_or(NonZeroUsize::MIN);
        integration_params.num_internal_stabilization_iterations = POSITION_ITERATIONS;
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: to_vector(gravity),
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    pub fn gravity(&self) -> Vector2 {
        to_vector2(&self.gravity)
    }

    /// Create a body at `position` (physics units).
    pub fn create_body(&mut self, kind: BodyKind, position: Vector2) -> RigidBodyHandle {
        let builder = match kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
            BodyKind::Dynamic { fixed_rotation } => {
                let builder = RigidBodyBuilder::dynamic();
                if fixed_rotation {
                    builder.lock_rotations()
                } else {
                    builder
                }
            }
        };
        self.rigid_body_set
            .insert(builder.translation(to_vector(position)).build())
    }

    /// Attach a fixture to `body`.
    pub fn create_fixture(&mut self, body: RigidBodyHandle, def: &FixtureDef) -> ColliderHandle {
        let builder = match def.shape {
            FixtureShape::Edge(a, b) => ColliderBuilder::segment(point![a.x, a.y], point![b.x, b.y]),
            FixtureShape::Box {
                half_extents,
                offset,
            } => ColliderBuilder::cuboid(half_extents.x, half_extents.y).translation(to_vector(offset)),
        };
        let collider = builder
            .density(def.density)
            .friction(def.friction)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(def.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .sensor(def.sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(def.user_data)
            .build();
        self.collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set)
    }

    /// Remove a body and its fixtures. Returns false if it was already gone.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    /// True for static bodies, which never move.
    pub fn is_fixed(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.get(handle).is_some_and(|rb| rb.is_fixed())
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vector2> {
        self.rigid_body_set
            .get(handle)
            .map(|rb| to_vector2(rb.translation()))
    }

    /// Body angle in radians.
    pub fn angle(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set
            .get(handle)
            .map(|rb| rb.rotation().angle())
    }

    pub fn linvel(&self, handle: RigidBodyHandle) -> Option<Vector2> {
        self.rigid_body_set
            .get(handle)
            .map(|rb| to_vector2(rb.linvel()))
    }

    pub fn mass(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set.get(handle).map(|rb| rb.mass())
    }

    pub fn set_linvel(&mut self, handle: RigidBodyHandle, velocity: Vector2) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_linvel(to_vector(velocity), true);
        }
    }

    /// Replace the force applied to the body during the next step.
    pub fn apply_force(&mut self, handle: RigidBodyHandle, force: Vector2) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.reset_forces(true);
            rb.add_force(to_vector(force), true);
        }
    }

    /// Advance the simulation by `dt` seconds and return the contacts that
    /// began or ended during the step. Non-positive `dt` does nothing.
    ///
    /// Events whose colliders no longer exist (removed bodies) are dropped.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        if dt <= 0.0 {
            return Vec::new();
        }
        self.integration_params.dt = dt;

        let (collision_send, collision_recv) = rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) = rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut contacts = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            let (phase, h1, h2) = match event {
                CollisionEvent::Started(h1, h2, _) => (ContactPhase::Began, h1, h2),
                CollisionEvent::Stopped(h1, h2, _) => (ContactPhase::Ended, h1, h2),
            };
            let a = self.collider_set.get(h1).map(|c| c.user_data);
            let b = self.collider_set.get(h2).map(|c| c.user_data);
            match (a, b) {
                (Some(a), Some(b)) => contacts.push(Contact { phase, a, b }),
                _ => debug!("dropping {:?} contact with a removed collider", phase),
            }
        }
        contacts
    }
}
