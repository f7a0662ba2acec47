//! Rigid-body handle and collision descriptors of a physics-backed entity.
//!
//! A [`PhysicsBody`] keeps the rapier handle of the entity's body plus one
//! [`Collision`] descriptor per logical fixture group (the body itself, and
//! for the player also the foot sensor). Colliders never point at the
//! descriptor directly: their user data is a [`ColliderLink`], the entity id
//! and descriptor slot, which the contact dispatcher resolves through the ECS.
//! A despawned entity therefore resolves to nothing instead of dangling.
//!
//! # Related
//!
//! - [`crate::events::contact`] – resolves links and runs the callbacks
//! - [`crate::resources::physics::Physics`] – owns the rigid bodies

use bevy_ecs::prelude::{Component, Entity, World};
use rapier2d::prelude::RigidBodyHandle;
use smallvec::SmallVec;

/// Callback run when a fixture group starts or stops touching another one.
///
/// `this` is the descriptor the callback was registered on, `other` the
/// descriptor on the opposite side of the contact.
pub type ContactCallback = fn(world: &mut World, this: &Collision, other: &Collision);

/// Coarse classification of what a fixture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Undefined,
    Terrain,
    Movable,
    Player,
    Sensor,
    Platform,
    Bouncer,
    Trigger,
}

impl CollisionKind {
    /// Kinds the player can stand on.
    pub fn supports_footing(self) -> bool {
        matches!(
            self,
            CollisionKind::Terrain
                | CollisionKind::Movable
                | CollisionKind::Platform
                | CollisionKind::Bouncer
        )
    }
}

/// Descriptor attached (by link) to every fixture of a physics-backed entity.
#[derive(Clone, Copy)]
pub struct Collision {
    pub owner: Entity,
    pub kind: CollisionKind,
    pub on_collide: Option<ContactCallback>,
    pub on_uncollide: Option<ContactCallback>,
}

impl Collision {
    pub fn new(owner: Entity, kind: CollisionKind) -> Self {
        Self {
            owner,
            kind,
            on_collide: None,
            on_uncollide: None,
        }
    }

    pub fn with_callbacks(mut self, on_collide: ContactCallback, on_uncollide: ContactCallback) -> Self {
        self.on_collide = Some(on_collide);
        self.on_uncollide = Some(on_uncollide);
        self
    }
}

impl std::fmt::Debug for Collision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collision")
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .field("on_collide", &self.on_collide.is_some())
            .field("on_uncollide", &self.on_uncollide.is_some())
            .finish()
    }
}

/// Collider user data: which entity and which of its descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderLink {
    pub entity: Entity,
    pub slot: u8,
}

const LINK_TAG: u128 = 1 << 127;
const ENTITY_MASK: u128 = u64::MAX as u128;

impl ColliderLink {
    pub fn new(entity: Entity, slot: u8) -> Self {
        Self { entity, slot }
    }

    pub fn to_user_data(self) -> u128 {
        LINK_TAG | ((self.slot as u128) << 64) | self.entity.to_bits() as u128
    }

    /// `None` for colliders that carry no link (user data left at rapier's default).
    pub fn from_user_data(data: u128) -> Option<Self> {
        if data & LINK_TAG == 0 {
            return None;
        }
        let bits = (data & ENTITY_MASK) as u64;
        let slot = ((data >> 64) & 0xFF) as u8;
        Some(Self {
            entity: Entity::from_bits(bits),
            slot,
        })
    }
}

/// Slot of the descriptor covering the entity's main fixtures.
pub const BODY_SLOT: u8 = 0;
/// Slot of the player's foot sensor descriptor.
pub const FOOT_SLOT: u8 = 1;

/// Physics hookup of an entity.
#[derive(Component, Debug, Clone)]
pub struct PhysicsBody {
    pub handle: RigidBodyHandle,
    collisions: SmallVec<[Collision; 2]>,
}

impl PhysicsBody {
    pub fn new(handle: RigidBodyHandle, body: Collision) -> Self {
        let mut collisions = SmallVec::new();
        collisions.push(body);
        Self { handle, collisions }
    }

    /// Add another descriptor and return its slot.
    pub fn push_collision(&mut self, collision: Collision) -> u8 {
        self.collisions.push(collision);
        (self.collisions.len() - 1) as u8
    }

    pub fn collision(&self, slot: u8) -> Option<&Collision> {
        self.collisions.get(slot as usize)
    }

    pub fn kind(&self) -> CollisionKind {
        self.collisions[BODY_SLOT as usize].kind
    }
}
