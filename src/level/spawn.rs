//! Entity spawning, one function per level entity variant.
//!
//! Every spawned entity gets a [`Sprite`], a [`MapPosition`] at its center in
//! pixels, a [`Rotation`], a [`Group`] tag and the next [`ZIndex`], so the
//! draw order follows the spawn order. Physics-backed variants additionally
//! get a rigid body whose fixtures carry a [`ColliderLink`] back to the
//! entity.
//!
//! Fixture geometry is in physics units, relative to the body center, with
//! `hw`/`hh` the half extents of the tile image:
//!
//! - terrain and triggers are closed by four edges carrying the same material;
//! - platforms and bounce pads have a top edge inset by 0.1 that carries the
//!   material, while the slanted sides and the bottom have none, so a rider
//!   never snags on a corner;
//! - movable crates and the player are solid boxes.
//!
//! The contact callbacks for triggers and the player's foot sensor live here
//! too, next to the fixtures they are registered on.

use std::path::Path;

use bevy_ecs::prelude::{Entity, World};
use log::debug;
use raylib::prelude::Vector2;

use crate::components::group::Group;
use crate::components::hud::Hud;
use crate::components::mapposition::MapPosition;
use crate::components::physicsbody::{
    BODY_SLOT, ColliderLink, Collision, CollisionKind, FOOT_SLOT, PhysicsBody,
};
use crate::components::platform::PatrolPlatform;
use crate::components::player::{
    Player, SOUND_GET_COIN, SOUND_GET_LIVE, SOUND_JUMP, SOUND_STEP,
};
use crate::components::rotation::Rotation;
use crate::components::sprite::Sprite;
use crate::components::trigger::Trigger;
use crate::components::zindex::ZIndex;
use crate::events::audio::AudioCmd;
use crate::level::player::PlayerConfig;
use crate::resources::audio::AudioQueue;
use crate::resources::physics::{BodyKind, FixtureDef, FixtureShape, Physics, pixel_to_physic};

/// Inset of the material-carrying top edge of platforms and bounce pads.
const TOP_INSET: f32 = 0.1;
/// Half height of the player's foot sensor.
const FOOT_HALF_HEIGHT: f32 = 0.3;

/// Tile image as placed in the level: texture key and pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub key: String,
    pub width: f32,
    pub height: f32,
}

impl Tile {
    pub fn new(path: &Path, width: u32, height: u32) -> Self {
        Self {
            key: path_key(path),
            width: width as f32,
            height: height as f32,
        }
    }

    fn half_extents(&self) -> (f32, f32) {
        (pixel_to_physic(self.width) / 2.0, pixel_to_physic(self.height) / 2.0)
    }
}

/// Texture/font key for an asset path.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn v(x: f32, y: f32) -> Vector2 {
    Vector2::new(x, y)
}

/// Bottom, left, top and right edges of a `hw` x `hh` box.
fn closed_edges(hw: f32, hh: f32) -> [(Vector2, Vector2); 4] {
    [
        (v(hw, hh), v(-hw, hh)),
        (v(-hw, hh), v(-hw, -hh)),
        (v(-hw, -hh), v(hw, -hh)),
        (v(hw, -hh), v(hw, hh)),
    ]
}

/// Spawns level entities into an ECS world that already holds a [`Physics`]
/// resource and an [`AudioQueue`].
pub struct Spawner<'w> {
    world: &'w mut World,
    next_z: i32,
}

impl<'w> Spawner<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world, next_z: 0 }
    }

    /// Number of entities spawned so far.
    pub fn spawned(&self) -> i32 {
        self.next_z
    }

    fn visual(&mut self, sprite: Sprite, center: Vector2, group: Group) -> Entity {
        let z = ZIndex(self.next_z);
        self.next_z += 1;
        let entity = self
            .world
            .spawn((
                sprite,
                MapPosition::new(center.x, center.y),
                Rotation::default(),
                z,
                group,
            ))
            .id();
        debug!("spawned {} {:?} at ({}, {})", group.name(), entity, center.x, center.y);
        entity
    }

    /// Create the body for `entity` at `center` (pixels) and attach one
    /// fixture per definition, all linked to the body descriptor.
    fn attach(
        &mut self,
        entity: Entity,
        kind: BodyKind,
        center: Vector2,
        collision: Collision,
        fixtures: &[FixtureDef],
    ) -> PhysicsBody {
        let mut physics = self.world.resource_mut::<Physics>();
        let handle = physics.create_body(
            kind,
            v(pixel_to_physic(center.x), pixel_to_physic(center.y)),
        );
        let link = ColliderLink::new(entity, BODY_SLOT).to_user_data();
        for fixture in fixtures {
            physics.create_fixture(handle, &FixtureDef { user_data: link, ..*fixture });
        }
        PhysicsBody::new(handle, collision)
    }

    /// Pure decoration: drawn, never simulated.
    pub fn decoration(&mut self, tile: &Tile, center: Vector2) -> Entity {
        let sprite = Sprite::centered(tile.key.clone(), tile.width, tile.height);
        self.visual(sprite, center, Group::DECORATION)
    }

    /// Static terrain closed by four edges.
    pub fn terrain(&mut self, tile: &Tile, center: Vector2, friction: f32) -> Entity {
        let sprite = Sprite::centered(tile.key.clone(), tile.width, tile.height);
        let entity = self.visual(sprite, center, Group::TERRAIN);
        let (hw, hh) = tile.half_extents();
        let fixtures = closed_edges(hw, hh)
            .map(|(a, b)| FixtureDef::new(FixtureShape::Edge(a, b), 0).friction(friction));
        let body = self.attach(
            entity,
            BodyKind::Static,
            center,
            Collision::new(entity, CollisionKind::Terrain),
            &fixtures,
        );
        self.world.entity_mut(entity).insert(body);
        entity
    }

    /// Kinematic platform patrolling between `center` and `destination` (pixels).
    pub fn platform(
        &mut self,
        tile: &Tile,
        center: Vector2,
        destination: Vector2,
        friction: f32,
        speed: f32,
    ) -> Entity {
        let sprite = Sprite::centered(tile.key.clone(), tile.width, tile.height);
        let entity = self.visual(sprite, center, Group::PLATFORM);
        let (hw, hh) = tile.half_extents();
        let edge = |a, b| FixtureDef::new(FixtureShape::Edge(a, b), 0);
        let fixtures = [
            edge(v(hw - TOP_INSET, -hh), v(-hw + TOP_INSET, -hh)).friction(friction),
            edge(v(-hw + TOP_INSET, -hh + TOP_INSET), v(-hw, hh)),
            edge(v(-hw, hh), v(hw, hh)),
            edge(v(hw, hh), v(hw - TOP_INSET, -hh + TOP_INSET)),
        ];
        let body = self.attach(
            entity,
            BodyKind::Kinematic,
            center,
            Collision::new(entity, CollisionKind::Platform),
            &fixtures,
        );
        let patrol = PatrolPlatform::new(
            v(pixel_to_physic(center.x), pixel_to_physic(center.y)),
            v(pixel_to_physic(destination.x), pixel_to_physic(destination.y)),
            speed,
        );
        self.world.entity_mut(entity).insert((body, patrol));
        entity
    }

    /// Static bounce pad: only the top edge has friction and restitution.
    pub fn bouncer(&mut self, tile: &Tile, center: Vector2, friction: f32, restitution: f32) -> Entity {
        let sprite = Sprite::centered(tile.key.clone(), tile.width, tile.height);
        let entity = self.visual(sprite, center, Group::BOUNCER);
        let (hw, hh) = tile.half_extents();
        let edge = |a, b| FixtureDef::new(FixtureShape::Edge(a, b), 0);
        let fixtures = [
            edge(v(hw - TOP_INSET, -hh), v(-hw + TOP_INSET, -hh))
                .friction(friction)
                .restitution(restitution),
            edge(v(-hw - TOP_INSET, -hh + TOP_INSET), v(-hw, hh)),
            edge(v(-hw, hh), v(hw, hh)),
            edge(v(hw, hh), v(hw - TOP_INSET, -hh)),
        ];
        let body = self.attach(
            entity,
            BodyKind::Static,
            center,
            Collision::new(entity, CollisionKind::Bouncer),
            &fixtures,
        );
        self.world.entity_mut(entity).insert(body);
        entity
    }

    /// Static bonus or hazard applying `(live, coin)` to whatever touches it.
    #[allow(clippy::too_many_arguments)]
    pub fn trigger(
        &mut self,
        tile: &Tile,
        center: Vector2,
        friction: f32,
        restitution: f32,
        live: i32,
        coin: i32,
        destroyable: bool,
    ) -> Entity {
        let sprite = Sprite::centered(tile.key.clone(), tile.width, tile.height);
        let entity = self.visual(sprite, center, Group::TRIGGER);
        let (hw, hh) = tile.half_extents();
        let fixtures = closed_edges(hw, hh).map(|(a, b)| {
            FixtureDef::new(FixtureShape::Edge(a, b), 0)
                .friction(friction)
                .restitution(restitution)
        });
        let collision =
            Collision::new(entity, CollisionKind::Trigger).with_callbacks(trigger_began, trigger_ended);
        let body = self.attach(entity, BodyKind::Static, center, collision, &fixtures);
        self.world
            .entity_mut(entity)
            .insert((body, Trigger::new(live, coin, destroyable)));
        entity
    }

    /// Dynamic crate fully governed by the simulation.
    pub fn movable(&mut self, tile: &Tile, center: Vector2, density: f32, friction: f32) -> Entity {
        let sprite = Sprite::centered(tile.key.clone(), tile.width, tile.height);
        let entity = self.visual(sprite, center, Group::MOVABLE);
        let (hw, hh) = tile.half_extents();
        let fixture = FixtureDef::new(
            FixtureShape::Box {
                half_extents: v(hw, hh),
                offset: Vector2::zero(),
            },
            0,
        )
        .density(density)
        .friction(friction);
        let body = self.attach(
            entity,
            BodyKind::Dynamic { fixed_rotation: false },
            center,
            Collision::new(entity, CollisionKind::Movable),
            &[fixture],
        );
        self.world.entity_mut(entity).insert(body);
        entity
    }

    /// The player: upright dynamic box with a foot sensor under it.
    ///
    /// Also queues the player's sound effects for loading.
    pub fn player(&mut self, config: &PlayerConfig, center: Vector2) -> Entity {
        let def = &config.def;
        let frame = def.animation.default.to_rectangle();
        let mut sprite = Sprite::centered(path_key(&config.sheet), 0.0, 0.0);
        sprite.set_frame(frame);
        let (width, height) = (sprite.width, sprite.height);
        let entity = self.visual(sprite, center, Group::PLAYER);

        let hw = pixel_to_physic(width) / 2.0;
        let hh = pixel_to_physic(height) / 2.0;
        let hull = FixtureDef::new(
            FixtureShape::Box {
                half_extents: v(hw, hh),
                offset: Vector2::zero(),
            },
            0,
        )
        .density(def.density)
        .friction(def.friction);
        let mut body = self.attach(
            entity,
            BodyKind::Dynamic { fixed_rotation: true },
            center,
            Collision::new(entity, CollisionKind::Player),
            &[hull],
        );

        let foot = FixtureDef::new(
            FixtureShape::Box {
                half_extents: v(hw - TOP_INSET, FOOT_HALF_HEIGHT),
                offset: v(0.0, hh),
            },
            ColliderLink::new(entity, FOOT_SLOT).to_user_data(),
        )
        .sensor();
        let slot = body.push_collision(
            Collision::new(entity, CollisionKind::Sensor).with_callbacks(foot_began, foot_ended),
        );
        debug_assert_eq!(slot, FOOT_SLOT);
        self.world
            .resource_mut::<Physics>()
            .create_fixture(body.handle, &foot);

        let hud = Hud {
            image: path_key(&config.hud_image),
            font: path_key(&config.hud_font),
            font_size: def.hud.fontsize,
            live: def.hud.live,
            coin: def.hud.coin,
        };
        self.world.entity_mut(entity).insert((
            body,
            def.animation.build(),
            Player::new(def.xvelocity, def.yvelocity, def.lives, def.wincoin),
            hud,
        ));

        let mut audio = self.world.resource_mut::<AudioQueue>();
        for (id, path) in [
            (SOUND_STEP, &config.step_sound),
            (SOUND_JUMP, &config.jump_sound),
            (SOUND_GET_LIVE, &config.getlive_sound),
            (SOUND_GET_COIN, &config.getcoin_sound),
        ] {
            audio.push(AudioCmd::LoadFx {
                id: id.to_string(),
                path: path_key(path),
            });
        }
        entity
    }
}

/// Apply a trigger's effect to `target`. Only the player reacts; anything
/// else absorbs the effect.
pub fn apply_effect(world: &mut World, target: Entity, live: i32, coin: i32) {
    let Some(mut player) = world.get_mut::<Player>(target) else {
        return;
    };
    player.effect(live, coin);
    debug!(
        "player effect live={} coin={} -> life {}/{} coins {}/{}",
        live, coin, player.life, player.total_life, player.coins, player.win_coins
    );
    let mut audio = world.resource_mut::<AudioQueue>();
    if live > 0 {
        audio.play_fx(SOUND_GET_LIVE);
    }
    if coin > 0 {
        audio.play_fx(SOUND_GET_COIN);
    }
}

fn trigger_began(world: &mut World, this: &Collision, other: &Collision) {
    let (live, coin) = {
        let Some(mut trigger) = world.get_mut::<Trigger>(this.owner) else {
            return;
        };
        if !trigger.touch(other.owner) {
            return;
        }
        (trigger.live, trigger.coin)
    };
    apply_effect(world, other.owner, live, coin);
}

fn trigger_ended(world: &mut World, this: &Collision, other: &Collision) {
    if let Some(mut trigger) = world.get_mut::<Trigger>(this.owner) {
        trigger.release(other.owner);
    }
}

fn foot_began(world: &mut World, this: &Collision, other: &Collision) {
    if !other.kind.supports_footing() {
        return;
    }
    if let Some(mut player) = world.get_mut::<Player>(this.owner) {
        player.land();
    }
}

fn foot_ended(world: &mut World, this: &Collision, other: &Collision) {
    if !other.kind.supports_footing() {
        return;
    }
    if let Some(mut player) = world.get_mut::<Player>(this.owner) {
        player.leave();
    }
}
