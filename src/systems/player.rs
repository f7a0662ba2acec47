//! Player systems.
//!
//! - [`player_logic`] turns the tick's [`MoveIntent`] into a force on the
//!   player's body and queues the step and jump sounds.
//! - [`player_animation`] picks the movement state from footing and body
//!   velocity, advances the [`Animation`] and points the sprite at its frame.
//!
//! Both run before the physics step, so the force set here is integrated in
//! the same tick.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::animation::Animation;
use crate::components::physicsbody::PhysicsBody;
use crate::components::player::{MoveIntent, Player, SOUND_JUMP, SOUND_STEP};
use crate::components::sprite::Sprite;
use crate::resources::audio::AudioQueue;
use crate::resources::physics::Physics;
use crate::resources::worldtime::WorldTime;

pub fn player_logic(
    mut players: Query<(&PhysicsBody, &mut Player)>,
    mut physics: ResMut<Physics>,
    mut audio: ResMut<AudioQueue>,
    intent: Res<MoveIntent>,
    time: Res<WorldTime>,
) {
    for (body, mut player) in players.iter_mut() {
        let (Some(velocity), Some(mass)) = (physics.linvel(body.handle), physics.mass(body.handle))
        else {
            continue;
        };
        let steering = player.steer(*intent, velocity, mass, time.delta);
        physics.apply_force(body.handle, steering.force);

        if steering.jumped {
            audio.play_fx(SOUND_JUMP);
        } else if player.is_grounded() && player.desired_vx != 0.0 {
            audio.play_fx_if_idle(SOUND_STEP);
        }
    }
}

pub fn player_animation(
    mut players: Query<(&PhysicsBody, &Player, &mut Animation, &mut Sprite)>,
    physics: Res<Physics>,
    time: Res<WorldTime>,
) {
    for (body, player, mut animation, mut sprite) in players.iter_mut() {
        let velocity = physics.linvel(body.handle).unwrap_or(Vector2::zero());
        let target = player.target_state(velocity, animation.state());
        animation.animate(target, time.delta);
        sprite.set_frame(animation.frame(false).to_rectangle());
    }
}
