//! The player: life, coins, footing and movement intent.
//!
//! The foot contact counter is fed by the foot sensor's contact callbacks. It
//! is a counter rather than a flag because the sensor may overlap several
//! supports at once (two terrain tiles, a tile and a crate, ...).
//!
//! Movement converges the horizontal velocity to the desired one within a
//! single tick by applying `mass * dv / dt` as a force. Jumping is
//! edge-triggered: holding the jump intent never jumps twice.

use bevy_ecs::prelude::{Component, Resource};
use raylib::prelude::Vector2;

use crate::components::animation::MoveState;

/// Velocity magnitude (physics units/s) under which the player counts as still.
pub const DEADBAND: f32 = 0.1;

/// Sound effect ids registered with the audio thread when a player spawns.
pub const SOUND_STEP: &str = "player_step";
pub const SOUND_JUMP: &str = "player_jump";
pub const SOUND_GET_LIVE: &str = "player_getlive";
pub const SOUND_GET_COIN: &str = "player_getcoin";

/// Directional and jump intents for one logic tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Result of one logic tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub force: Vector2,
    pub jumped: bool,
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub life: i32,
    pub total_life: i32,
    pub coins: i32,
    pub win_coins: i32,
    pub desired_vx: f32,
    foot_contacts: u32,
    jump_held: bool,
}

impl Player {
    pub fn new(move_speed: f32, jump_speed: f32, lives: i32, win_coins: i32) -> Self {
        Self {
            move_speed,
            jump_speed,
            life: lives,
            total_life: lives.max(0),
            coins: 0,
            win_coins,
            desired_vx: 0.0,
            foot_contacts: 0,
            jump_held: false,
        }
    }

    /// Foot sensor started touching a support.
    pub fn land(&mut self) {
        self.foot_contacts += 1;
    }

    /// Foot sensor stopped touching a support.
    pub fn leave(&mut self) {
        self.foot_contacts = self.foot_contacts.saturating_sub(1);
    }

    pub fn foot_contacts(&self) -> u32 {
        self.foot_contacts
    }

    pub fn is_grounded(&self) -> bool {
        self.foot_contacts > 0
    }

    /// Apply a bonus or damage. Life is clamped to `[0, total]`, coins are not.
    pub fn effect(&mut self, live: i32, coin: i32) {
        self.life = (self.life + live).clamp(0, self.total_life);
        self.coins += coin;
    }

    pub fn is_win(&self) -> bool {
        self.coins >= self.win_coins
    }

    pub fn is_fail(&self) -> bool {
        self.life <= 0
    }

    /// Turn intents into the force to apply this tick.
    ///
    /// `velocity` and `mass` come from the rigid body. With `dt <= 0` no
    /// force is produced and the jump latch is left alone, so a press made
    /// during a paused tick still jumps on the next running one.
    pub fn steer(&mut self, intent: MoveIntent, velocity: Vector2, mass: f32, dt: f32) -> Steering {
        self.desired_vx = if intent.left {
            -self.move_speed
        } else if intent.right {
            self.move_speed
        } else {
            0.0
        };
        if dt <= 0.0 {
            return Steering {
                force: Vector2::zero(),
                jumped: false,
            };
        }
        let impulse_x = mass * (self.desired_vx - velocity.x);

        let mut impulse_y = 0.0;
        let jumped = intent.jump && !self.jump_held && self.is_grounded();
        if jumped {
            impulse_y = -(mass * self.jump_speed);
        }
        self.jump_held = intent.jump;

        Steering {
            force: Vector2::new(impulse_x / dt, impulse_y / dt),
            jumped,
        }
    }

    /// Animation state for this tick. Y grows downward, so rising means a
    /// negative vertical velocity.
    pub fn target_state(&self, velocity: Vector2, previous: MoveState) -> MoveState {
        let left = previous.faces_left();
        if self.is_grounded() {
            if self.desired_vx > DEADBAND {
                MoveState::MoveRight
            } else if self.desired_vx < -DEADBAND {
                MoveState::MoveLeft
            } else if left {
                MoveState::StayLeft
            } else {
                MoveState::StayRight
            }
        } else {
            let rising = velocity.y < -DEADBAND;
            let facing_left = if velocity.x > DEADBAND {
                false
            } else if velocity.x < -DEADBAND {
                true
            } else {
                left
            };
            match (rising, facing_left) {
                (true, true) => MoveState::JumpLeft,
                (true, false) => MoveState::JumpRight,
                (false, true) => MoveState::FallLeft,
                (false, false) => MoveState::FallRight,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    const JUMP: MoveIntent = MoveIntent {
        left: false,
        right: false,
        jump: true,
    };

    #[test]
    fn life_is_clamped_both_ways() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        p.effect(-1000, 0);
        assert_eq!(p.life, 0);
        p.effect(1000, 0);
        assert_eq!(p.life, 3);
    }

    #[test]
    fn coins_are_not_clamped() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        p.effect(0, 7);
        p.effect(0, 2);
        assert_eq!(p.coins, 9);
    }

    #[test]
    fn win_threshold() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        p.effect(0, 4);
        assert!(!p.is_win());
        p.effect(0, 1);
        assert!(p.is_win());
    }

    #[test]
    fn fail_exactly_at_zero_life() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        p.effect(-1, 0);
        assert!(!p.is_fail());
        p.effect(-1, 0);
        assert!(!p.is_fail());
        p.effect(-1, 0);
        assert!(p.is_fail());
    }

    #[test]
    fn no_lives_starts_failed() {
        let mut p = Player::new(10.0, 30.0, 0, 5);
        assert!(p.is_fail());
        let mut q = Player::new(10.0, 30.0, -2, 5);
        assert!(q.is_fail());
        q.effect(1, 0);
        assert_eq!(q.life, 0);
        p.effect(1, 0);
        assert!(p.is_fail());
    }

    #[test]
    fn foot_counter_tracks_overlapping_contacts() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        p.land();
        p.land();
        p.leave();
        assert!(p.is_grounded());
        p.leave();
        assert!(!p.is_grounded());
        p.leave();
        assert_eq!(p.foot_contacts(), 0);
    }

    #[test]
    fn horizontal_force_converges_in_one_tick() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        let intent = MoveIntent {
            right: true,
            ..Default::default()
        };
        let s = p.steer(intent, Vector2::new(4.0, 0.0), 2.0, 0.5);
        assert!(approx_eq(p.desired_vx, 10.0));
        assert!(approx_eq(s.force.x, 2.0 * 6.0 / 0.5));
        assert!(approx_eq(s.force.y, 0.0));
    }

    #[test]
    fn left_wins_over_right() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        let intent = MoveIntent {
            left: true,
            right: true,
            jump: false,
        };
        p.steer(intent, Vector2::zero(), 1.0, 0.1);
        assert!(approx_eq(p.desired_vx, -10.0));
    }

    #[test]
    fn jump_needs_footing_and_fresh_press() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        assert!(!p.steer(JUMP, Vector2::zero(), 1.0, 0.1).jumped);

        p.land();
        // still held since the airborne press
        assert!(!p.steer(JUMP, Vector2::zero(), 1.0, 0.1).jumped);

        p.steer(MoveIntent::default(), Vector2::zero(), 1.0, 0.1);
        let s = p.steer(JUMP, Vector2::zero(), 1.0, 0.1);
        assert!(s.jumped);
        assert!(approx_eq(s.force.y, -30.0 / 0.1));
        assert!(!p.steer(JUMP, Vector2::zero(), 1.0, 0.1).jumped);
    }

    #[test]
    fn zero_dt_produces_no_force() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        p.land();
        let s = p.steer(JUMP, Vector2::new(3.0, 0.0), 1.0, 0.0);
        assert_eq!(s.force, Vector2::zero());
        assert!(!s.jumped);
    }

    #[test]
    fn press_during_paused_tick_jumps_on_the_next() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        p.land();
        assert!(!p.steer(JUMP, Vector2::zero(), 1.0, 0.0).jumped);
        let s = p.steer(JUMP, Vector2::zero(), 1.0, 0.1);
        assert!(s.jumped);
        assert!(approx_eq(s.force.y, -30.0 / 0.1));
    }

    #[test]
    fn grounded_states_follow_desired_velocity() {
        let mut p = Player::new(10.0, 30.0, 3, 5);
        p.land();
        p.desired_vx = 10.0;
        assert_eq!(p.target_state(Vector2::zero(), MoveState::StayLeft), MoveState::MoveRight);
        p.desired_vx = -10.0;
        assert_eq!(p.target_state(Vector2::zero(), MoveState::StayRight), MoveState::MoveLeft);
        p.desired_vx = 0.05;
        assert_eq!(p.target_state(Vector2::new(5.0, 0.0), MoveState::MoveLeft), MoveState::StayLeft);
        assert_eq!(p.target_state(Vector2::zero(), MoveState::FallRight), MoveState::StayRight);
    }

    #[test]
    fn airborne_states_follow_body_velocity() {
        let p = Player::new(10.0, 30.0, 3, 5);
        assert_eq!(p.target_state(Vector2::new(2.0, -3.0), MoveState::StayLeft), MoveState::JumpRight);
        assert_eq!(p.target_state(Vector2::new(-2.0, 3.0), MoveState::StayRight), MoveState::FallLeft);
        assert_eq!(p.target_state(Vector2::new(0.0, -3.0), MoveState::MoveLeft), MoveState::JumpLeft);
        assert_eq!(p.target_state(Vector2::new(0.05, 0.0), MoveState::JumpRight), MoveState::FallRight);
    }
}
