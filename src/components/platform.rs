//! Kinematic platform patrolling between two points.
//!
//! Positions are in physics units. Each logic tick the platform is pushed
//! toward its current target; once it is within [`ARRIVAL_DISTANCE`] of it the
//! endpoints swap and the next tick heads back.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Distance (physics units) at which the platform counts as arrived.
pub const ARRIVAL_DISTANCE: f32 = 1.0;

#[derive(Component, Clone, Copy, Debug)]
pub struct PatrolPlatform {
    pub source: Vector2,
    pub target: Vector2,
    pub speed: f32,
}

impl PatrolPlatform {
    pub fn new(source: Vector2, target: Vector2, speed: f32) -> Self {
        Self {
            source,
            target,
            speed,
        }
    }

    /// Velocity to apply for this tick, or `None` when the platform arrived
    /// and swapped its endpoints instead.
    ///
    /// The velocity magnitude is `dt * speed`, so the configured speed is
    /// expressed per squared second of level time.
    pub fn steer(&mut self, position: Vector2, dt: f32) -> Option<Vector2> {
        let dx = self.target.x - position.x;
        let dy = self.target.y - position.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > ARRIVAL_DISTANCE {
            Some(Vector2::new(
                dt * self.speed * (dx / distance),
                dt * self.speed * (dy / distance),
            ))
        } else {
            std::mem::swap(&mut self.source, &mut self.target);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heads_toward_target() {
        let mut platform = PatrolPlatform::new(Vector2::new(0.0, 0.0), Vector2::new(0.0, 5.0), 60.0);
        let vel = platform.steer(Vector2::new(0.0, 0.0), 0.5).unwrap();
        assert!(vel.x.abs() < 1e-6);
        assert!((vel.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn reverses_after_reaching_destination() {
        let dt = 1.0 / 60.0;
        let mut platform = PatrolPlatform::new(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0), 120.0);
        let mut pos = Vector2::new(0.0, 0.0);

        let mut ticks = 0;
        while let Some(vel) = platform.steer(pos, dt) {
            assert!(vel.x > 0.0);
            pos.x += vel.x * dt;
            ticks += 1;
            assert!(ticks < 100_000, "platform never arrived");
        }
        assert!(pos.x >= 9.0);
        assert_eq!(platform.target, Vector2::new(0.0, 0.0));
        assert_eq!(platform.source, Vector2::new(10.0, 0.0));

        let back = platform.steer(pos, dt).unwrap();
        assert!(back.x < 0.0);
        assert!(back.y.abs() < 1e-6);
    }

    #[test]
    fn swap_tick_applies_no_velocity() {
        let mut platform = PatrolPlatform::new(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0), 5.0);
        assert!(platform.steer(Vector2::new(9.5, 0.0), 0.016).is_none());
        assert!(platform.steer(Vector2::new(9.5, 0.0), 0.016).is_some());
    }
}
