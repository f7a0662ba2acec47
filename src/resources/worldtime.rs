use bevy_ecs::prelude::Resource;

/// Level clock. `time_scale` holds the level's time warp; `delta` is the
/// scaled duration of the tick being simulated.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(time_scale: f32) -> Self {
        WorldTime {
            time_scale,
            ..Default::default()
        }
    }
}
