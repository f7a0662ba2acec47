//! One level at a time.
//!
//! [`World`] owns the ECS world holding the current level's entities, its
//! [`Physics`] resource and the tick schedule. It starts unloaded; a
//! successful [`World::load_from_file`] makes it playable and a failed one
//! leaves it unloaded again.
//!
//! A tick runs, in order: platform logic, player logic, player animation,
//! the physics step with contact dispatch, transform sync and the removal of
//! spent triggers.

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use bevy_ecs::world::World as EcsWorld;
use log::{error, info, warn};
use raylib::prelude::Vector2;

use crate::components::group::Group;
use crate::components::hud::Hud;
use crate::components::mapposition::MapPosition;
use crate::components::player::{MoveIntent, Player};
use crate::error::LoadError;
use crate::events::audio::AudioCmd;
use crate::frame::Frame;
use crate::level::loader::{LevelInfo, build_level};
use crate::resources::audio::AudioQueue;
use crate::resources::physics::Physics;
use crate::resources::worldtime::WorldTime;
use crate::systems::cleanup::destroy_spent_triggers;
use crate::systems::physics::{physics_step, sync_transforms};
use crate::systems::platform::platform_logic;
use crate::systems::player::{player_animation, player_logic};
use crate::systems::render::draw_entities;
use crate::systems::time::update_world_time;

/// The camera looks this many pixels above the player's pivot.
const CAMERA_LIFT: f32 = 25.0;

pub struct World {
    ecs: EcsWorld,
    schedule: Option<Schedule>,
    info: Option<LevelInfo>,
    last_level: Option<PathBuf>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            ecs: Self::empty_ecs(AudioQueue::default()),
            schedule: None,
            info: None,
            last_level: None,
        }
    }

    fn empty_ecs(audio: AudioQueue) -> EcsWorld {
        let mut ecs = EcsWorld::new();
        ecs.insert_resource(audio);
        ecs.insert_resource(MoveIntent::default());
        ecs.insert_resource(WorldTime::default());
        ecs
    }

    fn tick_schedule() -> Schedule {
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                platform_logic,
                player_logic,
                player_animation,
                physics_step,
                sync_transforms,
                destroy_spent_triggers,
            )
                .chain(),
        );
        schedule
    }

    /// Replace the current level with the one at `path`.
    ///
    /// Whatever was loaded before is dropped first, bodies included. On error
    /// the world is left unloaded.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        // sounds queued by the previous level still have to reach the audio thread
        let mut audio = std::mem::take(&mut *self.ecs.resource_mut::<AudioQueue>());
        audio.push(AudioCmd::UnloadAllFx);

        self.ecs = Self::empty_ecs(audio);
        self.schedule = None;
        self.info = None;

        match build_level(&mut self.ecs, path) {
            Ok(info) => {
                self.ecs.insert_resource(WorldTime::with_time_scale(info.time_warp));
                self.schedule = Some(Self::tick_schedule());
                self.info = Some(info);
                self.last_level = Some(path.to_path_buf());
                info!("level {:?} loaded", path);
                Ok(())
            }
            Err(e) => {
                error!("failed to load level {:?}: {}", path, e);
                let audio = std::mem::take(&mut *self.ecs.resource_mut::<AudioQueue>());
                self.ecs = Self::empty_ecs(audio);
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.info.is_some()
    }

    /// Movement intent used by the next ticks.
    pub fn set_intent(&mut self, intent: MoveIntent) {
        *self.ecs.resource_mut::<MoveIntent>() = intent;
    }

    /// Advance the level by `dt` real seconds, scaled by its time warp.
    pub fn run_game_timing(&mut self, dt: f32) {
        let Some(schedule) = self.schedule.as_mut() else {
            warn!("tick requested with no level loaded");
            return;
        };
        update_world_time(&mut self.ecs, dt);
        schedule.run(&mut self.ecs);
    }

    /// Queue this frame's world view: camera on the player, background,
    /// entities, then the HUD.
    pub fn run_drawing(&mut self, frame: &mut Frame) {
        let Some(info) = self.info else {
            return;
        };
        let focus = info.player.and_then(|player| {
            let position = self.ecs.get::<MapPosition>(player)?;
            Some(position.pos - Vector2::new(0.0, CAMERA_LIFT))
        });
        if let Some(target) = focus {
            frame.camera_target = Some(target);
        }
        frame.background = info.background;

        draw_entities(&mut self.ecs, frame);

        if let Some(player) = info.player
            && let (Some(state), Some(hud)) = (self.ecs.get::<Player>(player), self.ecs.get::<Hud>(player))
        {
            hud.draw(frame, state.life, state.total_life, state.coins);
        }
    }

    /// Panics when no player was loaded.
    pub fn is_win(&self) -> bool {
        self.expect_player("is_win").is_win()
    }

    /// Panics when no player was loaded.
    pub fn is_fail(&self) -> bool {
        self.expect_player("is_fail").is_fail()
    }

    fn expect_player(&self, query: &str) -> &Player {
        match self.player() {
            Some(player) => player,
            None => panic!("{query} called on a world without a player"),
        }
    }

    pub fn player(&self) -> Option<&Player> {
        let entity = self.info.as_ref()?.player?;
        self.ecs.get::<Player>(entity)
    }

    pub fn player_entity(&self) -> Option<Entity> {
        self.info.as_ref()?.player
    }

    pub fn last_level(&self) -> Option<&Path> {
        self.last_level.as_deref()
    }

    pub fn info(&self) -> Option<&LevelInfo> {
        self.info.as_ref()
    }

    /// Move every queued audio command into `out`.
    pub fn drain_audio(&mut self, out: &mut AudioQueue) {
        for cmd in self.ecs.resource_mut::<AudioQueue>().drain() {
            out.push(cmd);
        }
    }

    pub fn audio(&self) -> &AudioQueue {
        self.ecs.resource::<AudioQueue>()
    }

    pub fn ecs(&self) -> &EcsWorld {
        &self.ecs
    }

    pub fn ecs_mut(&mut self) -> &mut EcsWorld {
        &mut self.ecs
    }

    pub fn entity_count(&mut self) -> usize {
        self.ecs.query::<&Group>().iter(&self.ecs).count()
    }

    pub fn count_group(&mut self, group: Group) -> usize {
        self.ecs
            .query::<&Group>()
            .iter(&self.ecs)
            .filter(|g| **g == group)
            .count()
    }

    /// Number of rigid bodies in the simulation, zero when unloaded.
    pub fn body_count(&self) -> usize {
        self.ecs
            .get_resource::<Physics>()
            .map_or(0, |physics| physics.body_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_world_ignores_ticks() {
        let mut world = World::new();
        world.run_game_timing(0.016);
        assert!(!world.is_loaded());
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.last_level(), None);
    }

    #[test]
    fn drawing_unloaded_world_is_empty() {
        let mut world = World::new();
        let mut frame = Frame::new(crate::resources::screensize::ScreenSize::new(320, 240));
        world.run_drawing(&mut frame);
        assert!(frame.world.is_empty());
        assert!(frame.overlay.is_empty());
        assert_eq!(frame.camera_target, None);
    }

    #[test]
    #[should_panic(expected = "without a player")]
    fn win_query_without_player_panics() {
        World::new().is_win();
    }

    #[test]
    fn failed_load_unloads_and_keeps_audio() {
        let mut world = World::new();
        let err = world.load_from_file("does/not/exist.json").unwrap_err();
        assert!(err.is_missing_asset());
        assert!(!world.is_loaded());
        assert!(matches!(world.audio().pending(), [AudioCmd::UnloadAllFx]));
    }
}
