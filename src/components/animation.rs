//! Frame animation keyed by movement state.
//!
//! The [`Animation`] component owns one track per [`MoveState`]. Each track
//! has a playback speed (frames per second) and an ordered list of source
//! rectangles inside the entity's sprite sheet. A fractional cursor advances
//! by `dt * speed` and wraps to zero once it passes the last frame.
//!
//! Switching to a different state restarts the cursor at zero on the same
//! call, so the first frame of the new track is shown immediately.
//!
//! # Related
//!
//! - [`crate::systems::player::player_animation`] – selects the target state each tick
//! - [`crate::level::player::AnimationDef`] – JSON description the tracks are built from

use bevy_ecs::prelude::Component;
use raylib::prelude::Rectangle;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Movement state an animation track is selected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    StayLeft,
    StayRight,
    MoveLeft,
    MoveRight,
    JumpLeft,
    JumpRight,
    FallLeft,
    FallRight,
}

impl MoveState {
    /// True for the four left-facing states.
    pub fn faces_left(self) -> bool {
        matches!(
            self,
            MoveState::StayLeft | MoveState::MoveLeft | MoveState::JumpLeft | MoveState::FallLeft
        )
    }
}

/// Integer source rectangle inside a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FrameRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_rectangle(self) -> Rectangle {
        Rectangle {
            x: self.x as f32,
            y: self.y as f32,
            width: self.width as f32,
            height: self.height as f32,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Track {
    speed: f32,
    frames: Vec<FrameRect>,
}

/// Per-entity frame sequence state machine.
#[derive(Debug, Clone, Component)]
pub struct Animation {
    default_frame: FrameRect,
    state: MoveState,
    cursor: f32,
    tracks: FxHashMap<MoveState, Track>,
}

impl Animation {
    pub fn new(default_frame: FrameRect, initial_state: MoveState) -> Self {
        Self {
            default_frame,
            state: initial_state,
            cursor: 0.0,
            tracks: FxHashMap::default(),
        }
    }

    /// Set playback speed in frames per second for `state`.
    pub fn set_state_speed(&mut self, state: MoveState, speed: f32) {
        self.tracks.entry(state).or_default().speed = speed;
    }

    /// Append a frame to the track of `state`.
    pub fn add_frame(&mut self, state: MoveState, frame: FrameRect) {
        self.tracks.entry(state).or_default().frames.push(frame);
    }

    /// Advance the animation toward `state` by `dt` seconds.
    ///
    /// A state change resets the cursor and does not advance it. States with
    /// no track behave as zero speed and zero frames.
    pub fn animate(&mut self, state: MoveState, dt: f32) {
        if state != self.state {
            self.state = state;
            self.cursor = 0.0;
            return;
        }
        let (speed, count) = self
            .tracks
            .get(&self.state)
            .map(|t| (t.speed, t.frames.len()))
            .unwrap_or((0.0, 0));
        self.cursor += dt * speed;
        if self.cursor >= count as f32 {
            self.cursor = 0.0;
        }
    }

    /// Current frame, or the default frame when `use_default` is set or the
    /// current state has no frames.
    pub fn frame(&self, use_default: bool) -> FrameRect {
        if use_default {
            return self.default_frame;
        }
        match self.tracks.get(&self.state) {
            Some(track) if !track.frames.is_empty() => {
                let index = self.frame_index().min(track.frames.len() - 1);
                track.frames[index]
            }
            _ => self.default_frame,
        }
    }

    pub fn default_frame(&self) -> FrameRect {
        self.default_frame
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    /// `floor(cursor)` for the current state.
    pub fn frame_index(&self) -> usize {
        self.cursor.floor() as usize
    }

    pub fn frame_count(&self, state: MoveState) -> usize {
        self.tracks.get(&state).map_or(0, |t| t.frames.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker() -> Animation {
        let mut anim = Animation::new(FrameRect::new(0, 0, 16, 32), MoveState::StayRight);
        anim.set_state_speed(MoveState::MoveRight, 8.0);
        for i in 0..4 {
            anim.add_frame(MoveState::MoveRight, FrameRect::new(16 * i, 32, 16, 32));
        }
        anim.set_state_speed(MoveState::MoveLeft, 12.0);
        for i in 0..3 {
            anim.add_frame(MoveState::MoveLeft, FrameRect::new(16 * i, 64, 16, 32));
        }
        anim
    }

    #[test]
    fn cursor_stays_below_frame_count() {
        let mut anim = walker();
        anim.animate(MoveState::MoveRight, 0.0);
        let steps = [0.0, 0.016, 0.033, 0.1, 0.125, 0.37, 0.0, 0.49, 0.01, 0.2];
        for _ in 0..50 {
            for dt in steps {
                anim.animate(MoveState::MoveRight, dt);
                assert!(anim.frame_index() < anim.frame_count(MoveState::MoveRight));
            }
        }
    }

    #[test]
    fn cursor_wraps_instead_of_clamping() {
        let mut anim = walker();
        anim.animate(MoveState::MoveRight, 0.0);
        // 8 fps, 4 frames: 0.45s puts the cursor at 3.6
        anim.animate(MoveState::MoveRight, 0.45);
        assert_eq!(anim.frame_index(), 3);
        assert_eq!(anim.frame(false), FrameRect::new(48, 32, 16, 32));
        anim.animate(MoveState::MoveRight, 0.1);
        assert_eq!(anim.frame_index(), 0);
    }

    #[test]
    fn state_switch_resets_cursor() {
        let mut anim = walker();
        anim.animate(MoveState::MoveRight, 0.0);
        anim.animate(MoveState::MoveRight, 0.3);
        assert_eq!(anim.frame_index(), 2);

        anim.animate(MoveState::MoveLeft, 0.3);
        assert_eq!(anim.state(), MoveState::MoveLeft);
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.frame(false), FrameRect::new(0, 64, 16, 32));
    }

    #[test]
    fn empty_state_yields_default_frame() {
        let mut anim = walker();
        anim.animate(MoveState::FallLeft, 0.5);
        anim.animate(MoveState::FallLeft, 0.5);
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.frame(false), anim.default_frame());
    }

    #[test]
    fn use_default_overrides_track() {
        let mut anim = walker();
        anim.animate(MoveState::MoveRight, 0.0);
        anim.animate(MoveState::MoveRight, 0.2);
        assert_eq!(anim.frame(true), FrameRect::new(0, 0, 16, 32));
    }

    #[test]
    fn move_state_names_round_trip_through_serde() {
        let state: MoveState = serde_json::from_str("\"jump_left\"").unwrap();
        assert_eq!(state, MoveState::JumpLeft);
        assert!(state.faces_left());
        assert!(serde_json::from_str::<MoveState>("\"crouch\"").is_err());
    }
}
