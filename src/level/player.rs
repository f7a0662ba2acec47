//! Player description file.
//!
//! Referenced by the `config` property of a level's `player` object:
//!
//! ```json
//! {
//!   "file": "hero.png",
//!   "density": 1.0, "friction": 0.3,
//!   "xvelocity": 12.0, "yvelocity": 28.0,
//!   "lives": 3, "wincoin": 10,
//!   "animation": {
//!     "default": {"x": 0, "y": 0, "width": 32, "height": 48},
//!     "initstate": "stay_right",
//!     "states": [
//!       {"state": "move_right", "speed": 8.0, "frames": [{"x": 32, "y": 0, "width": 32, "height": 48}]}
//!     ]
//!   },
//!   "hud": {"file": "hud.png", "font": "hud.ttf", "fontsize": 24,
//!           "live": {"x": 0, "y": 0, "width": 24, "height": 24},
//!           "coin": {"x": 24, "y": 0, "width": 24, "height": 24}},
//!   "sound": {"step": "step.wav", "jump": "jump.wav", "getlive": "live.wav", "getcoin": "coin.wav"}
//! }
//! ```
//!
//! Every key is required. Paths are relative to the description file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::components::animation::{Animation, FrameRect, MoveState};
use crate::error::{LoadError, read_text, require_file, resolve_relative};

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationDef {
    pub default: FrameRect,
    pub initstate: MoveState,
    #[serde(default)]
    pub states: Vec<StateDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateDef {
    pub state: MoveState,
    pub speed: f32,
    #[serde(default)]
    pub frames: Vec<FrameRect>,
}

impl AnimationDef {
    pub fn build(&self) -> Animation {
        let mut animation = Animation::new(self.default, self.initstate);
        for def in &self.states {
            animation.set_state_speed(def.state, def.speed);
            for frame in &def.frames {
                animation.add_frame(def.state, *frame);
            }
        }
        animation
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HudDef {
    pub file: String,
    pub font: String,
    pub fontsize: f32,
    pub live: FrameRect,
    pub coin: FrameRect,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundDef {
    pub step: String,
    pub jump: String,
    pub getlive: String,
    pub getcoin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerDef {
    pub file: String,
    pub density: f32,
    pub friction: f32,
    pub xvelocity: f32,
    pub yvelocity: f32,
    pub lives: i32,
    pub wincoin: i32,
    pub animation: AnimationDef,
    pub hud: HudDef,
    pub sound: SoundDef,
}

/// A parsed player description with every asset path resolved and checked.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub def: PlayerDef,
    pub sheet: PathBuf,
    pub hud_image: PathBuf,
    pub hud_font: PathBuf,
    pub step_sound: PathBuf,
    pub jump_sound: PathBuf,
    pub getlive_sound: PathBuf,
    pub getcoin_sound: PathBuf,
}

impl PlayerConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        let text = read_text(path)?;
        let def: PlayerDef =
            serde_json::from_str(&text).map_err(|e| LoadError::malformed(path, e.to_string()))?;
        let frame = def.animation.default;
        if frame.width == 0 || frame.height == 0 {
            return Err(LoadError::malformed(path, "default frame has no area"));
        }

        let resolve = |relative: &str| -> Result<PathBuf, LoadError> {
            let resolved = resolve_relative(path, relative);
            require_file(&resolved)?;
            Ok(resolved)
        };
        Ok(Self {
            sheet: resolve(&def.file)?,
            hud_image: resolve(&def.hud.file)?,
            hud_font: resolve(&def.hud.font)?,
            step_sound: resolve(&def.sound.step)?,
            jump_sound: resolve(&def.sound.jump)?,
            getlive_sound: resolve(&def.sound.getlive)?,
            getcoin_sound: resolve(&def.sound.getcoin)?,
            def,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn animation_json() -> serde_json::Value {
        json!({
            "default": {"x": 0, "y": 0, "width": 16, "height": 32},
            "initstate": "stay_left",
            "states": [
                {"state": "move_left", "speed": 10.0, "frames": [
                    {"x": 16, "y": 0, "width": 16, "height": 32},
                    {"x": 32, "y": 0, "width": 16, "height": 32}
                ]},
                {"state": "jump_left", "speed": 0.0, "frames": []}
            ]
        })
    }

    #[test]
    fn animation_is_built_from_states() {
        let def: AnimationDef = serde_json::from_value(animation_json()).unwrap();
        let animation = def.build();
        assert_eq!(animation.state(), MoveState::StayLeft);
        assert_eq!(animation.frame_count(MoveState::MoveLeft), 2);
        assert_eq!(animation.frame_count(MoveState::JumpLeft), 0);
        assert_eq!(animation.frame(false), FrameRect::new(0, 0, 16, 32));
    }

    #[test]
    fn unknown_state_is_rejected() {
        let mut value = animation_json();
        value["states"][0]["state"] = json!("crouch_left");
        assert!(serde_json::from_value::<AnimationDef>(value).is_err());
    }

    #[test]
    fn missing_sound_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["hero.png", "hud.png", "hud.ttf", "step.wav", "jump.wav", "live.wav"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let path = dir.path().join("player.json");
        let body = json!({
            "file": "hero.png", "density": 1.0, "friction": 0.3,
            "xvelocity": 10.0, "yvelocity": 20.0, "lives": 3, "wincoin": 2,
            "animation": animation_json(),
            "hud": {"file": "hud.png", "font": "hud.ttf", "fontsize": 20,
                    "live": {"x": 0, "y": 0, "width": 8, "height": 8},
                    "coin": {"x": 8, "y": 0, "width": 8, "height": 8}},
            "sound": {"step": "step.wav", "jump": "jump.wav", "getlive": "live.wav", "getcoin": "coin.wav"}
        });
        std::fs::write(&path, body.to_string()).unwrap();

        let err = PlayerConfig::load_from_file(&path).unwrap_err();
        assert!(err.is_missing_asset());
        assert!(err.to_string().contains("coin.wav"));

        std::fs::write(dir.path().join("coin.wav"), b"x").unwrap();
        let config = PlayerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.sheet, dir.path().join("hero.png"));
        assert_eq!(config.def.wincoin, 2);
    }

    #[test]
    fn missing_key_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.json");
        std::fs::write(&path, r#"{"file": "hero.png"}"#).unwrap();
        assert!(PlayerConfig::load_from_file(&path).unwrap_err().is_malformed());
    }
}
