//! Level and game fixtures written into a temporary directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

pub const GROUND: u32 = 1;
pub const COIN: u32 = 2;
pub const PLATFORM: u32 = 3;
pub const CRATE: u32 = 4;
/// One 128x32 slab, four tiles wide.
pub const FLOOR: u32 = 5;

pub const TICK: f32 = 1.0 / 60.0;

pub struct Fixture {
    pub dir: TempDir,
}

fn png(path: &Path, width: u32, height: u32) {
    image::RgbaImage::new(width, height).save(path).unwrap();
}

impl Fixture {
    /// Tiles, a player description (3 lives, 2 coins to win) and its assets.
    pub fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        for (name, w, h) in [
            ("ground.png", 32, 32),
            ("coin.png", 16, 16),
            ("platform.png", 32, 8),
            ("crate.png", 16, 16),
            ("floor.png", 128, 32),
            ("hero.png", 64, 32),
            ("hud.png", 48, 24),
        ] {
            png(&fixture.path(name), w, h);
        }
        for name in ["hud.ttf", "step.wav", "jump.wav", "live.wav", "coin.wav"] {
            fs::write(fixture.path(name), b"stub").unwrap();
        }
        fixture.write_player(3, 2);
        fixture
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_player(&self, lives: i32, wincoin: i32) {
        let frame = |x: i32| json!({"x": x, "y": 0, "width": 16, "height": 32});
        let player = json!({
            "file": "hero.png",
            "density": 1.0,
            "friction": 0.5,
            "xvelocity": 8.0,
            "yvelocity": 12.0,
            "lives": lives,
            "wincoin": wincoin,
            "animation": {
                "default": frame(0),
                "initstate": "stay_right",
                "states": [
                    {"state": "move_right", "speed": 8.0, "frames": [frame(16), frame(32)]},
                    {"state": "move_left", "speed": 8.0, "frames": [frame(16), frame(32)]},
                    {"state": "fall_right", "speed": 0.0, "frames": [frame(48)]}
                ]
            },
            "hud": {
                "file": "hud.png", "font": "hud.ttf", "fontsize": 20,
                "live": {"x": 0, "y": 0, "width": 24, "height": 24},
                "coin": {"x": 24, "y": 0, "width": 24, "height": 24}
            },
            "sound": {"step": "step.wav", "jump": "jump.wav", "getlive": "live.wav", "getcoin": "coin.wav"}
        });
        fs::write(self.path("player.json"), player.to_string()).unwrap();
    }

    pub fn write_level(&self, name: &str, map: &Value) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, map.to_string()).unwrap();
        path
    }
}

pub fn property(name: &str, value: Value) -> Value {
    json!({"name": name, "value": value})
}

/// `width` x `height` map of 32px tiles with one opaque layer and one object group.
pub fn level(width: u32, height: u32, opaque: Vec<u32>, objects: Vec<Value>) -> Value {
    json!({
        "width": width,
        "height": height,
        "tilewidth": 32,
        "tileheight": 32,
        "backgroundcolor": "#336699",
        "properties": [
            property("gravityx", json!(0)),
            property("gravityy", json!(10)),
            property("timewarp", json!(1)),
            property("friction", json!(0.5))
        ],
        "tilesets": [{
            "firstgid": 1,
            "tiles": [
                {"id": 0, "image": "ground.png"},
                {"id": 1, "image": "coin.png"},
                {"id": 2, "image": "platform.png"},
                {"id": 3, "image": "crate.png"},
                {"id": 4, "image": "floor.png"}
            ]
        }],
        "layers": [
            {
                "type": "tilelayer",
                "name": "ground",
                "data": opaque,
                "properties": [property("visible", json!("opaque"))]
            },
            {"type": "objectgroup", "name": "objects", "objects": objects}
        ]
    })
}

/// The player with its feet at `(x, y)`.
pub fn player(x: f32, y: f32) -> Value {
    json!({
        "type": "player", "x": x, "y": y,
        "properties": [property("config", json!("player.json"))]
    })
}

pub fn object(kind: &str, gid: u32, x: f32, y: f32, properties: Vec<Value>) -> Value {
    json!({"type": kind, "gid": gid, "x": x, "y": y, "properties": properties})
}

/// Effect tile with its bottom-left corner at `(x, y)`.
pub fn effect(x: f32, y: f32, live: i32, coin: i32, destroy: bool) -> Value {
    object(
        "effect",
        COIN,
        x,
        y,
        vec![
            property("friction", json!(0.5)),
            property("restitution", json!(0)),
            property("live", json!(live)),
            property("coin", json!(coin)),
            property("destroy", json!(if destroy { "1" } else { "0" })),
        ],
    )
}

/// Player standing over a 2x2 block of ground, 10px above it.
pub fn standing_level() -> Value {
    level(2, 2, vec![GROUND; 4], vec![player(8.0, -10.0)])
}
