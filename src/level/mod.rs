//! Level files.
//!
//! A level is a Tiled map exported as JSON. The map's custom properties carry
//! the physics setup (`gravityx`, `gravityy`, `timewarp`, `friction`), tile
//! layers are classified by their `visible` property into decoration
//! (`transparent`) and terrain (`opaque`), and object groups place the
//! gameplay entities by `type`: `player`, `movable`, `platform`, `jumping`
//! and `effect`.
//!
//! Submodules:
//! - [`loader`] – turns a parsed map into entities and bodies
//! - [`player`] – the player description file referenced by the `player` object
//! - [`spawn`] – one spawn function per entity variant, plus their contact callbacks

pub mod loader;
pub mod player;
pub mod spawn;

use std::path::Path;

use raylib::prelude::Color;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LoadError, read_text};

/// Tiled stores horizontal, vertical and diagonal flips in the top bits of a gid.
const GID_FLIP_MASK: u32 = 0x1FFF_FFFF;

/// Strip the flip flags from a raw gid.
pub fn clean_gid(raw: u32) -> u32 {
    raw & GID_FLIP_MASK
}

#[derive(Debug, Clone, Deserialize)]
pub struct TiledMap {
    pub width: u32,
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub backgroundcolor: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

/// Image-collection tileset: one image per tile.
#[derive(Debug, Clone, Deserialize)]
pub struct Tileset {
    pub firstgid: u32,
    /// Set for external tilesets, which are not supported.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileDef {
    pub id: u32,
    pub image: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Layer {
    #[serde(rename = "tilelayer")]
    Tiles {
        #[serde(default)]
        name: String,
        data: Vec<u32>,
        #[serde(default)]
        properties: Vec<Property>,
    },
    #[serde(rename = "objectgroup")]
    Objects {
        #[serde(default)]
        name: String,
        #[serde(default)]
        objects: Vec<MapObject>,
    },
    /// Image layers, groups and anything newer.
    #[serde(other)]
    Unsupported,
}

/// Object placement. `x` is the left edge and `y` the bottom edge of the
/// tile image, as Tiled places tile objects.
#[derive(Debug, Clone, Deserialize)]
pub struct MapObject {
    #[serde(rename = "type", alias = "class", default)]
    pub kind: String,
    #[serde(default)]
    pub gid: Option<u32>,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// How a tile layer is treated, from its `visible` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    Transparent,
    Opaque,
}

impl LayerRole {
    pub fn of(properties: &[Property]) -> Option<Self> {
        match Props::new(properties).value("visible") {
            Some(Value::String(s)) if s == "transparent" => Some(LayerRole::Transparent),
            Some(Value::String(s)) if s == "opaque" => Some(LayerRole::Opaque),
            _ => None,
        }
    }
}

/// Typed lookups over a property list. Values may be strings, numbers or
/// booleans; numeric lookups accept numeric strings.
#[derive(Clone, Copy)]
pub struct Props<'a> {
    list: &'a [Property],
}

impl<'a> Props<'a> {
    pub fn new(list: &'a [Property]) -> Self {
        Self { list }
    }

    pub fn value(&self, name: &str) -> Option<&'a Value> {
        self.list.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn string(&self, path: &Path, name: &str) -> Result<String, LoadError> {
        match self.value(name) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(LoadError::malformed(
                path,
                format!("property '{name}' is not a string: {other}"),
            )),
            None => Err(missing(path, name)),
        }
    }

    pub fn f32(&self, path: &Path, name: &str) -> Result<f32, LoadError> {
        let value = self.value(name).ok_or_else(|| missing(path, name))?;
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.map(|n| n as f32).ok_or_else(|| {
            LoadError::malformed(path, format!("property '{name}' is not a number: {value}"))
        })
    }

    /// Integer property; fractional values are truncated.
    pub fn i32(&self, path: &Path, name: &str) -> Result<i32, LoadError> {
        Ok(self.f32(path, name)? as i32)
    }

    /// `"1"`, `1` and `true` are set; anything else, including absence, is not.
    pub fn flag(&self, name: &str) -> bool {
        match self.value(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            Some(Value::String(s)) => s == "1",
            _ => false,
        }
    }
}

fn missing(path: &Path, name: &str) -> LoadError {
    LoadError::malformed(path, format!("missing property '{name}'"))
}

/// Parse `#RRGGBB` or `#AARRGGBB`. Absent means opaque white.
pub fn parse_color(path: &Path, color: Option<&str>) -> Result<Color, LoadError> {
    let Some(text) = color else {
        return Ok(Color::WHITE);
    };
    let hex = text.strip_prefix('#').unwrap_or(text);
    let bad = || LoadError::malformed(path, format!("invalid background color '{text}'"));
    if !hex.is_ascii() {
        return Err(bad());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
    match hex.len() {
        6 => Ok(Color::new(channel(0)?, channel(2)?, channel(4)?, 255)),
        8 => Ok(Color::new(channel(2)?, channel(4)?, channel(6)?, channel(0)?)),
        _ => Err(bad()),
    }
}

/// Read and parse a level file.
pub fn read_map(path: &Path) -> Result<TiledMap, LoadError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| LoadError::malformed(path, e.to_string()))
}
