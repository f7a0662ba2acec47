//! Build a level into an ECS world.
//!
//! [`build_level`] reads the map, installs a fresh [`Physics`] resource with
//! the map's gravity and spawns every entity in painter's order: all
//! transparent tile layers, then all opaque ones, then the object groups in
//! file order. The world is expected to be empty; on error it may hold a
//! partial level and must be cleared by the caller.

use std::path::Path;

use bevy_ecs::prelude::{Entity, World};
use log::{debug, info, warn};
use raylib::prelude::{Color, Vector2};
use rustc_hash::FxHashMap;

use crate::error::{LoadError, resolve_relative};
use crate::level::player::PlayerConfig;
use crate::level::spawn::{Spawner, Tile};
use crate::level::{Layer, LayerRole, MapObject, Props, TiledMap, Tileset, clean_gid, parse_color, read_map};
use crate::resources::imagestore::ImageStore;
use crate::resources::physics::Physics;

/// What the world needs to remember about a built level.
#[derive(Debug, Clone, Copy)]
pub struct LevelInfo {
    pub background: Color,
    pub time_warp: f32,
    pub gravity: Vector2,
    pub player: Option<Entity>,
}

/// Tile images by gid.
struct TileTable {
    tiles: FxHashMap<u32, Tile>,
}

impl TileTable {
    fn build(path: &Path, tilesets: &[Tileset], images: &mut ImageStore) -> Result<Self, LoadError> {
        let mut tiles = FxHashMap::default();
        for tileset in tilesets {
            if let Some(source) = &tileset.source {
                return Err(LoadError::malformed(
                    path,
                    format!("external tileset '{source}' is not supported, embed it in the map"),
                ));
            }
            for def in &tileset.tiles {
                let image = resolve_relative(path, &def.image);
                let (width, height) = images.size(&image)?;
                tiles.insert(tileset.firstgid + def.id, Tile::new(&image, width, height));
            }
        }
        debug!("{} tiles in {} tilesets", tiles.len(), tilesets.len());
        Ok(Self { tiles })
    }

    fn find(&self, raw_gid: u32) -> Option<&Tile> {
        self.tiles.get(&clean_gid(raw_gid))
    }

    fn get(&self, path: &Path, raw_gid: u32) -> Result<&Tile, LoadError> {
        self.find(raw_gid).ok_or_else(|| {
            LoadError::malformed(path, format!("unknown tile gid {}", clean_gid(raw_gid)))
        })
    }
}

/// Populate `world` from the level at `path`.
pub fn build_level(world: &mut World, path: &Path) -> Result<LevelInfo, LoadError> {
    let map = read_map(path)?;
    let props = Props::new(&map.properties);
    let gravity = Vector2::new(props.f32(path, "gravityx")?, props.f32(path, "gravityy")?);
    let time_warp = props.f32(path, "timewarp")?;
    let friction = props.f32(path, "friction")?;
    let background = parse_color(path, map.backgroundcolor.as_deref())?;
    if map.width == 0 || map.tilewidth == 0 || map.tileheight == 0 {
        return Err(LoadError::malformed(path, "map and tile dimensions must be positive"));
    }

    world.insert_resource(Physics::new(gravity));

    let mut images = ImageStore::new();
    let tiles = TileTable::build(path, &map.tilesets, &mut images)?;

    let mut transparent = Vec::new();
    let mut opaque = Vec::new();
    let mut groups = Vec::new();
    for layer in &map.layers {
        match layer {
            Layer::Tiles {
                name,
                data,
                properties,
            } => match LayerRole::of(properties) {
                Some(LayerRole::Transparent) => transparent.push(data),
                Some(LayerRole::Opaque) => opaque.push(data),
                None => warn!("tile layer '{}' has no visible role, ignored", name),
            },
            Layer::Objects { objects, .. } => groups.push(objects),
            Layer::Unsupported => debug!("unsupported layer ignored"),
        }
    }

    let mut spawner = Spawner::new(world);
    for data in transparent {
        place_tiles(path, &map, &tiles, data, |tile, center| {
            spawner.decoration(tile, center);
        });
    }
    for data in opaque {
        place_tiles(path, &map, &tiles, data, |tile, center| {
            spawner.terrain(tile, center, friction);
        });
    }

    let mut player = None;
    for objects in groups {
        for object in objects {
            if let Some(entity) = spawn_object(&mut spawner, path, &tiles, object, player.is_some())? {
                player = Some(entity);
            }
        }
    }

    info!(
        "level {:?} built: {} entities, gravity ({}, {}), timewarp {}",
        path,
        spawner.spawned(),
        gravity.x,
        gravity.y,
        time_warp
    );
    Ok(LevelInfo {
        background,
        time_warp,
        gravity,
        player,
    })
}

fn place_tiles(
    path: &Path,
    map: &TiledMap,
    tiles: &TileTable,
    data: &[u32],
    mut place: impl FnMut(&Tile, Vector2),
) {
    for (n, &raw) in data.iter().enumerate() {
        if clean_gid(raw) == 0 {
            continue;
        }
        let Some(tile) = tiles.find(raw) else {
            warn!("{:?}: cell {} has unknown tile gid {}, skipped", path, n, clean_gid(raw));
            continue;
        };
        let n = n as u32;
        let x = ((n % map.width) * map.tilewidth) as f32 + tile.width / 2.0;
        let y = ((n / map.width) * map.tileheight) as f32 + tile.height / 2.0;
        place(tile, Vector2::new(x.floor(), y.floor()));
    }
}

/// Center of a `width` x `height` image placed with its bottom-left corner at `(left, bottom)`.
fn object_center(left: f32, bottom: f32, width: f32, height: f32) -> Vector2 {
    Vector2::new((left + width / 2.0).trunc(), (bottom - height / 2.0).trunc())
}

fn object_tile<'t>(tiles: &'t TileTable, path: &Path, object: &MapObject) -> Result<&'t Tile, LoadError> {
    let gid = object
        .gid
        .ok_or_else(|| LoadError::malformed(path, format!("'{}' object without a gid", object.kind)))?;
    tiles.get(path, gid)
}

/// Spawn one object. Returns the entity when it is the player.
fn spawn_object(
    spawner: &mut Spawner,
    path: &Path,
    tiles: &TileTable,
    object: &MapObject,
    has_player: bool,
) -> Result<Option<Entity>, LoadError> {
    let props = Props::new(&object.properties);
    let tile = || object_tile(tiles, path, object);

    match object.kind.as_str() {
        "player" => {
            if has_player {
                return Err(LoadError::malformed(path, "a level holds at most one player"));
            }
            let config_path = resolve_relative(path, &props.string(path, "config")?);
            let config = PlayerConfig::load_from_file(&config_path)?;
            let frame = config.def.animation.default;
            let center = object_center(
                object.x,
                object.y,
                frame.width.abs() as f32,
                frame.height.abs() as f32,
            );
            return Ok(Some(spawner.player(&config, center)));
        }
        "movable" => {
            let tile = tile()?;
            let center = object_center(object.x, object.y, tile.width, tile.height);
            spawner.movable(
                tile,
                center,
                props.f32(path, "density")?,
                props.f32(path, "friction")?,
            );
        }
        "platform" => {
            let tile = tile()?;
            let center = object_center(object.x, object.y, tile.width, tile.height);
            let destination = object_center(
                props.f32(path, "dstx")?,
                props.f32(path, "dsty")?,
                tile.width,
                tile.height,
            );
            spawner.platform(
                tile,
                center,
                destination,
                props.f32(path, "friction")?,
                props.f32(path, "speed")?,
            );
        }
        "jumping" => {
            let tile = tile()?;
            let center = object_center(object.x, object.y, tile.width, tile.height);
            spawner.bouncer(
                tile,
                center,
                props.f32(path, "friction")?,
                props.f32(path, "restitution")?,
            );
        }
        "effect" => {
            let tile = tile()?;
            let center = object_center(object.x, object.y, tile.width, tile.height);
            spawner.trigger(
                tile,
                center,
                props.f32(path, "friction")?,
                props.f32(path, "restitution")?,
                props.i32(path, "live")?,
                props.i32(path, "coin")?,
                props.flag("destroy"),
            );
        }
        other => warn!("object of unknown type '{}' skipped", other),
    }
    Ok(None)
}
