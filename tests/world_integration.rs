//! Level loading and ticking through the public `World` API.

mod fixtures;

use raylib::prelude::{Color, Vector2};
use serde_json::json;

use fixtures::*;
use ww_platformer::components::group::Group;
use ww_platformer::components::mapposition::MapPosition;
use ww_platformer::components::player::MoveIntent;
use ww_platformer::events::audio::AudioCmd;
use ww_platformer::frame::{DrawCmd, Frame};
use ww_platformer::resources::screensize::ScreenSize;
use ww_platformer::world::World;

fn run(world: &mut World, ticks: usize) {
    for _ in 0..ticks {
        world.run_game_timing(TICK);
    }
}

fn player_position(world: &World) -> Vector2 {
    let entity = world.player_entity().unwrap();
    world.ecs().get::<MapPosition>(entity).unwrap().pos
}

#[test]
fn small_level_builds_terrain_and_player() {
    let fixture = Fixture::new();
    let path = fixture.write_level("level.json", &standing_level());

    let mut world = World::new();
    world.load_from_file(&path).unwrap();

    assert!(world.is_loaded());
    assert_eq!(world.count_group(Group::TERRAIN), 4);
    assert_eq!(world.count_group(Group::PLAYER), 1);
    assert_eq!(world.entity_count(), 5);
    assert_eq!(world.body_count(), 5);
    assert!(!world.is_win());
    assert!(!world.is_fail());
    assert_eq!(world.last_level(), Some(path.as_path()));

    let info = world.info().unwrap();
    assert_eq!(info.background, Color::new(0x33, 0x66, 0x99, 255));
    assert_eq!(info.gravity, Vector2::new(0.0, 10.0));

    // feet at y = -10, 16x32 default frame
    assert_eq!(player_position(&world), Vector2::new(16.0, -26.0));

    let pending = world.audio().pending();
    assert_eq!(pending[0], AudioCmd::UnloadAllFx);
    let loaded = pending
        .iter()
        .filter(|cmd| matches!(cmd, AudioCmd::LoadFx { .. }))
        .count();
    assert_eq!(loaded, 4);
}

#[test]
fn player_lands_on_terrain() {
    let fixture = Fixture::new();
    let path = fixture.write_level("level.json", &standing_level());
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    assert!(!world.player().unwrap().is_grounded());

    run(&mut world, 120);

    let player = world.player().unwrap();
    assert!(player.is_grounded());
    assert!(player.foot_contacts() >= 1);
    let y = player_position(&world).y;
    assert!((-19.0..=-13.0).contains(&y), "player rests at y = {y}");
}

#[test]
fn player_walks_right_when_asked() {
    let fixture = Fixture::new();
    let map = level(4, 1, vec![FLOOR, 0, 0, 0], vec![player(8.0, -2.0)]);
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    run(&mut world, 30);
    let start = player_position(&world).x;

    world.set_intent(MoveIntent {
        right: true,
        ..Default::default()
    });
    run(&mut world, 30);

    assert!(player_position(&world).x > start + 20.0);
    assert!(world.player().unwrap().desired_vx > 0.0);
}

#[test]
fn coin_is_collected_once_and_removed() {
    let fixture = Fixture::new();
    let map = level(
        2,
        2,
        vec![GROUND; 4],
        vec![effect(8.0, 0.0, 0, 1, true), player(8.0, -20.0)],
    );
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    assert_eq!(world.count_group(Group::TRIGGER), 1);
    assert_eq!(world.body_count(), 6);

    run(&mut world, 120);

    let player = world.player().unwrap();
    assert_eq!(player.coins, 1);
    assert_eq!(player.life, 3);
    assert!(!world.is_win());
    assert_eq!(world.count_group(Group::TRIGGER), 0);
    assert_eq!(world.body_count(), 5);
    assert!(
        world
            .audio()
            .pending()
            .contains(&AudioCmd::PlayFx { id: "player_getcoin".into() })
    );
}

#[test]
fn enough_coins_win() {
    let fixture = Fixture::new();
    let map = level(
        2,
        2,
        vec![GROUND; 4],
        vec![effect(8.0, 0.0, 0, 2, true), player(8.0, -20.0)],
    );
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();

    run(&mut world, 120);

    assert!(world.is_win());
    assert!(!world.is_fail());
}

#[test]
fn hazard_drains_life_to_fail() {
    let fixture = Fixture::new();
    let map = level(
        2,
        2,
        vec![GROUND; 4],
        vec![effect(8.0, 0.0, -5, 0, false), player(8.0, -20.0)],
    );
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();

    run(&mut world, 120);

    assert_eq!(world.player().unwrap().life, 0);
    assert!(world.is_fail());
    // hazards stay in place
    assert_eq!(world.count_group(Group::TRIGGER), 1);
}

fn jumps_played(world: &World) -> usize {
    world
        .audio()
        .pending()
        .iter()
        .filter(|cmd| **cmd == AudioCmd::PlayFx { id: "player_jump".into() })
        .count()
}

/// Highest point (smallest y) the player reaches over `ticks`.
fn peak(world: &mut World, ticks: usize) -> f32 {
    let mut top = f32::MAX;
    for _ in 0..ticks {
        world.run_game_timing(TICK);
        top = top.min(player_position(world).y);
    }
    top
}

#[test]
fn jump_needs_a_fresh_press() {
    let fixture = Fixture::new();
    let path = fixture.write_level("level.json", &standing_level());
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    run(&mut world, 120);
    assert!(world.player().unwrap().is_grounded());
    let rest = player_position(&world).y;

    let jump = MoveIntent {
        jump: true,
        ..Default::default()
    };
    world.set_intent(jump);
    let top = peak(&mut world, 180);
    assert!(top < rest - 30.0, "jump only reached y = {top} from {rest}");
    assert!(world.player().unwrap().is_grounded());
    assert!((player_position(&world).y - rest).abs() < 3.0);
    assert_eq!(jumps_played(&world), 1);

    // still held after landing
    let top = peak(&mut world, 60);
    assert!(top > rest - 3.0, "held jump lifted the player to y = {top}");
    assert_eq!(jumps_played(&world), 1);

    world.set_intent(MoveIntent::default());
    run(&mut world, 1);
    world.set_intent(jump);
    let top = peak(&mut world, 30);
    assert!(top < rest - 30.0, "second jump only reached y = {top}");
    assert_eq!(jumps_played(&world), 2);
}

#[test]
fn bounce_pad_throws_the_player_back_up() {
    let fixture = Fixture::new();
    let pad = object(
        "jumping",
        GROUND,
        0.0,
        64.0,
        vec![property("friction", json!(0.5)), property("restitution", json!(1))],
    );
    let map = level(2, 3, vec![0; 6], vec![pad, player(8.0, -40.0)]);
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    assert_eq!(world.count_group(Group::BOUNCER), 1);
    assert_eq!(world.body_count(), 2);

    let mut ys = Vec::new();
    let mut touched = false;
    for _ in 0..150 {
        world.run_game_timing(TICK);
        ys.push(player_position(&world).y);
        touched |= world.player().unwrap().is_grounded();
    }

    assert!(touched, "the pad never counted as footing");
    let (lowest, bottom) = ys
        .iter()
        .cloned()
        .enumerate()
        .fold((0, f32::MIN), |acc, (i, y)| if y > acc.1 { (i, y) } else { acc });
    // pad top is at y = 32, player is 32 tall
    assert!((10.0..=18.0).contains(&bottom), "lowest point y = {bottom}");
    let rebound = ys[lowest..].iter().cloned().fold(f32::MAX, f32::min);
    assert!(rebound < bottom - 30.0, "player only rebounded to y = {rebound}");
}

#[test]
fn platform_patrols_and_turns_back() {
    let fixture = Fixture::new();
    let platform = object(
        "platform",
        PLATFORM,
        0.0,
        100.0,
        vec![
            property("dstx", json!(100)),
            property("dsty", json!(100)),
            property("friction", json!(0.5)),
            property("speed", json!(600)),
        ],
    );
    let map = level(1, 1, vec![0], vec![platform]);
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    assert_eq!(world.count_group(Group::PLATFORM), 1);

    let entity = {
        let ecs = world.ecs_mut();
        let mut q = ecs.query::<(bevy_ecs::entity::Entity, &Group)>();
        q.iter(ecs)
            .find(|(_, g)| **g == Group::PLATFORM)
            .map(|(e, _)| e)
            .unwrap()
    };
    let x = |world: &World| world.ecs().get::<MapPosition>(entity).unwrap().pos.x;
    assert_eq!(x(&world), 16.0);

    let mut xs = Vec::new();
    for _ in 0..240 {
        world.run_game_timing(TICK);
        xs.push(x(&world));
    }

    assert!(xs.iter().all(|x| (0.0..=125.0).contains(x)));
    let turn = xs.iter().position(|x| *x >= 100.0).expect("platform never reached its destination");
    let back = xs[turn..turn + 60].iter().cloned().fold(f32::MAX, f32::min);
    assert!(back <= 70.0, "platform only came back to x = {back}");
    // vertical position is untouched
    let y = world.ecs().get::<MapPosition>(entity).unwrap().pos.y;
    assert!((95.0..=96.0).contains(&y));
}

#[test]
fn crates_fall_and_come_to_rest() {
    let fixture = Fixture::new();
    let crate_object = object(
        "movable",
        CRATE,
        8.0,
        -40.0,
        vec![property("density", json!(1.0)), property("friction", json!(0.5))],
    );
    let map = level(2, 1, vec![GROUND; 2], vec![crate_object]);
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();

    run(&mut world, 180);

    let ecs = world.ecs_mut();
    let mut q = ecs.query::<(&MapPosition, &Group)>();
    let (position, _) = q.iter(ecs).find(|(_, g)| **g == Group::MOVABLE).unwrap();
    assert!((-11.0..=-5.0).contains(&position.pos.y), "crate at y = {}", position.pos.y);
}

#[test]
fn unknown_objects_are_skipped() {
    let fixture = Fixture::new();
    let map = level(
        2,
        2,
        vec![GROUND; 4],
        vec![object("spring", GROUND, 0.0, 0.0, vec![]), player(8.0, -10.0)],
    );
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    assert_eq!(world.entity_count(), 5);
}

#[test]
fn reload_replaces_previous_level() {
    let fixture = Fixture::new();
    let first = fixture.write_level("first.json", &standing_level());
    let second = fixture.write_level(
        "second.json",
        &level(3, 1, vec![GROUND, 0, GROUND], vec![player(8.0, -10.0)]),
    );

    let mut world = World::new();
    world.load_from_file(&first).unwrap();
    run(&mut world, 10);
    world.load_from_file(&second).unwrap();

    assert_eq!(world.count_group(Group::TERRAIN), 2);
    assert_eq!(world.body_count(), 3);
    assert_eq!(world.last_level(), Some(second.as_path()));
    assert_eq!(player_position(&world), Vector2::new(16.0, -26.0));
}

#[test]
fn load_errors_are_classified() {
    let fixture = Fixture::new();
    let mut world = World::new();

    let mut no_gravity = standing_level();
    no_gravity["properties"].as_array_mut().unwrap().remove(0);
    let path = fixture.write_level("no_gravity.json", &no_gravity);
    let err = world.load_from_file(&path).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("gravityx"));

    let two_players = level(2, 2, vec![GROUND; 4], vec![player(8.0, -10.0), player(40.0, -10.0)]);
    let path = fixture.write_level("two_players.json", &two_players);
    assert!(world.load_from_file(&path).unwrap_err().is_malformed());

    let unknown_gid = level(
        2,
        2,
        vec![GROUND; 4],
        vec![object("movable", 9, 0.0, 0.0, vec![]), player(8.0, -10.0)],
    );
    let path = fixture.write_level("unknown_gid.json", &unknown_gid);
    assert!(world.load_from_file(&path).unwrap_err().is_malformed());

    std::fs::remove_file(fixture.path("coin.png")).unwrap();
    let path = fixture.write_level("missing_image.json", &standing_level());
    let err = world.load_from_file(&path).unwrap_err();
    assert!(err.is_missing_asset());
    assert!(!world.is_loaded());
    assert_eq!(world.body_count(), 0);
}

#[test]
fn unknown_layer_tiles_are_skipped() {
    let fixture = Fixture::new();
    let map = level(2, 2, vec![GROUND, 9, GROUND, GROUND], vec![player(8.0, -10.0)]);
    let path = fixture.write_level("level.json", &map);
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    assert_eq!(world.count_group(Group::TERRAIN), 3);
}

#[test]
fn player_without_lives_starts_failed() {
    let fixture = Fixture::new();
    fixture.write_player(0, 2);
    let path = fixture.write_level("level.json", &standing_level());
    let mut world = World::new();
    world.load_from_file(&path).unwrap();
    assert!(world.is_fail());
    run(&mut world, 10);
    assert_eq!(world.player().unwrap().life, 0);
}

#[test]
fn bad_player_state_name_is_malformed() {
    let fixture = Fixture::new();
    let text = std::fs::read_to_string(fixture.path("player.json")).unwrap();
    std::fs::write(
        fixture.path("player.json"),
        text.replace("fall_right", "crawl_right"),
    )
    .unwrap();
    let path = fixture.write_level("level.json", &standing_level());
    let mut world = World::new();
    assert!(world.load_from_file(&path).unwrap_err().is_malformed());
}

#[test]
fn drawing_follows_player_and_ends_with_hud() {
    let fixture = Fixture::new();
    let path = fixture.write_level("level.json", &standing_level());
    let mut world = World::new();
    world.load_from_file(&path).unwrap();

    let mut frame = Frame::new(ScreenSize::new(320, 240));
    world.run_drawing(&mut frame);

    assert_eq!(frame.camera_target, Some(Vector2::new(16.0, -51.0)));
    assert_eq!(frame.background, Color::new(0x33, 0x66, 0x99, 255));
    assert_eq!(frame.world.len(), 5);
    // terrain first, player last
    match frame.world.last().unwrap() {
        DrawCmd::Texture { tex_key, .. } => assert!(tex_key.ends_with("hero.png")),
        other => panic!("unexpected command {other:?}"),
    }
    // three life icons, coin icon, coin text
    assert_eq!(frame.overlay.len(), 5);
    assert!(matches!(frame.overlay.last(), Some(DrawCmd::Text { text, .. }) if text == "0 x "));
}
