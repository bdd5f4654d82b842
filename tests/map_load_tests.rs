// tests/map_load_tests.rs

use macroquad_rpg_map::loader::file::FileMapLoader;
use macroquad_rpg_map::loader::map::{self, MapLoader};
use macroquad_rpg_map::loader::memory::{AssetBundle, MemoryMapLoader};
use macroquad_rpg_map::{ErrorKind, LayerType, LoadError, MapBlock, MapState, Tileset};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

const SHEET: &[u8] = include_bytes!("assets/sheet.png");
const WATER: &[u8] = include_bytes!("assets/water.png");
const HERO: &[u8] = include_bytes!("assets/sprites/hero.png");
const SHARED: &str = include_str!("assets/shared.tileset");
const TOWN: &str = include_str!("assets/maps/town.map");

fn scenario_b() -> String {
    let mut text = String::from("columns|10\nrows|10\ntileset|../shared.tileset\norigin|5|5\n");

    text.push_str("layer|background\n");
    for _ in 0..10 {
        text.push_str("1 1 1 1 1 1 1 1 1 1\n");
    }
    text.push_str("layer|foreground\n");
    for _ in 0..10 {
        text.push_str("0 0 0 0 0 0 0 0 0 0\n");
    }

    text
}

/// `<tmp>/shared.tileset` with its images, and `<tmp>/maps/<name>`.
fn write_map(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    fs::write(dir.path().join("shared.tileset"), SHARED).unwrap();
    fs::write(dir.path().join("sheet.png"), SHEET).unwrap();
    fs::write(dir.path().join("water.png"), WATER).unwrap();
    fs::create_dir_all(dir.path().join("maps")).unwrap();

    let path = dir.path().join("maps").join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn map_with_relative_tileset_loads() {
    let dir = TempDir::new().unwrap();
    let path = write_map(&dir, "b.map", &scenario_b());

    let mut loader = FileMapLoader::new(&path);
    let map = map::open(&mut loader, &path).expect("map should load");

    assert_eq!((map.columns, map.rows), (10, 10));
    assert_eq!((map.player.x, map.player.y), (5, 5));
    assert!(map.blocks.is_empty());
    assert!(map.tileset.ok());
    assert_eq!(map.layer(LayerType::Background).tiles, vec![1; 100]);
    assert!(!map.layer(LayerType::Above).is_loaded());
    assert_eq!(map.state(), MapState::Idle);
    assert!(loader.tileset_loader().is_some());
}

#[test]
fn file_loader_records_objects() {
    let dir = TempDir::new().unwrap();
    let path = write_map(&dir, "town.map", TOWN);

    let mut loader = FileMapLoader::new(&path);
    let map = map::open(&mut loader, &path).unwrap();

    assert_eq!(map.blocks, [MapBlock::new(320, 64, 32, 32)]);
    assert_eq!(loader.objects().len(), 2);
    assert_eq!(loader.objects()[0].argument, "chest:gold");
    assert!(!loader.objects()[1].is_block);
    assert_eq!(loader.objects()[1].argument, "sign:Welcome to town");
}

#[test]
fn clear_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_map(&dir, "town.map", TOWN);

    let mut loader = FileMapLoader::new(&path);
    let mut map = map::open(&mut loader, &path).unwrap();
    map.config.speed = 42;

    map::clear(&mut loader, &mut map);
    map::clear(&mut loader, &mut map);
    map::finish(&mut loader);
    map::finish(&mut loader);

    assert_eq!(map.state(), MapState::Unloaded);
    assert_eq!(map.config.speed, 42);
    assert!(loader.objects().is_empty());
    assert!(loader.tileset_loader().is_none());
}

#[test]
fn broken_tileset_aborts_map() {
    let dir = TempDir::new().unwrap();
    let path = write_map(&dir, "b.map", &scenario_b());
    fs::write(dir.path().join("shared.tileset"), "tilewidth|16\n").unwrap();

    let err = map::open(&mut FileMapLoader::new(&path), &path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Consistency);

    fs::remove_file(dir.path().join("shared.tileset")).unwrap();
    let err = map::open(&mut FileMapLoader::new(&path), &path).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn player_sprite_is_released_on_clear() {
    let dir = TempDir::new().unwrap();
    let path = write_map(&dir, "b.map", &scenario_b());
    fs::create_dir_all(dir.path().join("sprites")).unwrap();
    fs::write(dir.path().join("sprites/hero.png"), HERO).unwrap();

    let mut loader = FileMapLoader::new(&path);
    let mut map = map::open(&mut loader, &path).unwrap();
    map::load_player(&mut loader, &mut map, "../sprites/hero.png", 16, 16).unwrap();

    let sprite = map.player.sprite.clone().unwrap();
    assert_eq!((sprite.nrows, sprite.ncols), (8, 3));
    assert_eq!(loader.pool().sprites(), 1);

    map::clear(&mut loader, &mut map);
    assert!(map.player.sprite.is_none());
    assert_eq!(Rc::strong_count(&sprite), 1);
}

#[test]
fn memory_loader_resolves_parent_paths() {
    let bundle = Rc::new(
        AssetBundle::new()
            .with("data/maps/b.map", scenario_b())
            .with("data/shared.tileset", SHARED)
            .with("data/sheet.png", SHEET)
            .with("data/water.png", WATER),
    );

    let mut loader = MemoryMapLoader::new(bundle, "data/maps/b.map");
    let map = loader.load().unwrap();

    assert!(map.blocks.is_empty());
    assert_eq!(map.tileset_ident, "../shared.tileset");
    assert_eq!(map.tileset.tile_width(), 16);
    assert_eq!(loader.tileset_loader().unwrap().pool().textures(), 2);
}

#[test]
fn memory_loader_records_objects() {
    let text = format!(
        "{}layer|actions\n32|48|16|16|0|sign:welcome\n0|0|160|8|1\n",
        scenario_b()
    );
    let bundle = Rc::new(
        AssetBundle::new()
            .with("maps/b.map", text)
            .with("shared.tileset", SHARED)
            .with("sheet.png", SHEET)
            .with("water.png", WATER),
    );

    let mut loader = MemoryMapLoader::new(bundle, "maps/b.map");
    let mut map = loader.load().unwrap();

    let objects = loader.objects();
    assert_eq!(objects.len(), 2);
    assert_eq!((objects[0].x, objects[0].y), (32, 48));
    assert!(!objects[0].is_block);
    assert_eq!(objects[0].argument, "sign:welcome");
    assert!(objects[1].is_block);
    assert_eq!(map.blocks, [MapBlock::new(0, 0, 160, 8)]);

    map::clear(&mut loader, &mut map);
    assert!(loader.objects().is_empty());
}

#[test]
fn save_round_trip_keeps_structure() {
    let dir = TempDir::new().unwrap();
    let path = write_map(&dir, "town.map", TOWN);
    let first = map::open(&mut FileMapLoader::new(&path), &path).unwrap();

    let saved = write_map(&dir, "saved.map", &map::save(&first));
    let second = map::open(&mut FileMapLoader::new(&saved), &saved).unwrap();

    assert_eq!((first.columns, first.rows), (second.columns, second.rows));
    assert_eq!(first.layers, second.layers);
    assert_eq!(first.blocks, second.blocks);
    assert_eq!(
        (first.player.x, first.player.y),
        (second.player.x, second.player.y)
    );
    assert_eq!(first.tileset.collisions, second.tileset.collisions);
    assert_eq!(map::save(&second), map::save(&first));
}

/// Loader keeping blocks in a fixed-capacity store.
struct TinyLoader {
    max_blocks: usize,
}

impl MapLoader for TinyLoader {
    fn new_tileset(&mut self, _ident: &str) -> Result<Tileset, LoadError> {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/assets");
        let path = dir.join("shared.tileset");

        macroquad_rpg_map::loader::tileset::open(
            &mut macroquad_rpg_map::loader::file::FileTilesetLoader::new(&path),
            &path,
        )
    }

    fn expand_blocks(&mut self, blocks: &mut Vec<MapBlock>, len: usize) -> Result<(), LoadError> {
        if len > self.max_blocks {
            return Err(LoadError::Resource {
                ident: "blocks".into(),
                reason: format!("at most {} blocks", self.max_blocks),
            });
        }

        blocks.reserve(len - blocks.len());
        Ok(())
    }
}

#[test]
fn capability_failure_is_resource_error() {
    let text = format!("{}layer|actions\n0|0|1|1|1\n1|1|1|1|1\n", scenario_b());

    let ok = map::parse(&mut TinyLoader { max_blocks: 2 }, &text).unwrap();
    assert_eq!(ok.blocks.len(), 2);

    let err = map::parse(&mut TinyLoader { max_blocks: 1 }, &text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resource);
}
