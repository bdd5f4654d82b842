// tests/tiled_tests.rs

use macroquad_rpg_map::loader::memory::{AssetBundle, MemoryMapLoader};
use macroquad_rpg_map::loader::tiled::{map_from_json, tileset_from_json};
use macroquad_rpg_map::{LayerType, MapBlock};
use std::rc::Rc;

const SHEET: &[u8] = include_bytes!("assets/sheet.png");
const WATER: &[u8] = include_bytes!("assets/water.png");

const TILESET_JSON: &str = r#"{
    "columns": 4,
    "tilecount": 16,
    "tilewidth": 16,
    "tileheight": 16,
    "image": "sheet.png",
    "tiles": [
        { "id": 2, "properties": [
            { "name": "animation-file", "type": "string", "value": "water.png" },
            { "name": "animation-delay", "type": "int", "value": 200 }
        ] },
        { "id": 3, "objectgroup": { "draworder": "index", "objects": [
            { "id": 1, "x": 0, "y": 0, "width": 16, "height": 16, "rotation": 0 }
        ] } }
    ]
}"#;

fn map_json() -> String {
    let background: Vec<&str> = (0..16).map(|i| if i == 5 { "4" } else { "1" }).collect();

    format!(
        r#"{{
            "width": 4,
            "height": 4,
            "tilewidth": 16,
            "tileheight": 16,
            "properties": [
                {{ "name": "player-origin-x", "type": "int", "value": 32 }},
                {{ "name": "player-origin-y", "type": "int", "value": 40 }}
            ],
            "layers": [
                {{ "name": "background", "type": "tilelayer", "data": [{}] }},
                {{ "name": "foreground", "type": "tilelayer", "data": [{}] }},
                {{ "name": "actions", "type": "objectgroup", "objects": [
                    {{ "x": 48, "y": 0, "width": 16, "height": 16, "properties": [
                        {{ "name": "block", "type": "bool", "value": true }},
                        {{ "name": "exec", "type": "string", "value": "chest:gold" }}
                    ] }}
                ] }}
            ],
            "tilesets": [ {{ "firstgid": 1, "source": "world.json" }} ]
        }}"#,
        background.join(", "),
        vec!["0"; 16].join(", ")
    )
}

#[test]
fn converted_files_load_through_the_memory_loader() {
    let bundle = Rc::new(
        AssetBundle::new()
            .with("town.map", map_from_json(&map_json()).unwrap())
            .with("world.tileset", tileset_from_json(TILESET_JSON).unwrap())
            .with("sheet.png", SHEET)
            .with("water.png", WATER),
    );

    let mut loader = MemoryMapLoader::new(bundle, "town.map");
    let map = loader.load().unwrap();

    assert_eq!((map.columns, map.rows), (4, 4));
    assert_eq!((map.player.x, map.player.y), (32, 40));
    assert_eq!(map.tileset_ident, "world.tileset");
    assert_eq!(map.layer(LayerType::Background).tiles[5], 4);
    assert!(!map.layer(LayerType::Above).is_loaded());
    assert_eq!(map.blocks, [MapBlock::new(48, 0, 16, 16)]);
    assert_eq!(loader.objects()[0].argument, "chest:gold");

    let tileset = &map.tileset;
    assert_eq!(tileset.tile_width(), 16);
    assert_eq!(tileset.collision(3).map(|c| (c.w, c.h)), Some((16, 16)));
    assert_eq!(tileset.animation(2).map(|a| a.animation.delay), Some(200));
}
