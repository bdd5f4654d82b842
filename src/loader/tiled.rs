//! Conversion of Tiled JSON exports to the text formats read by
//! [`loader::map`](super::map) and [`loader::tileset`](super::tileset).
//!
//! Maps must name their layers `background`, `foreground`, `above` or
//! `actions` and reference exactly one external `.json` tileset, which is
//! expected to be converted next to it as `.tileset`. Custom properties:
//!
//! - map: `player-origin-x`, `player-origin-y` (int)
//! - object of the `actions` layer: `block` (bool), `exec` (string)
//! - tileset tile: `animation-file` (string), `animation-delay` (int, 10 when
//!   absent); the first object of a tile collision editor group becomes its
//!   collision box.

use crate::error::LoadError;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt::Write;

const LAYER_NAMES: [&str; 4] = ["background", "foreground", "above", "actions"];
const DEFAULT_ANIMATION_DELAY: i64 = 10;

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonLayer {
    name: String,
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    objects: Vec<JsonObject>,
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    source: String,
}

#[derive(Deserialize)]
struct JsonMap {
    width: u32,
    height: u32,
    #[serde(default)]
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonObjectGroup {
    #[serde(default)]
    objects: Vec<JsonObject>,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    objectgroup: Option<JsonObjectGroup>,
}

#[derive(Deserialize)]
struct ExternalTileset {
    tilewidth: u32,
    tileheight: u32,
    image: String,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

fn find_property<'a>(props: &'a [JsonProperty], name: &str) -> Option<&'a JsonValue> {
    props.iter().find(|p| p.name == name).map(|p| &p.value)
}

fn write_origin(out: &mut String, props: &[JsonProperty]) {
    let x = find_property(props, "player-origin-x").and_then(JsonValue::as_i64);
    let y = find_property(props, "player-origin-y").and_then(JsonValue::as_i64);

    if let (Some(x), Some(y)) = (x, y) {
        let _ = writeln!(out, "origin|{}|{}", x, y);
    }
}

fn write_tileset_ref(out: &mut String, tilesets: &[JsonTilesetRef]) -> Result<(), LoadError> {
    let [tileset] = tilesets else {
        return Err(LoadError::format("map must contain exactly one tileset"));
    };

    let stem = tileset.source.strip_suffix(".json").ok_or_else(|| {
        LoadError::format(format!("tileset is not a .json file: {}", tileset.source))
    })?;

    let _ = writeln!(out, "tileset|{}.tileset", stem);

    Ok(())
}

// Tiled stores object geometry as floats, only the integer part is kept.
fn write_object(out: &mut String, object: &JsonObject) {
    let block = find_property(&object.properties, "block")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);

    let _ = write!(
        out,
        "{}|{}|{}|{}|{}",
        object.x as i32,
        object.y as i32,
        object.width as u32,
        object.height as u32,
        u8::from(block)
    );

    if let Some(exec) = find_property(&object.properties, "exec").and_then(JsonValue::as_str) {
        let _ = write!(out, "|{}", exec);
    }

    out.push('\n');
}

fn write_layer(out: &mut String, layer: &JsonLayer, columns: u32) -> Result<(), LoadError> {
    if !LAYER_NAMES.contains(&layer.name.as_str()) {
        return Err(LoadError::format(format!("invalid layer name: {}", layer.name)));
    }

    let _ = writeln!(out, "layer|{}", layer.name);

    for row in layer.data.chunks(columns.max(1) as usize) {
        let row: Vec<_> = row.iter().map(u32::to_string).collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }

    for object in &layer.objects {
        write_object(out, object);
    }

    Ok(())
}

/// Convert a Tiled JSON map to the map description format.
pub fn map_from_json(json: &str) -> Result<String, LoadError> {
    let map: JsonMap = serde_json::from_str(json)?;
    let mut out = format!("columns|{}\nrows|{}\n", map.width, map.height);

    write_tileset_ref(&mut out, &map.tilesets)?;
    write_origin(&mut out, &map.properties);

    for layer in &map.layers {
        write_layer(&mut out, layer, map.width)?;
    }

    tracing::debug!(
        columns = map.width,
        rows = map.height,
        layers = map.layers.len(),
        "converted Tiled map"
    );

    Ok(out)
}

fn whole(value: f64, tile: u32) -> Result<i64, LoadError> {
    if value.fract() != 0.0 {
        return Err(LoadError::format(format!(
            "invalid collide object in tile {}: {} is not an integer",
            tile, value
        )));
    }

    Ok(value as i64)
}

fn write_collision(out: &mut String, tile: &JsonTile) -> Result<(), LoadError> {
    let Some(group) = &tile.objectgroup else {
        return Ok(());
    };
    let Some(object) = group.objects.first() else {
        return Err(LoadError::format(format!("empty collide group in tile {}", tile.id)));
    };

    let _ = writeln!(
        out,
        "{}|{}|{}|{}|{}",
        tile.id,
        whole(object.x, tile.id)?,
        whole(object.y, tile.id)?,
        whole(object.width, tile.id)?,
        whole(object.height, tile.id)?
    );

    Ok(())
}

fn write_animation(out: &mut String, tile: &JsonTile) {
    let Some(file) = find_property(&tile.properties, "animation-file").and_then(JsonValue::as_str)
    else {
        return;
    };

    let delay = find_property(&tile.properties, "animation-delay")
        .and_then(JsonValue::as_i64)
        .unwrap_or(DEFAULT_ANIMATION_DELAY);

    let _ = writeln!(out, "{}|{}|{}", tile.id, file, delay);
}

/// Convert a Tiled JSON tileset to the tileset description format.
pub fn tileset_from_json(json: &str) -> Result<String, LoadError> {
    let tileset: ExternalTileset = serde_json::from_str(json)?;
    let mut out = format!(
        "tilewidth|{}\ntileheight|{}\n",
        tileset.tilewidth, tileset.tileheight
    );

    if tileset.tiles.iter().any(|t| t.objectgroup.is_some()) {
        out.push_str("collisions\n");

        for tile in &tileset.tiles {
            write_collision(&mut out, tile)?;
        }
    }

    let mut animations = String::new();

    for tile in &tileset.tiles {
        write_animation(&mut animations, tile);
    }

    if !animations.is_empty() {
        out.push_str("animations\n");
        out.push_str(&animations);
    }

    let _ = writeln!(out, "image|{}", tileset.image);

    tracing::debug!(tiles = tileset.tiles.len(), "converted Tiled tileset");

    Ok(out)
}
