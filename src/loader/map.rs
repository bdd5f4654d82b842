//! Map description format.
//!
//! ```text
//! columns|3
//! rows|2
//! tileset|world.tileset
//! origin|16|16
//! layer|background
//! 1 1 1
//! 1 2 1
//! layer|foreground
//! 0 0 0 0 0 0
//! layer|actions
//! 16|0|16|16|1|chest:gold
//! ```

use super::reader::{directive, LineReader};
use super::tileset::grow;
use crate::collision::MapBlock;
use crate::error::LoadError;
use crate::layer::{LayerType, MapLayer};
use crate::map::Map;
use crate::sprite::{Sprite, Texture};
use crate::tileset::Tileset;
use std::path::Path;
use std::rc::Rc;

/// One line of the `layer|actions` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapObject {
    /// World x.
    pub x: i32,
    /// World y.
    pub y: i32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
    /// Also registered as a collision block.
    pub is_block: bool,
    /// Free text after the fifth field, empty if absent.
    pub argument: String,
}

/// Resource provider used while parsing a map.
pub trait MapLoader {
    /// Resolve and load the tileset referenced as `ident`.
    fn new_tileset(&mut self, ident: &str) -> Result<Tileset, LoadError>;

    /// Open the texture referenced as `ident`, used for the player sprite.
    fn new_texture(&mut self, ident: &str) -> Result<Rc<Texture>, LoadError> {
        Err(LoadError::resource(ident, "textures are not supported by this loader"))
    }

    /// Cut `texture` into cells.
    fn new_sprite(
        &mut self,
        texture: Rc<Texture>,
        cellw: u32,
        cellh: u32,
    ) -> Result<Rc<Sprite>, LoadError> {
        Ok(Rc::new(Sprite::new(texture, cellw, cellh)))
    }

    /// Zeroed storage for the `count` tiles of a layer.
    fn new_tiles(&mut self, layer: LayerType, count: usize) -> Result<Vec<u32>, LoadError> {
        let mut tiles = Vec::new();

        tiles
            .try_reserve_exact(count)
            .map_err(|e| LoadError::resource(layer.name(), e))?;
        tiles.resize(count, 0);

        Ok(tiles)
    }

    /// Register an object, returns false if the loader has no use for it.
    fn new_object(&mut self, object: &MapObject) -> bool {
        let _ = object;
        false
    }

    /// Make room for `len` blocks in total.
    fn expand_blocks(&mut self, blocks: &mut Vec<MapBlock>, len: usize) -> Result<(), LoadError> {
        grow(blocks, len, "blocks")
    }

    /// Release everything acquired so far.
    fn clear(&mut self) {}

    /// Release everything for good.
    fn finish(&mut self) {
        self.clear();
    }
}

fn parse_dimension(reader: &LineReader<'_>, key: &str, value: Option<&str>) -> Result<u32, LoadError> {
    match value.and_then(|v| v.parse::<u32>().ok()) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(reader.error(format_args!("null map {}", key))),
    }
}

fn parse_origin(reader: &LineReader<'_>, value: Option<&str>) -> Result<(i32, i32), LoadError> {
    value
        .and_then(|v| v.split_once('|'))
        .and_then(|(x, y)| Some((x.parse().ok()?, y.parse().ok()?)))
        .ok_or_else(|| reader.error("invalid origin"))
}

fn parse_object(line: &str) -> Option<MapObject> {
    let mut fields = line.splitn(6, '|');

    Some(MapObject {
        x: fields.next()?.parse().ok()?,
        y: fields.next()?.parse().ok()?,
        w: fields.next()?.parse().ok()?,
        h: fields.next()?.parse().ok()?,
        is_block: fields.next()?.parse::<i32>().ok()? != 0,
        argument: fields.next().unwrap_or_default().to_owned(),
    })
}

fn parse_tile_line(line: &str) -> Option<Vec<u32>> {
    line.split_whitespace().map(|t| t.parse().ok()).collect()
}

fn parse_tiles<L: MapLoader + ?Sized>(
    loader: &mut L,
    reader: &mut LineReader<'_>,
    layer: LayerType,
    map: &mut Map,
) -> Result<(), LoadError> {
    let count = map
        .columns
        .checked_mul(map.rows)
        .ok_or_else(|| reader.error(format_args!("map too large: {}x{}", map.columns, map.rows)))?;
    let count = count as usize;
    let mut tiles = loader.new_tiles(layer, count)?;
    let mut n = 0;

    tiles.resize(count, 0);

    while n < count {
        let Some(values) = reader.next_map(parse_tile_line) else {
            break;
        };

        for value in values.into_iter().take(count - n) {
            tiles[n] = value;
            n += 1;
        }
    }

    if n < count {
        tracing::warn!(%layer, expected = count, found = n, "short layer, filling with empty tiles");
    }

    *map.layer_mut(layer) = MapLayer { tiles };

    Ok(())
}

fn parse_objects<L: MapLoader + ?Sized>(
    loader: &mut L,
    reader: &mut LineReader<'_>,
    map: &mut Map,
) -> Result<(), LoadError> {
    while let Some(object) = reader.next_map(parse_object) {
        if !loader.new_object(&object) {
            tracing::trace!(?object, "ignoring object");
        }

        if object.is_block {
            let len = map.blocks.len() + 1;

            loader.expand_blocks(&mut map.blocks, len)?;
            map.blocks
                .push(MapBlock::new(object.x, object.y, object.w, object.h));
        }
    }

    Ok(())
}

fn parse_layer<L: MapLoader + ?Sized>(
    loader: &mut L,
    reader: &mut LineReader<'_>,
    value: Option<&str>,
    map: &mut Map,
) -> Result<(), LoadError> {
    if map.columns == 0 || map.rows == 0 {
        return Err(reader.error("missing map dimensions before layer"));
    }

    match value {
        None | Some("") => Err(reader.error("missing layer type definition")),
        Some("actions") => parse_objects(loader, reader, map),
        Some(name) => {
            let layer = name.parse::<LayerType>().map_err(|e| reader.error(e))?;
            parse_tiles(loader, reader, layer, map)
        }
    }
}

fn check(map: &Map) -> Result<(), LoadError> {
    if !map.layer(LayerType::Background).is_loaded() {
        return Err(LoadError::consistency("missing background layer"));
    }
    if !map.layer(LayerType::Foreground).is_loaded() {
        return Err(LoadError::consistency("missing foreground layer"));
    }
    if !map.tileset.ok() {
        return Err(LoadError::consistency("missing tileset"));
    }

    Ok(())
}

/// Parse a map description.
pub fn parse<L: MapLoader + ?Sized>(loader: &mut L, text: &str) -> Result<Map, LoadError> {
    let mut reader = LineReader::new(text);
    let mut map = Map::default();

    while let Some(line) = reader.next_line() {
        let (key, value) = directive(line);

        match key {
            "columns" => map.columns = parse_dimension(&reader, key, value)?,
            "rows" => map.rows = parse_dimension(&reader, key, value)?,
            "tileset" => {
                let ident = value
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| reader.error("could not parse tileset"))?;

                map.tileset = loader.new_tileset(ident)?;
                map.tileset_ident = ident.to_owned();
            }
            "origin" => (map.player.x, map.player.y) = parse_origin(&reader, value)?,
            "layer" => parse_layer(loader, &mut reader, value, &mut map)?,
            _ => tracing::trace!(line = reader.line_no(), key, "ignoring map directive"),
        }
    }

    check(&map)?;

    tracing::debug!(
        columns = map.columns,
        rows = map.rows,
        blocks = map.blocks.len(),
        "map parsed"
    );

    Ok(map)
}

/// Parse a map file.
pub fn open<L: MapLoader + ?Sized>(loader: &mut L, path: impl AsRef<Path>) -> Result<Map, LoadError> {
    let path = path.as_ref();

    tracing::debug!(path = %path.display(), "opening map");

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse(loader, &text)
}

/// Parse a map held in memory.
pub fn open_mem<L: MapLoader + ?Sized>(loader: &mut L, data: &[u8]) -> Result<Map, LoadError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| LoadError::format(format!("map is not valid UTF-8: {}", e)))?;

    parse(loader, text)
}

/// Give the player a walking sprite acquired through `loader`, so it is
/// released together with the map resources.
pub fn load_player<L: MapLoader + ?Sized>(
    loader: &mut L,
    map: &mut Map,
    ident: &str,
    cellw: u32,
    cellh: u32,
) -> Result<(), LoadError> {
    let texture = loader.new_texture(ident)?;

    map.player.sprite = Some(loader.new_sprite(texture, cellw, cellh)?);

    Ok(())
}

/// End the map actions, release the loader resources and reset `map`,
/// keeping its configuration. Safe to call twice.
pub fn clear<L: MapLoader + ?Sized>(loader: &mut L, map: &mut Map) {
    let config = std::mem::take(&mut map.config);

    map.actions.clear();
    map.sequence.clear();
    loader.clear();
    *map = Map::default();
    map.config = config;
}

/// Dispose of `loader`, see [`MapLoader::finish`].
pub fn finish<L: MapLoader + ?Sized>(loader: &mut L) {
    loader.finish();
}

/// Write `map` back in the description format, blocks become blocking
/// objects without argument.
pub fn save(map: &Map) -> String {
    let mut out = format!("columns|{}\nrows|{}\n", map.columns, map.rows);

    if !map.tileset_ident.is_empty() {
        out.push_str(&format!("tileset|{}\n", map.tileset_ident));
    }

    out.push_str(&format!("origin|{}|{}\n", map.player.x, map.player.y));

    for ty in LayerType::ALL {
        let layer = map.layer(ty);

        if !layer.is_loaded() {
            continue;
        }

        out.push_str(&format!("layer|{}\n", ty));

        for row in layer.tiles.chunks(map.columns.max(1) as usize) {
            let row: Vec<_> = row.iter().map(u32::to_string).collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }
    }

    if !map.blocks.is_empty() {
        out.push_str("layer|actions\n");

        for b in &map.blocks {
            out.push_str(&format!("{}|{}|{}|{}|1\n", b.x, b.y, b.w, b.h));
        }
    }

    out
}
