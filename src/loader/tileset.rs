//! Tileset description format.
//!
//! ```text
//! tilewidth|16
//! tileheight|16
//! collisions
//! 4|0|0|16|16
//! animations
//! 9|water.png|200
//! image|world.png
//! ```
//!
//! Resources are acquired through a [`TilesetLoader`], the parser itself
//! never touches the filesystem except in [`open`].

use super::reader::{directive, LineReader};
use crate::animation::Animation;
use crate::error::LoadError;
use crate::sprite::{Sprite, Texture};
use crate::tileset::{Tileset, TilesetAnimation, TilesetCollision};
use std::path::Path;
use std::rc::Rc;

/// Resource provider used while parsing a tileset.
pub trait TilesetLoader {
    /// Open the texture referenced as `ident` in the tileset file.
    fn new_texture(&mut self, ident: &str) -> Result<Rc<Texture>, LoadError>;

    /// Cut `texture` into `cellw * cellh` cells.
    fn new_sprite(
        &mut self,
        texture: Rc<Texture>,
        cellw: u32,
        cellh: u32,
    ) -> Result<Rc<Sprite>, LoadError> {
        Ok(Rc::new(Sprite::new(texture, cellw, cellh)))
    }

    /// Animation of one tile, one cell every `delay` ms.
    fn new_animation(&mut self, sprite: Rc<Sprite>, delay: u32) -> Result<Animation, LoadError> {
        Ok(Animation::new(sprite, delay))
    }

    /// Make room for `len` collisions in total.
    fn expand_collisions(
        &mut self,
        collisions: &mut Vec<TilesetCollision>,
        len: usize,
    ) -> Result<(), LoadError> {
        grow(collisions, len, "collisions")
    }

    /// Make room for `len` animations in total.
    fn expand_animations(
        &mut self,
        animations: &mut Vec<TilesetAnimation>,
        len: usize,
    ) -> Result<(), LoadError> {
        grow(animations, len, "animations")
    }

    /// Release everything acquired so far.
    fn clear(&mut self) {}

    /// Release everything for good.
    fn finish(&mut self) {
        self.clear();
    }
}

pub(crate) fn grow<T>(vec: &mut Vec<T>, len: usize, what: &str) -> Result<(), LoadError> {
    vec.try_reserve(len.saturating_sub(vec.len()))
        .map_err(|e| LoadError::resource(what, e))
}

#[derive(Debug, Default)]
struct TileSize {
    width: u32,
    height: u32,
}

fn parse_tile_size(reader: &LineReader<'_>, key: &str, value: Option<&str>) -> Result<u32, LoadError> {
    match value.and_then(|v| v.parse::<u32>().ok()) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(reader.error(format_args!("{} is null or invalid", key))),
    }
}

fn parse_collision(line: &str) -> Option<TilesetCollision> {
    let mut fields = line.split('|');
    let collision = TilesetCollision {
        id: fields.next()?.parse().ok()?,
        x: fields.next()?.parse().ok()?,
        y: fields.next()?.parse().ok()?,
        w: fields.next()?.parse().ok()?,
        h: fields.next()?.parse().ok()?,
    };

    fields.next().is_none().then_some(collision)
}

fn parse_animation(line: &str) -> Option<(u32, &str, u32)> {
    let mut fields = line.split('|');
    let id = fields.next()?.parse().ok()?;
    let path = fields.next().filter(|p| !p.is_empty())?;
    let delay = fields.next()?.parse().ok()?;

    fields.next().is_none().then_some((id, path, delay))
}

fn parse_collisions<L: TilesetLoader + ?Sized>(
    loader: &mut L,
    reader: &mut LineReader<'_>,
    tileset: &mut Tileset,
) -> Result<(), LoadError> {
    while let Some(collision) = reader.next_map(parse_collision) {
        let len = tileset.collisions.len() + 1;

        loader.expand_collisions(&mut tileset.collisions, len)?;
        tileset.collisions.push(collision);
    }

    Ok(())
}

fn parse_animations<L: TilesetLoader + ?Sized>(
    loader: &mut L,
    reader: &mut LineReader<'_>,
    size: &TileSize,
    tileset: &mut Tileset,
) -> Result<(), LoadError> {
    while let Some((id, path, delay)) = reader.next_map(parse_animation) {
        let texture = loader.new_texture(path)?;
        let sprite = loader.new_sprite(texture, size.width, size.height)?;
        let animation = loader.new_animation(sprite, delay)?;

        let len = tileset.animations.len() + 1;

        loader.expand_animations(&mut tileset.animations, len)?;
        tileset.animations.push(TilesetAnimation { id, animation });
    }

    Ok(())
}

fn parse_image<L: TilesetLoader + ?Sized>(
    loader: &mut L,
    reader: &LineReader<'_>,
    value: Option<&str>,
    size: &TileSize,
    tileset: &mut Tileset,
) -> Result<(), LoadError> {
    if size.width == 0 || size.height == 0 {
        return Err(reader.error("missing tile dimensions before image"));
    }

    let path = value
        .filter(|p| !p.is_empty())
        .ok_or_else(|| reader.error("could not parse image"))?;
    let texture = loader.new_texture(path)?;

    tileset.sprite = Some(loader.new_sprite(texture, size.width, size.height)?);

    Ok(())
}

/// Parse a tileset description.
pub fn parse<L: TilesetLoader + ?Sized>(loader: &mut L, text: &str) -> Result<Tileset, LoadError> {
    let mut reader = LineReader::new(text);
    let mut tileset = Tileset::default();
    let mut size = TileSize::default();

    while let Some(line) = reader.next_line() {
        let (key, value) = directive(line);

        match key {
            "tilewidth" => size.width = parse_tile_size(&reader, key, value)?,
            "tileheight" => size.height = parse_tile_size(&reader, key, value)?,
            "collisions" | "animations" if value.is_some() => {
                return Err(reader.error(format_args!("invalid {} header", key)));
            }
            "collisions" => parse_collisions(loader, &mut reader, &mut tileset)?,
            "animations" => parse_animations(loader, &mut reader, &size, &mut tileset)?,
            "image" => parse_image(loader, &reader, value, &size, &mut tileset)?,
            _ => tracing::trace!(line = reader.line_no(), key, "ignoring tileset directive"),
        }
    }

    if tileset.sprite.is_none() {
        return Err(LoadError::consistency("missing tileset image"));
    }

    tileset.sort();

    tracing::debug!(
        collisions = tileset.collisions.len(),
        animations = tileset.animations.len(),
        "tileset parsed"
    );

    Ok(tileset)
}

/// Parse a tileset file.
pub fn open<L: TilesetLoader + ?Sized>(
    loader: &mut L,
    path: impl AsRef<Path>,
) -> Result<Tileset, LoadError> {
    let path = path.as_ref();

    tracing::debug!(path = %path.display(), "opening tileset");

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse(loader, &text)
}

/// Parse a tileset held in memory.
pub fn open_mem<L: TilesetLoader + ?Sized>(loader: &mut L, data: &[u8]) -> Result<Tileset, LoadError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| LoadError::format(format!("tileset is not valid UTF-8: {}", e)))?;

    parse(loader, text)
}

/// Release the loader resources and reset `tileset`. Safe to call twice.
pub fn clear<L: TilesetLoader + ?Sized>(loader: &mut L, tileset: &mut Tileset) {
    loader.clear();
    *tileset = Tileset::default();
}

/// Dispose of `loader`, see [`TilesetLoader::finish`].
pub fn finish<L: TilesetLoader + ?Sized>(loader: &mut L) {
    loader.finish();
}

/// Write `tileset` back in the description format.
///
/// Textures are written by name, which loaders set to the identifier read
/// from the original file.
pub fn save(tileset: &Tileset) -> Result<String, LoadError> {
    let sprite = tileset
        .sprite
        .as_ref()
        .ok_or_else(|| LoadError::consistency("missing tileset image"))?;

    let mut out = format!("tilewidth|{}\ntileheight|{}\n", sprite.cellw, sprite.cellh);

    if !tileset.collisions.is_empty() {
        out.push_str("collisions\n");

        for c in &tileset.collisions {
            out.push_str(&format!("{}|{}|{}|{}|{}\n", c.id, c.x, c.y, c.w, c.h));
        }
    }

    if !tileset.animations.is_empty() {
        out.push_str("animations\n");

        for ta in &tileset.animations {
            out.push_str(&format!(
                "{}|{}|{}\n",
                ta.id,
                ta.animation.sprite.texture.name(),
                ta.animation.delay
            ));
        }
    }

    out.push_str(&format!("image|{}\n", sprite.texture.name()));

    Ok(out)
}
