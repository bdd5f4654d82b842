#![warn(missing_docs)]

//! Tile maps for Macroquad RPGs: text tileset and map formats, pluggable
//! resource loaders, and a map engine moving a player against tile and
//! object collisions under a scrolling camera.
//!
//! ```no_run
//! use macroquad_rpg_map::loader::{file::FileMapLoader, map};
//!
//! let mut loader = FileMapLoader::new("assets/maps/town.map");
//! let mut town = map::open(&mut loader, "assets/maps/town.map")?;
//! map::load_player(&mut loader, &mut town, "../sprites/hero.png", 48, 48)?;
//! town.init(800, 600);
//! # Ok::<(), macroquad_rpg_map::LoadError>(())
//! ```

mod action;
mod animation;
mod collision;
mod command;
mod config;
mod error;
mod event;
mod layer;
/// Text formats, the loader strategies feeding them and Tiled conversion.
pub mod loader {
    mod pool;
    mod reader;

    pub mod file;
    pub mod map;
    pub mod memory;
    pub mod tiled;
    pub mod tileset;

    pub use pool::ResourcePool;
}
mod map;
mod painter;
mod sprite;
mod tileset;
mod view;

pub use action::{Action, ActionStack};
pub use animation::{Animation, WalkSprite};
pub use collision::{Direction, MapBlock};
pub use command::DrawCommand;
pub use config::{MapConfig, MapStyle};
pub use error::{ConfigError, ErrorKind, LoadError};
pub use event::{poll_events, Event, Key};
pub use layer::{LayerType, MapLayer};
pub use loader::map::MapObject;
pub use map::{
    facing_for, Map, MapFlags, MapState, Player, MOVING_DOWN, MOVING_LEFT, MOVING_RIGHT,
    MOVING_UP,
};
pub use painter::{Painter, Recorder, ScreenPainter};
pub use sprite::{Sprite, Texture};
pub use tileset::{Tileset, TilesetAnimation, TilesetCollision};
pub use view::{Margin, TileWindow, Viewport};
