use crate::error::ConfigError;
use macroquad::prelude::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Colors of the debug overlays, as `[r, g, b, a]` bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    /// Cell outlines.
    pub grid_color: [u8; 4],
    /// Tile collision boxes.
    pub collision_color: [u8; 4],
    /// Player footprint.
    pub player_color: [u8; 4],
    /// Blocks of the actions layer.
    pub block_color: [u8; 4],
}

impl Default for MapStyle {
    fn default() -> Self {
        MapStyle {
            grid_color: [0x20, 0x2e, 0x37, 0xff],
            collision_color: [0xa5, 0x30, 0x30, 0xff],
            player_color: [0x4f, 0x8f, 0xba, 0xff],
            block_color: [0xa8, 0xca, 0x58, 0xff],
        }
    }
}

/// Tunables of the movement and camera engine.
///
/// Every field is optional in the JSON form:
///
/// ```json
/// { "speed": 120, "margin_width": 96, "style": { "grid_color": [0, 0, 0, 255] } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Player speed in pixels per second.
    pub speed: u32,
    /// Horizontal distance kept between the player and the view edges.
    pub margin_width: u32,
    /// Vertical distance kept between the player and the view edges.
    pub margin_height: u32,
    /// Milliseconds between two walking frames.
    pub walk_delay: u32,
    /// Debug overlay colors.
    pub style: MapStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            speed: 100,
            margin_width: 160,
            margin_height: 90,
            walk_delay: 150,
            style: MapStyle::default(),
        }
    }
}

impl MapConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration file, only supporting JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
            path: p.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&txt).map_err(|source| ConfigError::Json {
            path: p.to_path_buf(),
            source,
        })
    }
}

pub(crate) fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba(rgba[0], rgba[1], rgba[2], rgba[3])
}
