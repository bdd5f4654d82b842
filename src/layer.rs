use std::fmt;
use std::str::FromStr;

/// Z-order of a tile layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    /// Drawn first.
    Background,
    /// Drawn under the player.
    Foreground,
    /// Drawn over the player.
    Above,
}

impl LayerType {
    /// Every type, in drawing order.
    pub const ALL: [LayerType; 3] = [LayerType::Background, LayerType::Foreground, LayerType::Above];

    /// Name used in `layer|<name>` headers.
    pub fn name(self) -> &'static str {
        match self {
            LayerType::Background => "background",
            LayerType::Foreground => "foreground",
            LayerType::Above => "above",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for LayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "background" => Ok(LayerType::Background),
            "foreground" => Ok(LayerType::Foreground),
            "above" => Ok(LayerType::Above),
            other => Err(format!("invalid layer type: {}", other)),
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `columns * rows` grid of 1-based tile ids, 0 meaning no tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapLayer {
    /// Row-major tile ids, empty when the layer is absent.
    pub tiles: Vec<u32>,
}

impl MapLayer {
    /// True if the map file had this layer.
    pub fn is_loaded(&self) -> bool {
        !self.tiles.is_empty()
    }

    /// Raw value at `(row, col)`, `None` outside the grid or for empty cells.
    pub fn tile(&self, columns: u32, row: u32, col: u32) -> Option<u32> {
        if col >= columns {
            return None;
        }

        let index = (row as usize)
            .checked_mul(columns as usize)?
            .checked_add(col as usize)?;

        match self.tiles.get(index) {
            Some(&0) | None => None,
            Some(&id) => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cells_and_out_of_range_are_none() {
        let layer = MapLayer {
            tiles: vec![1, 0, 3, 4],
        };

        assert_eq!(layer.tile(2, 0, 0), Some(1));
        assert_eq!(layer.tile(2, 0, 1), None);
        assert_eq!(layer.tile(2, 1, 1), Some(4));
        assert_eq!(layer.tile(2, 0, 2), None);
        assert_eq!(layer.tile(2, 2, 0), None);
        assert_eq!(layer.tile(u32::MAX, u32::MAX, 1), None);
    }

    #[test]
    fn names_round_trip() {
        for ty in LayerType::ALL {
            assert_eq!(ty.name().parse::<LayerType>(), Ok(ty));
        }
        assert!("actions".parse::<LayerType>().is_err());
    }
}
