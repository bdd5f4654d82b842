//! Axis sweep against tile collision boxes and map blocks.
//!
//! A move is resolved one axis at a time: find the closest obstacle in the
//! direction of travel (the world edge if nothing else), then shorten the
//! move so the player stops at its near edge.

use crate::layer::MapLayer;
use crate::tileset::{TilesetCollision, Tileset};

/// Axis-aligned rectangle in world pixels.
///
/// Explicit blocks come from the `layer|actions` section of a map, tile
/// derived ones from the tileset collision table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapBlock {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl MapBlock {
    /// Rectangle at `(x, y)` of size `w * h`.
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        MapBlock { x, y, w, h }
    }

    /// First column past the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    /// First row past the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    /// True if both rectangles share a non-empty area.
    pub fn overlaps(&self, other: &MapBlock) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Direction of travel of a single axis move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Decreasing y.
    Up,
    /// Increasing x.
    Right,
    /// Increasing y.
    Down,
    /// Decreasing x.
    Left,
}

impl Direction {
    /// Direction of a horizontal move by `delta` pixels.
    pub fn horizontal(delta: i32) -> Self {
        if delta < 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Direction of a vertical move by `delta` pixels.
    pub fn vertical(delta: i32) -> Self {
        if delta < 0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Can `block` stop `player` moving in `dir`?
///
/// It must overlap the player on the perpendicular axis and not lie
/// entirely behind it.
pub(crate) fn is_relevant(player: &MapBlock, block: &MapBlock, dir: Direction) -> bool {
    match dir {
        Direction::Up | Direction::Down => {
            if block.right() <= player.x || block.x >= player.right() {
                return false;
            }

            match dir {
                Direction::Up => block.y < player.bottom(),
                _ => block.bottom() > player.bottom(),
            }
        }
        Direction::Left | Direction::Right => {
            if block.bottom() <= player.y || block.y >= player.bottom() {
                return false;
            }

            match dir {
                Direction::Left => block.x < player.right(),
                _ => block.right() > player.right(),
            }
        }
    }
}

/// Is `candidate` met before `current` when moving in `dir`?
pub(crate) fn is_closer(current: &MapBlock, candidate: &MapBlock, dir: Direction) -> bool {
    match dir {
        Direction::Up => candidate.bottom() > current.bottom(),
        Direction::Down => candidate.y < current.y,
        Direction::Left => candidate.right() > current.right(),
        Direction::Right => candidate.x < current.x,
    }
}

/// World coordinates are `i32`, larger worlds are cut at `i32::MAX`.
fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Map state needed by one collision query, borrowed for a single move.
pub(crate) struct Sweep<'a> {
    pub tileset: &'a Tileset,
    /// Tested in order, the first layer with a collision box wins a cell.
    pub layers: [&'a MapLayer; 2],
    pub blocks: &'a [MapBlock],
    pub columns: u32,
    pub rows: u32,
    pub player: MapBlock,
}

impl Sweep<'_> {
    fn tile_w(&self) -> i32 {
        self.tileset.tile_width().max(1) as i32
    }

    fn tile_h(&self) -> i32 {
        self.tileset.tile_height().max(1) as i32
    }

    fn columns(&self) -> i32 {
        saturate(self.columns as i64)
    }

    fn rows(&self) -> i32 {
        saturate(self.rows as i64)
    }

    fn world_w(&self) -> i32 {
        saturate(self.columns as i64 * self.tile_w() as i64)
    }

    fn world_h(&self) -> i32 {
        saturate(self.rows as i64 * self.tile_h() as i64)
    }

    fn tile_collision(&self, row: i32, col: i32) -> Option<&TilesetCollision> {
        if row < 0 || col < 0 || row >= self.rows() || col >= self.columns() {
            return None;
        }

        self.layers.iter().find_map(|layer| {
            layer
                .tile(self.columns, row as u32, col as u32)
                .and_then(|id| self.tileset.collision(id - 1))
        })
    }

    /// Closest obstacle in `dir`, the world edge when nothing else is.
    pub fn find_block(&self, dir: Direction) -> MapBlock {
        let (tw, th) = (self.tile_w(), self.tile_h());
        let (ww, wh) = (self.world_w(), self.world_h());
        let p = &self.player;

        let pcol = p.x.div_euclid(tw);
        let prow = p.y.div_euclid(th);
        let ncols = p.w as i32 / tw + 1;
        let nrows = p.h as i32 / th + 1;

        let (rows, cols, mut best) = match dir {
            Direction::Up => (
                (0, prow),
                (pcol, pcol + ncols),
                MapBlock::new(0, 0, ww as u32, 0),
            ),
            Direction::Down => (
                (prow, self.rows() - 1),
                (pcol, pcol + ncols),
                MapBlock::new(0, wh, ww as u32, 0),
            ),
            Direction::Left => (
                (prow, prow + nrows),
                (0, pcol),
                MapBlock::new(0, 0, 0, wh as u32),
            ),
            Direction::Right => (
                (prow, prow + nrows),
                (pcol, self.columns() - 1),
                MapBlock::new(ww, 0, 0, wh as u32),
            ),
        };

        for r in rows.0..=rows.1 {
            for c in cols.0..=cols.1 {
                let Some(td) = self.tile_collision(r, c) else {
                    continue;
                };

                let shape = MapBlock::new(td.x + c * tw, td.y + r * th, td.w, td.h);

                if is_relevant(p, &shape, dir) && is_closer(&best, &shape, dir) {
                    best = shape;
                }
            }
        }

        for block in self.blocks {
            if is_relevant(p, block, dir) && is_closer(&best, block, dir) {
                best = *block;
            }
        }

        best
    }

    /// Shorten `delta` so the player stops at the closest obstacle.
    pub fn clamp(&self, dir: Direction, delta: i32) -> i32 {
        let block = self.find_block(dir);
        let p = &self.player;

        match dir {
            Direction::Up if p.y + delta < block.bottom() => block.bottom() - p.y,
            Direction::Down if p.bottom() + delta >= block.y => block.y - p.bottom(),
            Direction::Left if p.x + delta < block.right() => block.right() - p.x,
            Direction::Right if p.right() + delta >= block.x => block.x - p.right(),
            _ => delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{Sprite, Texture};
    use std::rc::Rc;

    fn tileset(collisions: Vec<TilesetCollision>) -> Tileset {
        let sheet = Texture::blank("sheet", 64, 64);
        let mut ts = Tileset {
            sprite: Some(Rc::new(Sprite::new(Rc::new(sheet), 16, 16))),
            collisions,
            ..Default::default()
        };
        ts.sort();
        ts
    }

    fn full_box(id: u32) -> TilesetCollision {
        TilesetCollision {
            id,
            x: 0,
            y: 0,
            w: 16,
            h: 16,
        }
    }

    #[test]
    fn relevance_requires_perpendicular_overlap() {
        let player = MapBlock::new(100, 100, 16, 16);

        // Above, same column.
        assert!(is_relevant(&player, &MapBlock::new(100, 50, 16, 16), Direction::Up));
        // Above, but entirely on the right.
        assert!(!is_relevant(&player, &MapBlock::new(116, 50, 16, 16), Direction::Up));
        // Below the player, useless when going up.
        assert!(!is_relevant(&player, &MapBlock::new(100, 116, 16, 16), Direction::Up));
        assert!(is_relevant(&player, &MapBlock::new(100, 116, 16, 16), Direction::Down));
        // Left and right.
        assert!(is_relevant(&player, &MapBlock::new(50, 108, 8, 8), Direction::Left));
        assert!(!is_relevant(&player, &MapBlock::new(50, 108, 8, 8), Direction::Right));
        assert!(is_relevant(&player, &MapBlock::new(140, 90, 8, 12), Direction::Right));
    }

    #[test]
    fn closer_compares_near_edges() {
        let far = MapBlock::new(0, 0, 10, 10);
        let near = MapBlock::new(0, 20, 10, 10);

        assert!(is_closer(&far, &near, Direction::Up));
        assert!(!is_closer(&near, &far, Direction::Up));
        assert!(is_closer(&near, &far, Direction::Down));
        assert!(is_closer(
            &MapBlock::new(0, 0, 5, 5),
            &MapBlock::new(10, 0, 5, 5),
            Direction::Left
        ));
        assert!(is_closer(
            &MapBlock::new(10, 0, 5, 5),
            &MapBlock::new(0, 0, 5, 5),
            Direction::Right
        ));
    }

    #[test]
    fn world_edges_stop_the_player() {
        let ts = tileset(vec![]);
        let layer = MapLayer {
            tiles: vec![1; 100],
        };
        let sweep = Sweep {
            tileset: &ts,
            layers: [&layer, &layer],
            blocks: &[],
            columns: 10,
            rows: 10,
            player: MapBlock::new(10, 140, 16, 16),
        };

        assert_eq!(sweep.clamp(Direction::Left, -50), -10);
        assert_eq!(sweep.clamp(Direction::Down, 50), 160 - 156);
        assert_eq!(sweep.clamp(Direction::Right, 5), 5);
        assert_eq!(sweep.clamp(Direction::Up, -5), -5);
    }

    #[test]
    fn huge_worlds_do_not_overflow() {
        let ts = tileset(vec![full_box(0)]);
        let empty = MapLayer::default();
        let sweep = Sweep {
            tileset: &ts,
            layers: [&empty, &empty],
            blocks: &[],
            columns: 1 << 28,
            rows: 1 << 28,
            player: MapBlock::new(0, 32, 16, 16),
        };

        assert_eq!(sweep.world_w(), i32::MAX);
        assert_eq!(sweep.find_block(Direction::Up), MapBlock::new(0, 0, i32::MAX as u32, 0));
        assert_eq!(sweep.clamp(Direction::Up, -100), -32);
        assert_eq!(sweep.clamp(Direction::Left, -100), 0);
    }

    #[test]
    fn foreground_box_shadows_background_box() {
        // Background tile 1 is solid, foreground tile 2 only has a thin box
        // at the top of the cell.
        let ts = tileset(vec![
            full_box(0),
            TilesetCollision {
                id: 1,
                x: 0,
                y: 0,
                w: 16,
                h: 2,
            },
        ]);
        let mut bg = MapLayer {
            tiles: vec![0; 100],
        };
        let mut fg = bg.clone();
        bg.tiles[3] = 1;
        fg.tiles[3] = 2;

        let sweep = Sweep {
            tileset: &ts,
            layers: [&fg, &bg],
            blocks: &[],
            columns: 10,
            rows: 10,
            player: MapBlock::new(48, 40, 16, 16),
        };

        assert_eq!(sweep.find_block(Direction::Up), MapBlock::new(48, 0, 16, 2));
    }

    #[test]
    fn explicit_blocks_beat_farther_tiles() {
        let ts = tileset(vec![full_box(0)]);
        let mut bg = MapLayer {
            tiles: vec![0; 100],
        };
        bg.tiles[9] = 1; // row 0, column 9
        let fg = MapLayer {
            tiles: vec![0; 100],
        };
        let blocks = [MapBlock::new(80, 0, 8, 16)];

        let sweep = Sweep {
            tileset: &ts,
            layers: [&fg, &bg],
            blocks: &blocks,
            columns: 10,
            rows: 10,
            player: MapBlock::new(20, 0, 16, 16),
        };

        assert_eq!(sweep.find_block(Direction::Right), blocks[0]);
        assert_eq!(sweep.clamp(Direction::Right, 100), 80 - 36);
    }
}
