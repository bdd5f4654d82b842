use crate::animation::Animation;
use crate::painter::Painter;
use crate::sprite::Sprite;
use std::rc::Rc;

/// Collision box of one tile, relative to the tile origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilesetCollision {
    /// Sprite cell index (`column + row * ncols`).
    pub id: u32,
    /// Left edge, relative to the tile.
    pub x: i32,
    /// Top edge, relative to the tile.
    pub y: i32,
    /// Box width.
    pub w: u32,
    /// Box height.
    pub h: u32,
}

/// Looping animation drawn in place of one tile.
#[derive(Debug, Clone)]
pub struct TilesetAnimation {
    /// Sprite cell index (`column + row * ncols`).
    pub id: u32,
    /// Restarted each time it completes.
    pub animation: Animation,
}

/// Sprite sheet used to draw a map, plus per tile metadata.
///
/// `collisions` and `animations` must stay sorted by id, lookups are binary
/// searches. Loaders sort them once after parsing.
#[derive(Debug, Clone, Default)]
pub struct Tileset {
    /// Sheet of static tiles, set by the `image` directive.
    pub sprite: Option<Rc<Sprite>>,
    /// Sorted by id.
    pub collisions: Vec<TilesetCollision>,
    /// Sorted by id.
    pub animations: Vec<TilesetAnimation>,
}

impl Tileset {
    /// True once the sprite sheet is usable.
    pub fn ok(&self) -> bool {
        self.sprite.as_ref().is_some_and(|s| s.ok())
    }

    /// Tile width in pixels, 0 without a sprite.
    pub fn tile_width(&self) -> u32 {
        self.sprite.as_ref().map_or(0, |s| s.cellw)
    }

    /// Tile height in pixels, 0 without a sprite.
    pub fn tile_height(&self) -> u32 {
        self.sprite.as_ref().map_or(0, |s| s.cellh)
    }

    /// Linear tile id of a sprite cell.
    pub fn tile_id(&self, row: u32, col: u32) -> u32 {
        let ncols = self.sprite.as_ref().map_or(0, |s| s.ncols);
        col + row * ncols
    }

    /// Collision box of tile `id`, if any.
    pub fn collision(&self, id: u32) -> Option<&TilesetCollision> {
        self.collisions
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.collisions[i])
    }

    /// Animation replacing tile `id`, if any.
    pub fn animation(&self, id: u32) -> Option<&TilesetAnimation> {
        self.animations
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| &self.animations[i])
    }

    /// Restore the sorted invariant after bulk insertion.
    pub fn sort(&mut self) {
        self.collisions.sort_unstable_by_key(|c| c.id);
        self.animations.sort_unstable_by_key(|a| a.id);
    }

    /// Restart every animation from its first frame.
    pub fn start(&mut self) {
        for ta in &mut self.animations {
            ta.animation.start();
        }
    }

    /// Advance animations, looping those that complete.
    pub fn update(&mut self, ticks: u32) {
        for ta in &mut self.animations {
            if ta.animation.update(ticks) {
                ta.animation.start();
            }
        }
    }

    /// Draw the tile at sprite cell `(row, col)`, or its animation if any.
    ///
    /// # Panics
    ///
    /// Without a sprite. In debug builds, also when `row`/`col` are outside
    /// the sprite grid.
    pub fn draw(&self, painter: &mut dyn Painter, row: u32, col: u32, x: i32, y: i32) {
        let sprite = self.sprite.as_ref().expect("tileset without sprite");

        debug_assert!(row < sprite.nrows && col < sprite.ncols);

        match self.animation(self.tile_id(row, col)) {
            Some(ta) => ta.animation.draw(painter, x, y),
            None => sprite.draw(painter, row, col, x, y),
        }
    }
}
