use crate::painter::Painter;
use crate::sprite::Sprite;
use std::rc::Rc;

/// Plays every cell of a sprite, row by row, one cell per `delay` ms.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Frames, played row by row.
    pub sprite: Rc<Sprite>,
    /// Milliseconds per frame.
    pub delay: u32,
    row: u32,
    column: u32,
    elapsed: u32,
}

impl Animation {
    /// Animation positioned on its first cell.
    pub fn new(sprite: Rc<Sprite>, delay: u32) -> Self {
        Animation {
            sprite,
            delay,
            row: 0,
            column: 0,
            elapsed: 0,
        }
    }

    /// Rewind to the first cell.
    pub fn start(&mut self) {
        self.row = 0;
        self.column = 0;
        self.elapsed = 0;
    }

    /// Current `(row, column)` cell.
    pub fn frame(&self) -> (u32, u32) {
        (self.row, self.column)
    }

    /// True once every cell has been shown.
    pub fn completed(&self) -> bool {
        self.row >= self.sprite.nrows
    }

    /// Advance the animation, returns true once the last cell has elapsed.
    pub fn update(&mut self, ticks: u32) -> bool {
        if self.completed() {
            return true;
        }

        self.elapsed += ticks;

        if self.elapsed < self.delay {
            return false;
        }

        self.elapsed = 0;
        self.column += 1;

        if self.column >= self.sprite.ncols {
            self.column = 0;
            self.row += 1;
        }

        self.completed()
    }

    /// Draw the current cell at `(x, y)`, nothing once completed.
    pub fn draw(&self, painter: &mut dyn Painter, x: i32, y: i32) {
        if !self.completed() {
            self.sprite.draw(painter, self.row, self.column, x, y);
        }
    }
}

/// Walking entity sprite.
///
/// The sprite has one row per orientation, clockwise from up:
///
/// ```text
/// 7   0   1
///   ↖ ↑ ↗
/// 6 ←   → 2
///   ↙ ↓ ↘
/// 5   4   3
/// ```
///
/// Columns are the walking frames, the first one being the idle pose.
#[derive(Debug, Clone)]
pub struct WalkSprite {
    /// Eight rows of walking frames.
    pub sprite: Rc<Sprite>,
    /// Milliseconds per frame.
    pub delay: u32,
    index: u32,
    elapsed: u32,
}

impl WalkSprite {
    /// Walking sprite in its idle pose.
    pub fn new(sprite: Rc<Sprite>, delay: u32) -> Self {
        WalkSprite {
            sprite,
            delay,
            index: 0,
            elapsed: 0,
        }
    }

    /// Current frame column.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Advance to the next column every `delay` ms, wrapping to the first.
    pub fn update(&mut self, ticks: u32) {
        self.elapsed += ticks;

        if self.elapsed >= self.delay {
            self.index += 1;

            if self.index >= self.sprite.ncols {
                self.index = 0;
            }

            self.elapsed = 0;
        }
    }

    /// Draw the current frame of row `orientation` at `(x, y)`.
    pub fn draw(&self, painter: &mut dyn Painter, orientation: u32, x: i32, y: i32) {
        self.sprite.draw(painter, orientation, self.index, x, y);
    }
}
