/// Visible world sub-rectangle, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// World x of the left edge.
    pub x: i32,
    /// World y of the top edge.
    pub y: i32,
    /// Width, the output width.
    pub w: u32,
    /// Height, the output height.
    pub h: u32,
}

/// Inner area of the view the player may move in before the camera scrolls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margin {
    /// World x of the left edge.
    pub x: i32,
    /// World y of the top edge.
    pub y: i32,
    /// Width, minus the player width.
    pub w: u32,
    /// Height, minus the player height.
    pub h: u32,
}

/// Range of map cells intersecting a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    /// Column of the first visible cell.
    pub start_col: u32,
    /// Row of the first visible cell.
    pub start_row: u32,
    /// Screen position of the first cell, 0 or negative.
    pub start_x: i32,
    /// See `start_x`.
    pub start_y: i32,
    /// Cells to draw per row, one more than fits on each side.
    pub ncols: u32,
    /// Cells to draw per column.
    pub nrows: u32,
    /// Cell width, at least 1.
    pub tile_w: u32,
    /// Cell height, at least 1.
    pub tile_h: u32,
}

impl Viewport {
    /// Put `(px, py)` at the center, staying inside the world.
    pub fn center_on(&mut self, px: i32, py: i32, world_w: u32, world_h: u32) {
        self.x = px - (self.w / 2) as i32;
        self.y = py - (self.h / 2) as i32;
        self.clamp(world_w, world_h);
    }

    /// Keep `x` in `[0, world_w - w]` and `y` in `[0, world_h - h]`.
    pub fn clamp(&mut self, world_w: u32, world_h: u32) {
        self.x = clamp_axis(self.x, self.w, world_w);
        self.y = clamp_axis(self.y, self.h, world_h);
    }

    /// Cells of a `tile_w * tile_h` grid overlapping the view.
    pub fn visible_tiles(&self, tile_w: u32, tile_h: u32) -> TileWindow {
        let (tw, th) = (tile_w.max(1) as i32, tile_h.max(1) as i32);

        TileWindow {
            start_col: self.x.max(0).div_euclid(tw) as u32,
            start_row: self.y.max(0).div_euclid(th) as u32,
            start_x: -self.x.max(0).rem_euclid(tw),
            start_y: -self.y.max(0).rem_euclid(th),
            ncols: self.w / tw as u32 + 2,
            nrows: self.h / th as u32 + 2,
            tile_w: tw as u32,
            tile_h: th as u32,
        }
    }
}

impl Margin {
    /// Shrink the view by `mw`/`mh` on each side and by the player size.
    pub fn inside(view: &Viewport, mw: u32, mh: u32, player_w: u32, player_h: u32) -> Self {
        Margin {
            x: view.x + mw as i32,
            y: view.y + mh as i32,
            w: view.w.saturating_sub(mw * 2).saturating_sub(player_w),
            h: view.h.saturating_sub(mh * 2).saturating_sub(player_h),
        }
    }
}

impl TileWindow {
    /// `(row, col, screen_x, screen_y)` of every visible cell inside a
    /// `columns * rows` map.
    pub fn cells(&self, columns: u32, rows: u32) -> impl Iterator<Item = (u32, u32, i32, i32)> + '_ {
        (0..self.nrows).flat_map(move |r| {
            (0..self.ncols).filter_map(move |c| {
                let (row, col) = (self.start_row + r, self.start_col + c);

                if row >= rows || col >= columns {
                    return None;
                }

                Some((
                    row,
                    col,
                    self.start_x + (c * self.tile_w) as i32,
                    self.start_y + (r * self.tile_h) as i32,
                ))
            })
        })
    }
}

pub(crate) fn clamp_axis(pos: i32, view: u32, world: u32) -> i32 {
    let max = (world as i64 - view as i64).clamp(0, i32::MAX as i64) as i32;
    pos.clamp(0, max)
}
