use crate::action::ActionStack;
use crate::animation::WalkSprite;
use crate::collision::{Direction, MapBlock, Sweep};
use crate::config::{color, MapConfig};
use crate::event::{Event, Key};
use crate::layer::{LayerType, MapLayer};
use crate::painter::Painter;
use crate::sprite::Sprite;
use crate::tileset::Tileset;
use crate::view::{clamp_axis, Margin, Viewport};
use macroquad::prelude::{vec2, Rect};
use std::rc::Rc;

/// Movement bits of [`Player::movement`], several may be set at once.
pub const MOVING_UP: u8 = 1 << 0;
/// See [`MOVING_UP`].
pub const MOVING_RIGHT: u8 = 1 << 1;
/// See [`MOVING_UP`].
pub const MOVING_DOWN: u8 = 1 << 2;
/// See [`MOVING_UP`].
pub const MOVING_LEFT: u8 = 1 << 3;

// Movement mask to walking sprite orientation. `None` keeps the previous
// orientation: nothing pressed, or both keys of an axis (up+down,
// left+right, all four).
const FACINGS: [Option<u32>; 16] = [
    None,    // 0x0
    Some(0), // 0x1 up
    Some(2), // 0x2 right
    Some(1), // 0x3 up right
    Some(4), // 0x4 down
    None,    // 0x5 up down
    Some(3), // 0x6 down right
    Some(0), // 0x7
    Some(6), // 0x8 left
    Some(7), // 0x9 up left
    None,    // 0xA left right
    Some(0), // 0xB
    Some(5), // 0xC down left
    Some(0), // 0xD
    Some(0), // 0xE
    None,    // 0xF
];

/// Orientation for a movement mask, `None` when it must stay unchanged.
pub fn facing_for(movement: u8) -> Option<u32> {
    FACINGS[(movement & 0xF) as usize]
}

fn movement_bit(key: Key) -> Option<u8> {
    match key {
        Key::Up => Some(MOVING_UP),
        Key::Right => Some(MOVING_RIGHT),
        Key::Down => Some(MOVING_DOWN),
        Key::Left => Some(MOVING_LEFT),
        _ => None,
    }
}

bitflags::bitflags! {
    /// Debug overlays, both toggled by releasing Tab.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct MapFlags: u8 {
        /// Outline every drawn cell.
        const SHOW_GRID = 1 << 0;
        /// Fill tile collision boxes, blocks and the player footprint.
        const SHOW_COLLIDE = 1 << 2;
    }
}

/// Lifecycle of a [`Map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// No tileset or mandatory layer yet.
    Unloaded,
    /// Loaded, the player stands still.
    Idle,
    /// At least one direction key is held.
    Moving,
    /// [`Map::finish`] was called.
    Finished,
}

/// The walking character, its position is the top left of its footprint.
#[derive(Debug, Clone, Default)]
pub struct Player {
    /// Walking sprite, see [`WalkSprite`] for the expected layout.
    pub sprite: Option<Rc<Sprite>>,
    /// World x.
    pub x: i32,
    /// World y.
    pub y: i32,
    /// Walking sprite row, 0 (up) to 7 (up-left) clockwise.
    pub facing: u32,
    /// `MOVING_*` bits.
    pub movement: u8,
    walk: Option<WalkSprite>,
}

impl Player {
    /// Size of the collision footprint.
    pub fn size(&self) -> (u32, u32) {
        self.sprite.as_ref().map_or((0, 0), |s| (s.cellw, s.cellh))
    }

    /// Collision footprint in world pixels.
    pub fn bounds(&self) -> MapBlock {
        let (w, h) = self.size();
        MapBlock::new(self.x, self.y, w, h)
    }

    /// Current walking frame column.
    pub fn walk_frame(&self) -> u32 {
        self.walk.as_ref().map_or(0, |w| w.index())
    }
}

/// Game map: tile layers, a player walking on them and a scrolling camera.
#[derive(Debug, Default)]
pub struct Map {
    /// Width in tiles.
    pub columns: u32,
    /// Height in tiles.
    pub rows: u32,
    /// Tiles drawn by every layer.
    pub tileset: Tileset,
    /// Tileset identifier as written in the map file.
    pub tileset_ident: String,
    /// Indexed by [`LayerType`], see [`layer`](Self::layer).
    pub layers: [MapLayer; 3],
    /// Solid objects of the actions layer.
    pub blocks: Vec<MapBlock>,
    /// The walking character.
    pub player: Player,
    /// Camera, in world pixels.
    pub view: Viewport,
    /// Area the player moves in before the camera scrolls.
    pub margin: Margin,
    /// Debug overlays.
    pub flags: MapFlags,
    /// Movement and overlay tunables.
    pub config: MapConfig,
    /// Actions running while the player keeps moving.
    pub actions: ActionStack,
    /// Actions freezing the player until they all complete.
    pub sequence: ActionStack,
    finished: bool,
}

impl Map {
    /// Map with empty background and foreground layers.
    ///
    /// Panics like [`vec!`] if the two layers cannot be allocated.
    pub fn new(columns: u32, rows: u32, tileset: Tileset) -> Self {
        let n = (columns as usize).saturating_mul(rows as usize);
        let mut map = Map {
            columns,
            rows,
            tileset,
            ..Default::default()
        };

        map.layers[LayerType::Background.index()].tiles = vec![0; n];
        map.layers[LayerType::Foreground.index()].tiles = vec![0; n];
        map
    }

    /// Layer of type `ty`.
    pub fn layer(&self, ty: LayerType) -> &MapLayer {
        &self.layers[ty.index()]
    }

    /// Mutable layer of type `ty`.
    pub fn layer_mut(&mut self, ty: LayerType) -> &mut MapLayer {
        &mut self.layers[ty.index()]
    }

    /// Map width in pixels.
    pub fn width(&self) -> u32 {
        self.columns.saturating_mul(self.tileset.tile_width())
    }

    /// Map height in pixels.
    pub fn height(&self) -> u32 {
        self.rows.saturating_mul(self.tileset.tile_height())
    }

    /// True with a usable tileset and both mandatory layers.
    pub fn is_loaded(&self) -> bool {
        self.tileset.ok()
            && self.layer(LayerType::Background).is_loaded()
            && self.layer(LayerType::Foreground).is_loaded()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MapState {
        if self.finished {
            MapState::Finished
        } else if !self.is_loaded() {
            MapState::Unloaded
        } else if self.player.movement != 0 {
            MapState::Moving
        } else {
            MapState::Idle
        }
    }

    /// Prepare the map for a `view_w * view_h` output: center the camera on
    /// the player and start the animations.
    pub fn init(&mut self, view_w: u32, view_h: u32) {
        let (pw, ph) = self.player.size();

        self.view.w = view_w;
        self.view.h = view_h;
        self.view
            .center_on(self.player.x, self.player.y, self.width(), self.height());
        self.margin = Margin::inside(
            &self.view,
            self.config.margin_width,
            self.config.margin_height,
            pw,
            ph,
        );

        self.tileset.start();
        self.player.walk = self
            .player
            .sprite
            .clone()
            .map(|s| WalkSprite::new(s, self.config.walk_delay));

        tracing::debug!(
            view_x = self.view.x,
            view_y = self.view.y,
            view_w,
            view_h,
            "map initialized"
        );
    }

    /// Update the movement mask and facing on arrow keys, toggle the
    /// overlays when Tab is released, then forward `event` to the actions.
    pub fn handle(&mut self, event: &Event) {
        match *event {
            Event::KeyDown(key) => {
                if let Some(bit) = movement_bit(key) {
                    self.player.movement |= bit;

                    if let Some(facing) = facing_for(self.player.movement) {
                        self.player.facing = facing;
                    }
                }
            }
            Event::KeyUp(Key::Tab) => {
                self.flags.toggle(MapFlags::SHOW_GRID | MapFlags::SHOW_COLLIDE);
                tracing::trace!(flags = ?self.flags, "debug overlays toggled");
            }
            Event::KeyUp(key) => {
                if let Some(bit) = movement_bit(key) {
                    self.player.movement &= !bit;
                }
            }
            Event::Quit => {}
        }

        self.actions.handle(event);
        self.sequence.handle(event);
    }

    /// Advance actions and animations by `ticks` ms, then move the player
    /// unless a sequential action is running.
    pub fn update(&mut self, ticks: u32) {
        self.actions.update(ticks);
        self.sequence.update(ticks);
        self.tileset.update(ticks);

        if self.sequence.completed() {
            self.move_player(ticks);
        }
    }

    fn move_player(&mut self, ticks: u32) {
        if self.player.movement == 0 {
            return;
        }

        // Diagonals are not normalized, each axis moves by the full delta.
        let delta = (self.config.speed as u64 * ticks as u64 / 1000) as i32;

        self.margin.x = self.view.x + self.config.margin_width as i32;
        self.margin.y = self.view.y + self.config.margin_height as i32;

        let movement = self.player.movement;
        let mut dx = 0;
        let mut dy = 0;

        if movement & MOVING_UP != 0 {
            dy = -1;
        }
        if movement & MOVING_DOWN != 0 {
            dy = 1;
        }
        if movement & MOVING_LEFT != 0 {
            dx = -1;
        }
        if movement & MOVING_RIGHT != 0 {
            dx = 1;
        }

        if dx != 0 {
            self.move_x(dx * delta);
        }
        if dy != 0 {
            self.move_y(dy * delta);
        }

        if let Some(walk) = &mut self.player.walk {
            walk.update(ticks);
        }
    }

    fn sweep(&self) -> Sweep<'_> {
        Sweep {
            tileset: &self.tileset,
            layers: [
                self.layer(LayerType::Foreground),
                self.layer(LayerType::Background),
            ],
            blocks: &self.blocks,
            columns: self.columns,
            rows: self.rows,
            player: self.player.bounds(),
        }
    }

    fn move_x(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }

        let delta = self.sweep().clamp(Direction::horizontal(delta), delta);

        self.player.x += delta;

        if (delta < 0 && self.player.x < self.margin.x)
            || (delta > 0 && self.player.x >= self.margin.x + self.margin.w as i32)
        {
            self.view.x += delta;
        }

        self.view.x = clamp_axis(self.view.x, self.view.w, self.width());
    }

    fn move_y(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }

        let delta = self.sweep().clamp(Direction::vertical(delta), delta);

        self.player.y += delta;

        if (delta < 0 && self.player.y < self.margin.y)
            || (delta > 0 && self.player.y >= self.margin.y + self.margin.h as i32)
        {
            self.view.y += delta;
        }

        self.view.y = clamp_axis(self.view.y, self.view.h, self.height());
    }

    /// Draw the visible part of the map, the player and the actions.
    pub fn draw(&self, painter: &mut dyn Painter) {
        self.draw_layer(painter, LayerType::Background);
        self.draw_layer(painter, LayerType::Foreground);

        if let Some(walk) = &self.player.walk {
            walk.draw(
                painter,
                self.player.facing,
                self.player.x - self.view.x,
                self.player.y - self.view.y,
            );
        }

        self.draw_layer(painter, LayerType::Above);
        self.draw_collide(painter);

        self.actions.draw(painter);
        self.sequence.draw(painter);
    }

    fn draw_layer(&self, painter: &mut dyn Painter, ty: LayerType) {
        let layer = self.layer(ty);
        let Some(sprite) = &self.tileset.sprite else {
            return;
        };

        if !layer.is_loaded() || sprite.ncols == 0 {
            return;
        }

        let show_collide = self.flags.contains(MapFlags::SHOW_COLLIDE);
        let show_grid = self.flags.contains(MapFlags::SHOW_GRID);
        let (tw, th) = (sprite.cellw as f32, sprite.cellh as f32);
        let window = self.view.visible_tiles(sprite.cellw, sprite.cellh);

        for (row, col, mx, my) in window.cells(self.columns, self.rows) {
            let Some(value) = layer.tile(self.columns, row, col) else {
                continue;
            };

            let id = value - 1;

            if id >= sprite.len() {
                tracing::trace!(layer = %ty, id, "tile outside of the tileset");
                continue;
            }

            self.tileset
                .draw(painter, id / sprite.ncols, id % sprite.ncols, mx, my);

            if show_collide {
                if let Some(td) = self.tileset.collision(id) {
                    painter.fill_rect(
                        Rect::new(
                            (mx + td.x) as f32,
                            (my + td.y) as f32,
                            td.w as f32,
                            td.h as f32,
                        ),
                        color(self.config.style.collision_color),
                    );
                }
            }

            if show_grid {
                let (x, y) = (mx as f32, my as f32);
                let grid = color(self.config.style.grid_color);

                painter.draw_line(vec2(x, y), vec2(x + tw, y), grid);
                painter.draw_line(vec2(x + tw - 1.0, y), vec2(x + tw - 1.0, y + th), grid);
            }
        }
    }

    fn draw_collide(&self, painter: &mut dyn Painter) {
        if !self.flags.contains(MapFlags::SHOW_COLLIDE) {
            return;
        }

        let (vx, vy) = (self.view.x, self.view.y);
        let p = self.player.bounds();

        painter.fill_rect(
            Rect::new((p.x - vx) as f32, (p.y - vy) as f32, p.w as f32, p.h as f32),
            color(self.config.style.player_color),
        );

        for b in &self.blocks {
            painter.fill_rect(
                Rect::new((b.x - vx) as f32, (b.y - vy) as f32, b.w as f32, b.h as f32),
                color(self.config.style.block_color),
            );
        }
    }

    /// End the pending actions and reset everything, the map can no longer
    /// be used.
    pub fn finish(&mut self) {
        self.actions.clear();
        self.sequence.clear();

        *self = Map {
            finished: true,
            ..Default::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::command::DrawCommand;
    use crate::painter::Recorder;
    use crate::sprite::Texture;
    use macroquad::prelude::WHITE;
    use std::cell::Cell;

    /// Completes after `left` ms, counts the events it sees.
    struct Wait {
        left: u32,
        events: Rc<Cell<u32>>,
        ended: Rc<Cell<bool>>,
    }

    impl Wait {
        fn boxed(left: u32) -> (Box<dyn Action>, Rc<Cell<u32>>, Rc<Cell<bool>>) {
            let events = Rc::new(Cell::new(0));
            let ended = Rc::new(Cell::new(false));
            let action = Box::new(Wait {
                left,
                events: events.clone(),
                ended: ended.clone(),
            });

            (action, events, ended)
        }
    }

    impl Action for Wait {
        fn handle(&mut self, _event: &Event) {
            self.events.set(self.events.get() + 1);
        }

        fn update(&mut self, ticks: u32) -> bool {
            self.left = self.left.saturating_sub(ticks);
            self.left == 0
        }

        fn draw(&self, painter: &mut dyn Painter) {
            painter.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), WHITE);
        }

        fn end(&mut self) {
            self.ended.set(true);
        }
    }

    fn test_map() -> Map {
        let sheet = Rc::new(Sprite::new(Rc::new(Texture::blank("sheet", 64, 64)), 16, 16));
        let mut map = Map::new(
            40,
            30,
            Tileset {
                sprite: Some(sheet),
                ..Default::default()
            },
        );
        map.player.sprite = Some(Rc::new(Sprite::new(
            Rc::new(Texture::blank("hero", 48, 128)),
            16,
            16,
        )));
        map
    }

    #[test]
    fn facing_follows_the_table() {
        for mask in 0u8..16 {
            let mut map = Map::default();
            map.player.facing = 99;
            map.player.movement = mask & !MOVING_UP;
            map.handle(&Event::KeyDown(Key::Up));

            let expected = facing_for(map.player.movement).unwrap_or(99);
            assert_eq!(map.player.facing, expected, "mask {:#x}", map.player.movement);
        }
    }

    #[test]
    fn opposite_keys_keep_facing() {
        let mut map = Map::default();
        map.handle(&Event::KeyDown(Key::Left));
        assert_eq!(map.player.facing, 6);
        map.handle(&Event::KeyDown(Key::Right));
        assert_eq!(map.player.facing, 6);
        map.handle(&Event::KeyDown(Key::Up));
        assert_eq!(map.player.movement, 0xB);
        assert_eq!(map.player.facing, 0);
        map.handle(&Event::KeyDown(Key::Down));
        assert_eq!(map.player.movement, 0xF);
        assert_eq!(map.player.facing, 0);
    }

    #[test]
    fn key_up_clears_bit_without_turning() {
        let mut map = Map::default();
        map.handle(&Event::KeyDown(Key::Up));
        map.handle(&Event::KeyDown(Key::Right));
        assert_eq!(map.player.facing, 1);

        map.handle(&Event::KeyUp(Key::Up));
        assert_eq!(map.player.movement, MOVING_RIGHT);
        assert_eq!(map.player.facing, 1);
    }

    #[test]
    fn tab_toggles_overlays_only() {
        let mut map = Map::default();
        map.handle(&Event::KeyUp(Key::Tab));
        assert!(map.flags.contains(MapFlags::SHOW_GRID | MapFlags::SHOW_COLLIDE));
        assert_eq!(map.player.movement, 0);
        map.handle(&Event::KeyUp(Key::Tab));
        assert!(map.flags.is_empty());
        assert_eq!((MapFlags::SHOW_GRID | MapFlags::SHOW_COLLIDE).bits(), 0b101);
    }

    #[test]
    fn state_transitions() {
        let mut map = Map::default();
        assert_eq!(map.state(), MapState::Unloaded);

        let mut map2 = test_map();
        assert_eq!(map2.state(), MapState::Idle);
        map2.handle(&Event::KeyDown(Key::Down));
        assert_eq!(map2.state(), MapState::Moving);
        map2.handle(&Event::KeyUp(Key::Down));
        assert_eq!(map2.state(), MapState::Idle);

        map.finish();
        map.finish();
        assert_eq!(map.state(), MapState::Finished);
    }

    #[test]
    fn diagonal_moves_full_delta_on_both_axes() {
        let mut map = test_map();
        map.player.x = 200;
        map.player.y = 200;
        map.init(320, 240);
        map.handle(&Event::KeyDown(Key::Down));
        map.handle(&Event::KeyDown(Key::Right));
        map.update(100);

        assert_eq!((map.player.x, map.player.y), (210, 210));
        assert_eq!(map.player.walk_frame(), 0);
        map.update(100);
        assert_eq!(map.player.walk_frame(), 1);
    }

    #[test]
    fn sequential_actions_freeze_the_player() {
        let mut map = test_map();
        let (wait, events, ended) = Wait::boxed(150);

        map.player.x = 200;
        map.player.y = 200;
        map.init(320, 240);
        map.sequence.add(wait);
        map.handle(&Event::KeyDown(Key::Down));
        assert_eq!(events.get(), 1);
        assert_eq!(map.state(), MapState::Moving);

        map.update(100);
        assert_eq!(map.player.y, 200);
        assert!(!ended.get());

        map.update(100);
        assert!(ended.get());
        assert!(map.sequence.completed());
        assert_eq!(map.player.y, 210);
    }

    #[test]
    fn parallel_actions_do_not_block_movement() {
        let mut map = test_map();
        let (wait, _, ended) = Wait::boxed(1000);

        map.player.x = 200;
        map.player.y = 200;
        map.init(320, 240);
        map.actions.add(wait);
        map.handle(&Event::KeyDown(Key::Right));
        map.update(100);

        assert_eq!(map.player.x, 210);
        assert_eq!(map.actions.len(), 1);

        let mut rec = Recorder::new();
        map.draw(&mut rec);
        assert!(matches!(rec.commands.last(), Some(DrawCommand::Rect { .. })));

        map.finish();
        assert!(ended.get());
    }

    #[test]
    fn world_size_saturates() {
        let mut map = test_map();
        map.columns = u32::MAX;
        map.rows = 1 << 30;

        assert_eq!(map.width(), u32::MAX);
        assert_eq!(map.height(), u32::MAX);
    }

    #[test]
    fn draw_order_is_background_foreground_player_above() {
        let mut map = test_map();
        map.columns = 1;
        map.rows = 1;
        map.layer_mut(LayerType::Background).tiles = vec![1];
        map.layer_mut(LayerType::Foreground).tiles = vec![2];
        map.layer_mut(LayerType::Above).tiles = vec![3];
        map.init(16, 16);

        let mut rec = Recorder::new();
        map.draw(&mut rec);

        let draws: Vec<_> = rec.textures().map(|(n, src, _)| (n.to_owned(), src.x)).collect();
        assert_eq!(
            draws,
            [
                ("sheet".to_owned(), 0.0),
                ("sheet".to_owned(), 16.0),
                ("hero".to_owned(), 0.0),
                ("sheet".to_owned(), 32.0),
            ]
        );
    }

    #[test]
    fn empty_cells_are_not_drawn() {
        let mut map = test_map();
        map.init(320, 240);

        let mut rec = Recorder::new();
        map.draw(&mut rec);

        assert_eq!(rec.textures().count(), 1);
    }
}
