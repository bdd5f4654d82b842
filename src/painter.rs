use crate::command::DrawCommand;
use crate::sprite::Texture;
use macroquad::prelude::*;

/// Drawing backend used by sprites, tilesets and maps.
pub trait Painter {
    /// Copy the `src` part of `texture` to `dst` on screen.
    fn draw_texture(&mut self, texture: &Texture, src: Rect, dst: Rect);
    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// One pixel wide line.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
}

/// Draws to the macroquad window.
#[derive(Debug, Default)]
pub struct ScreenPainter;

impl Painter for ScreenPainter {
    fn draw_texture(&mut self, texture: &Texture, src: Rect, dst: Rect) {
        draw_texture_ex(
            texture.gpu(),
            dst.x,
            dst.y,
            WHITE,
            DrawTextureParams {
                source: Some(src),
                dest_size: Some(vec2(dst.w, dst.h)),
                ..Default::default()
            },
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        draw_line(from.x, from.y, to.x, to.y, 1.0, color);
    }
}

/// Records every operation instead of drawing, for headless use.
#[derive(Debug, Default)]
pub struct Recorder {
    /// Every operation since creation or the last [`clear`](Self::clear).
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture draws only, in order.
    pub fn textures(&self) -> impl Iterator<Item = (&str, Rect, Rect)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Texture { texture, src, dst } => Some((texture.as_str(), *src, *dst)),
            _ => None,
        })
    }

    /// Forget the recorded operations.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Painter for Recorder {
    fn draw_texture(&mut self, texture: &Texture, src: Rect, dst: Rect) {
        self.commands.push(DrawCommand::Texture {
            texture: texture.name().to_owned(),
            src,
            dst,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }
}
