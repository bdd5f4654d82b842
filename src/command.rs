use macroquad::prelude::{Color, Rect, Vec2};

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Part of a texture.
    Texture {
        /// Texture name.
        texture: String,
        /// Source rectangle in the texture.
        src: Rect,
        /// Destination on screen.
        dst: Rect,
    },
    /// Filled rectangle.
    Rect {
        /// Screen area.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// One pixel wide line.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Line color.
        color: Color,
    },
}

impl DrawCommand {
    /// Name of the drawn texture, `None` for shapes.
    pub fn texture_name(&self) -> Option<&str> {
        match self {
            DrawCommand::Texture { texture, .. } => Some(texture),
            _ => None,
        }
    }
}
