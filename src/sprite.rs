use crate::error::LoadError;
use crate::painter::Painter;
use macroquad::prelude::*;
use std::cell::OnceCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// Decoded image plus its GPU upload, created on the first real draw.
///
/// Keeping the pixels on the CPU side lets every loader and the whole
/// movement engine run without a graphics context.
pub struct Texture {
    name: String,
    image: Image,
    gpu: OnceCell<Texture2D>,
}

impl Texture {
    /// Decode an encoded image (PNG) from memory.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let image =
            Image::from_file_with_format(bytes, None).map_err(|e| LoadError::resource(name, e))?;

        Ok(Self::from_image(name, image))
    }

    /// Open an image file, `name` is the identifier used in the data files.
    pub fn open(name: &str, path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_bytes(name, &bytes)
    }

    /// Transparent texture of the given size.
    pub fn blank(name: &str, width: u16, height: u16) -> Self {
        Self::from_image(name, Image::gen_image_color(width, height, BLANK))
    }

    /// Wrap an already decoded image.
    pub fn from_image(name: &str, image: Image) -> Self {
        Texture {
            name: name.to_owned(),
            image,
            gpu: OnceCell::new(),
        }
    }

    /// Identifier given when the texture was opened.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width as u32
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height as u32
    }

    /// True without pixels.
    pub fn is_empty(&self) -> bool {
        self.image.width == 0 || self.image.height == 0
    }

    /// GPU texture, uploaded on first use. Requires a macroquad context.
    pub(crate) fn gpu(&self) -> &Texture2D {
        self.gpu.get_or_init(|| {
            let tex = Texture2D::from_image(&self.image);
            tex.set_filter(FilterMode::Nearest);
            tex
        })
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("width", &self.image.width)
            .field("height", &self.image.height)
            .finish()
    }
}

/// Grid of equally sized cells cut out of one texture.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Source image.
    pub texture: Rc<Texture>,
    /// Cell width.
    pub cellw: u32,
    /// Cell height.
    pub cellh: u32,
    /// Rows of whole cells.
    pub nrows: u32,
    /// Columns of whole cells.
    pub ncols: u32,
}

impl Sprite {
    /// Cut `texture` in `cellw * cellh` cells, partial cells are ignored.
    pub fn new(texture: Rc<Texture>, cellw: u32, cellh: u32) -> Self {
        let nrows = texture.height().checked_div(cellh).unwrap_or(0);
        let ncols = texture.width().checked_div(cellw).unwrap_or(0);

        Sprite {
            texture,
            cellw,
            cellh,
            nrows,
            ncols,
        }
    }

    /// True if cells can be drawn.
    pub fn ok(&self) -> bool {
        self.cellw != 0 && self.cellh != 0 && !self.texture.is_empty()
    }

    /// Number of cells in the sprite.
    pub fn len(&self) -> u32 {
        self.nrows * self.ncols
    }

    /// True without a single whole cell.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Source rectangle of a cell within the texture.
    pub fn cell(&self, row: u32, col: u32) -> Rect {
        Rect::new(
            (col * self.cellw) as f32,
            (row * self.cellh) as f32,
            self.cellw as f32,
            self.cellh as f32,
        )
    }

    /// Draw cell `(row, col)` with its top left corner at `(x, y)`.
    pub fn draw(&self, painter: &mut dyn Painter, row: u32, col: u32, x: i32, y: i32) {
        debug_assert!(self.ok());
        debug_assert!(row < self.nrows, "row {} out of {}", row, self.nrows);
        debug_assert!(col < self.ncols, "column {} out of {}", col, self.ncols);

        let dst = Rect::new(x as f32, y as f32, self.cellw as f32, self.cellh as f32);
        painter.draw_texture(&self.texture, self.cell(row, col), dst);
    }
}
