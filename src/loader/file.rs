//! Loaders reading resources from the filesystem, relative to the directory
//! of the file being parsed.

use super::map::{MapLoader, MapObject};
use super::pool::ResourcePool;
use super::tileset::{self, TilesetLoader};
use crate::error::LoadError;
use crate::sprite::{Sprite, Texture};
use crate::tileset::Tileset;
use std::path::{Path, PathBuf};
use std::rc::Rc;

fn directory_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Tileset loader opening images next to the tileset file.
#[derive(Debug)]
pub struct FileTilesetLoader {
    directory: PathBuf,
    pool: ResourcePool,
}

impl FileTilesetLoader {
    /// Loader for the tileset file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileTilesetLoader {
            directory: directory_of(path.as_ref()),
            pool: ResourcePool::new(),
        }
    }

    /// Directory images are resolved against.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Resources handed out so far.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }
}

impl TilesetLoader for FileTilesetLoader {
    fn new_texture(&mut self, ident: &str) -> Result<Rc<Texture>, LoadError> {
        let texture = Texture::open(ident, &self.directory.join(ident))?;
        Ok(self.pool.texture(texture))
    }

    fn new_sprite(
        &mut self,
        texture: Rc<Texture>,
        cellw: u32,
        cellh: u32,
    ) -> Result<Rc<Sprite>, LoadError> {
        Ok(self.pool.sprite(Sprite::new(texture, cellw, cellh)))
    }

    fn clear(&mut self) {
        self.pool.clear();
    }
}

/// Map loader opening the tileset through its own [`FileTilesetLoader`]
/// and keeping every object of the `layer|actions` section.
#[derive(Debug)]
pub struct FileMapLoader {
    directory: PathBuf,
    pool: ResourcePool,
    tileset_loader: Option<FileTilesetLoader>,
    objects: Vec<MapObject>,
}

impl FileMapLoader {
    /// Loader for the map file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileMapLoader {
            directory: directory_of(path.as_ref()),
            pool: ResourcePool::new(),
            tileset_loader: None,
            objects: Vec::new(),
        }
    }

    /// Objects of the last parsed map.
    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    /// Map resources handed out so far, the player sprite included.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Loader of the map tileset, once one was opened.
    pub fn tileset_loader(&self) -> Option<&FileTilesetLoader> {
        self.tileset_loader.as_ref()
    }
}

impl MapLoader for FileMapLoader {
    fn new_tileset(&mut self, ident: &str) -> Result<Tileset, LoadError> {
        let path = self.directory.join(ident);
        let loader = self
            .tileset_loader
            .insert(FileTilesetLoader::new(&path));

        tileset::open(loader, &path)
    }

    fn new_texture(&mut self, ident: &str) -> Result<Rc<Texture>, LoadError> {
        let texture = Texture::open(ident, &self.directory.join(ident))?;
        Ok(self.pool.texture(texture))
    }

    fn new_sprite(
        &mut self,
        texture: Rc<Texture>,
        cellw: u32,
        cellh: u32,
    ) -> Result<Rc<Sprite>, LoadError> {
        Ok(self.pool.sprite(Sprite::new(texture, cellw, cellh)))
    }

    fn new_object(&mut self, object: &MapObject) -> bool {
        self.objects.push(object.clone());
        true
    }

    fn clear(&mut self) {
        if let Some(mut loader) = self.tileset_loader.take() {
            loader.finish();
        }

        self.pool.clear();
        self.objects.clear();
    }
}
