//! Loaders reading resources from an in-memory [`AssetBundle`].

use super::map::{MapLoader, MapObject};
use super::pool::ResourcePool;
use super::tileset::{self, TilesetLoader};
use crate::error::LoadError;
use crate::sprite::{Sprite, Texture};
use crate::tileset::Tileset;
use std::collections::HashMap;
use std::rc::Rc;

/// Named byte buffers, names are `/` separated relative paths.
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    assets: HashMap<String, Vec<u8>>,
}

impl AssetBundle {
    /// Empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` as `name`, replacing any previous asset.
    pub fn insert(&mut self, name: &str, data: impl Into<Vec<u8>>) {
        self.assets.insert(normalize(name), data.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }

    /// Asset stored as `name`, after normalization.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.assets.get(&normalize(name)).map(Vec::as_slice)
    }

    fn fetch(&self, name: &str) -> Result<&[u8], LoadError> {
        self.get(name)
            .ok_or_else(|| LoadError::resource(name, "no such asset"))
    }
}

/// Lexically resolve `.` and `..` components.
pub(crate) fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." if parts.last().is_some_and(|p| *p != "..") => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }

    parts.join("/")
}

/// `ident` relative to the directory of `file`.
fn resolve(file: &str, ident: &str) -> String {
    match file.rsplit_once('/') {
        Some((dir, _)) => normalize(&format!("{}/{}", dir, ident)),
        None => normalize(ident),
    }
}

/// Tileset loader reading images from an [`AssetBundle`].
#[derive(Debug)]
pub struct MemoryTilesetLoader {
    bundle: Rc<AssetBundle>,
    name: String,
    pool: ResourcePool,
}

impl MemoryTilesetLoader {
    /// Loader for the tileset stored as `name` in `bundle`.
    pub fn new(bundle: Rc<AssetBundle>, name: &str) -> Self {
        MemoryTilesetLoader {
            bundle,
            name: normalize(name),
            pool: ResourcePool::new(),
        }
    }

    /// Parse the tileset this loader was created for.
    pub fn load(&mut self) -> Result<Tileset, LoadError> {
        let bundle = self.bundle.clone();
        let data = bundle.fetch(&self.name)?;

        tracing::debug!(name = %self.name, "opening tileset from memory");
        tileset::open_mem(self, data)
    }

    /// Resources handed out so far.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }
}

impl TilesetLoader for MemoryTilesetLoader {
    fn new_texture(&mut self, ident: &str) -> Result<Rc<Texture>, LoadError> {
        let data = self.bundle.fetch(&resolve(&self.name, ident))?;
        let texture = Texture::from_bytes(ident, data)?;

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

/// Map loader reading the tileset and images from an [`AssetBundle`] and
/// keeping every object.
#[derive(Debug)]
pub struct MemoryMapLoader {
    bundle: Rc<AssetBundle>,
    name: String,
    pool: ResourcePool,
    tileset_loader: Option<MemoryTilesetLoader>,
    objects: Vec<MapObject>,
}

impl MemoryMapLoader {
    /// Loader for the map stored as `name` in `bundle`.
    pub fn new(bundle: Rc<AssetBundle>, name: &str) -> Self {
        MemoryMapLoader {
            bundle,
            name: normalize(name),
            pool: ResourcePool::new(),
            tileset_loader: None,
            objects: Vec::new(),
        }
    }

    /// Parse the map this loader was created for.
    pub fn load(&mut self) -> Result<crate::map::Map, LoadError> {
        let bundle = self.bundle.clone();
        let data = bundle.fetch(&self.name)?;

        tracing::debug!(name = %self.name, "opening map from memory");
        super::map::open_mem(self, data)
    }

    /// Objects of the last parsed map.
    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    /// Map resources handed out so far.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Loader of the map tileset, once one was opened.
    pub fn tileset_loader(&self) -> Option<&MemoryTilesetLoader> {
        self.tileset_loader.as_ref()
    }
}

impl MapLoader for MemoryMapLoader {
    fn new_tileset(&mut self, ident: &str) -> Result<Tileset, LoadError> {
        let name = resolve(&self.name, ident);

        self.tileset_loader
            .insert(MemoryTilesetLoader::new(self.bundle.clone(), &name))
            .load()
    }

    fn new_texture(&mut self, ident: &str) -> Result<Rc<Texture>, LoadError> {
        let data = self.bundle.fetch(&resolve(&self.name, ident))?;
        let texture = Texture::from_bytes(ident, data)?;

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
