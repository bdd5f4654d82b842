use crate::sprite::{Sprite, Texture};
use std::rc::Rc;

/// Every texture and sprite handed out by a loader, released together.
///
/// Tilesets and maps only hold shared references, the pool keeps resources
/// alive until the loader is cleared.
#[derive(Debug, Default)]
pub struct ResourcePool {
    textures: Vec<Rc<Texture>>,
    sprites: Vec<Rc<Sprite>>,
}

impl ResourcePool {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `texture` until [`clear`](Self::clear), returns a shared handle.
    pub fn texture(&mut self, texture: Texture) -> Rc<Texture> {
        let texture = Rc::new(texture);
        self.textures.push(texture.clone());
        texture
    }

    /// Keep `sprite` until [`clear`](Self::clear), returns a shared handle.
    pub fn sprite(&mut self, sprite: Sprite) -> Rc<Sprite> {
        let sprite = Rc::new(sprite);
        self.sprites.push(sprite.clone());
        sprite
    }

    /// Number of textures held.
    pub fn textures(&self) -> usize {
        self.textures.len()
    }

    /// Number of sprites held.
    pub fn sprites(&self) -> usize {
        self.sprites.len()
    }

    /// True when nothing is held.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty() && self.sprites.is_empty()
    }

    /// Drop the pool references. Safe to call twice.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            tracing::trace!(
                textures = self.textures.len(),
                sprites = self.sprites.len(),
                "releasing loader resources"
            );
        }

        self.textures.clear();
        self.sprites.clear();
    }
}
