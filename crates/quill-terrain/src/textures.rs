use std::collections::HashMap;
use std::hash::Hash;

use quill_engine::paint::Color;
use quill_engine::render::{RenderError, RenderResources, Texture2D};

pub const SKYBOX_SIZE: u32 = 512;
pub const TERRAIN_SIZE: u32 = 1024;

/// Procedural textures of the terrain scene.
pub struct TextureGenerator<'a> {
    resources: &'a RenderResources,
}

impl<'a> TextureGenerator<'a> {
    pub fn new(resources: &'a RenderResources) -> Self {
        Self { resources }
    }

    /// Blue gradient, brightest at the top.
    pub fn create_skybox_texture(&self) -> Result<Texture2D, RenderError> {
        let pixels = skybox_pixels(SKYBOX_SIZE, SKYBOX_SIZE);
        Texture2D::from_pixels(self.resources, SKYBOX_SIZE, SKYBOX_SIZE, &pixels)
    }

    /// Horizontal bands by `v`: sand, grass, dirt, snow from top row to bottom row.
    ///
    /// Terrain vertices use `height / MAX_HEIGHT` as `v`, so high ground samples snow.
    pub fn create_terrain_texture(&self) -> Result<Texture2D, RenderError> {
        let pixels = terrain_pixels(TERRAIN_SIZE, TERRAIN_SIZE);
        Texture2D::from_pixels(self.resources, TERRAIN_SIZE, TERRAIN_SIZE, &pixels)
    }
}

pub(crate) fn skybox_pixels(width: u32, height: u32) -> Vec<Color> {
    (0..height)
        .flat_map(|y| {
            let rg = ((height - y) as f32 / height as f32 * 128.0 + 127.0) as u8;
            std::iter::repeat_n(Color::from_rgba8(rg, rg, 255, 255), width as usize)
        })
        .collect()
}

pub(crate) fn terrain_band(progress: f32) -> Color {
    if progress > 0.8 {
        Color::SNOW
    } else if progress > 0.5 {
        Color::SADDLE_BROWN
    } else if progress > 0.2 {
        Color::LAWN_GREEN
    } else {
        Color::SANDY_BROWN
    }
}

pub(crate) fn terrain_pixels(width: u32, height: u32) -> Vec<Color> {
    (0..height)
        .flat_map(|y| {
            let color = terrain_band(y as f32 / height as f32);
            std::iter::repeat_n(color, width as usize)
        })
        .collect()
}

/// Names of the shared scene textures.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Skybox,
    Terrain,
}

/// Get-or-create store so worlds rebuilt on the same device share their textures.
#[derive(Debug)]
pub struct TextureCache<K = TextureKey, T = Texture2D> {
    entries: HashMap<K, T>,
}

impl<K, T> Default for TextureCache<K, T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy + std::fmt::Debug, T: Clone> TextureCache<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, creating it with `create` on a miss.
    /// Failed creations are not cached.
    pub fn get_or_create<E>(
        &mut self,
        key: K,
        create: impl FnOnce(K) -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some(value) = self.entries.get(&key) {
            return Ok(value.clone());
        }

        log::debug!("generating texture {key:?}");
        let value = create(key)?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── generators ────────────────────────────────────────────────────────

    #[test]
    fn skybox_gradient_brightens_upwards() {
        let pixels = skybox_pixels(2, 4);
        assert_eq!(pixels.len(), 8);

        let top = pixels[0].to_rgba8();
        let bottom = pixels[6].to_rgba8();
        assert_eq!(top, [255, 255, 255, 255]);
        assert_eq!(bottom, [159, 159, 255, 255]);
        assert!(bottom[0] < top[0]);
    }

    #[test]
    fn terrain_bands_follow_thresholds() {
        assert_eq!(terrain_band(0.0), Color::SANDY_BROWN);
        assert_eq!(terrain_band(0.2), Color::SANDY_BROWN);
        assert_eq!(terrain_band(0.3), Color::LAWN_GREEN);
        assert_eq!(terrain_band(0.6), Color::SADDLE_BROWN);
        assert_eq!(terrain_band(0.81), Color::SNOW);
    }

    #[test]
    fn terrain_rows_are_uniform() {
        let pixels = terrain_pixels(3, 10);
        assert_eq!(pixels.len(), 30);
        assert!(pixels[27..].iter().all(|c| *c == Color::SNOW));
        assert!(pixels[..3].iter().all(|c| *c == Color::SANDY_BROWN));
    }

    // ── cache ─────────────────────────────────────────────────────────────

    #[test]
    fn cache_creates_once() {
        let mut cache: TextureCache<TextureKey, u32> = TextureCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let v = cache
                .get_or_create(TextureKey::Skybox, |_| {
                    calls += 1;
                    Ok::<_, ()>(7)
                })
                .unwrap();
            assert_eq!(v, 7);
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_creation_is_retried() {
        let mut cache: TextureCache<TextureKey, u32> = TextureCache::new();
        assert!(cache.get_or_create(TextureKey::Terrain, |_| Err("boom")).is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.get_or_create(TextureKey::Terrain, |_| Ok::<_, &str>(1)), Ok(1));
    }
}
