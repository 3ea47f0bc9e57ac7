use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::paint::Color;

use super::effect::SamplerState;
use super::error::RenderError;
use super::pipeline::DEPTH_FORMAT;
use super::resources::RenderResources;

/// Format of sampled textures and off-screen render targets.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Identity of a texture, stable across clones.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

impl TextureId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Sampled RGBA texture.
#[derive(Debug, Clone)]
pub struct Texture2D {
    id: TextureId,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl Texture2D {
    /// Creates a texture from row-major pixels (top row first).
    pub fn from_pixels(
        resources: &RenderResources,
        width: u32,
        height: u32,
        pixels: &[Color],
    ) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(RenderError::InvalidTextureData {
                width,
                height,
                pixels: pixels.len(),
            });
        }

        let texture = Self::allocate(
            resources,
            width,
            height,
            wgpu::TextureUsages::empty(),
            "quill texture",
        );
        let bytes: Vec<u8> = pixels.iter().flat_map(|c| c.to_rgba8()).collect();
        texture.upload(resources, &bytes);
        Ok(texture)
    }

    fn allocate(
        resources: &RenderResources,
        width: u32,
        height: u32,
        extra_usage: wgpu::TextureUsages,
        label: &str,
    ) -> Self {
        let texture = resources.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | extra_usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            id: TextureId::next(),
            texture,
            view,
            width,
            height,
        }
    }

    fn upload(&self, resources: &RenderResources, rgba: &[u8]) {
        resources.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            extent(self.width, self.height),
        );
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Off-screen color + depth target that can also be sampled as a texture.
#[derive(Debug, Clone)]
pub struct RenderTarget2D {
    color: Texture2D,
    depth_view: wgpu::TextureView,
}

impl RenderTarget2D {
    pub fn new(resources: &RenderResources, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let color = Texture2D::allocate(
            resources,
            width,
            height,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            "quill render target",
        );
        let depth_view = create_depth_view(&resources.device, width, height);
        Self { color, depth_view }
    }

    /// Overwrites every pixel with `color`, outside of any frame.
    pub fn fill(&self, resources: &RenderResources, color: Color) {
        let px = color.to_rgba8();
        let bytes: Vec<u8> = std::iter::repeat_n(px, (self.width() * self.height()) as usize)
            .flatten()
            .collect();
        self.color.upload(resources, &bytes);
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.color.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.color.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.color.height
    }

    /// The color attachment, for sampling in later draws.
    #[inline]
    pub fn texture(&self) -> &Texture2D {
        &self.color
    }

    #[inline]
    pub(crate) fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }
}

impl AsRef<Texture2D> for RenderTarget2D {
    fn as_ref(&self) -> &Texture2D {
        &self.color
    }
}

pub(crate) fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("quill depth"),
            size: extent(width.max(1), height.max(1)),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Map whose entries survive only while some frame keeps using them.
#[derive(Debug)]
pub(crate) struct FrameCache<K, V> {
    entries: HashMap<K, (V, bool)>,
}

impl<K: Eq + Hash, V> Default for FrameCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> FrameCache<K, V> {
    pub(crate) fn get_or_insert_with(&mut self, key: K, create: impl FnOnce() -> V) -> &V {
        let (value, used) = self.entries.entry(key).or_insert_with(|| (create(), false));
        *used = true;
        value
    }

    /// Drops entries untouched since the previous call. Returns how many were dropped.
    pub(crate) fn end_frame(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (_, used)| std::mem::take(used));
        before - self.entries.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Bind groups for (texture, sampler) pairs.
///
/// Draws without a texture bind a 1×1 white texture so the layout stays uniform.
/// A group unused for a whole frame is released along with its texture reference.
pub(crate) struct TextureBindings {
    white: Texture2D,
    samplers: HashMap<SamplerState, wgpu::Sampler>,
    groups: FrameCache<(TextureId, SamplerState), wgpu::BindGroup>,
}

impl TextureBindings {
    pub(crate) fn new(resources: &RenderResources) -> Result<Self, RenderError> {
        Ok(Self {
            white: Texture2D::from_pixels(resources, 1, 1, &[Color::WHITE])?,
            samplers: HashMap::new(),
            groups: FrameCache::default(),
        })
    }

    pub(crate) fn get(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: Option<&Texture2D>,
        sampler: SamplerState,
    ) -> &wgpu::BindGroup {
        let texture = texture.unwrap_or(&self.white);
        let key = (texture.id, sampler);

        let sampler = &*self
            .samplers
            .entry(sampler)
            .or_insert_with(|| device.create_sampler(&sampler.descriptor()));

        self.groups.get_or_insert_with(key, || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("quill effect texture bg"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        })
    }

    /// Releases bind groups not drawn with since the previous frame.
    pub(crate) fn end_frame(&mut self) -> usize {
        let evicted = self.groups.end_frame();
        log::trace!("{} texture bind groups cached", self.groups.len());
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── frame cache ───────────────────────────────────────────────────────

    #[test]
    fn entries_are_created_once() {
        let mut cache = FrameCache::default();
        assert_eq!(*cache.get_or_insert_with(1, || "a"), "a");
        assert_eq!(*cache.get_or_insert_with(1, || unreachable!()), "a");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entries_unused_for_a_frame_are_dropped() {
        let mut cache = FrameCache::default();
        cache.get_or_insert_with("kept", || 1);
        cache.get_or_insert_with("dropped", || 2);
        assert_eq!(cache.end_frame(), 0);

        cache.get_or_insert_with("kept", || unreachable!());
        assert_eq!(cache.end_frame(), 1);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.end_frame(), 1);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn dropped_entries_are_recreated() {
        let mut cache = FrameCache::default();
        cache.get_or_insert_with(7, || 1);
        cache.end_frame();
        cache.end_frame();
        assert_eq!(*cache.get_or_insert_with(7, || 2), 2);
    }

    #[test]
    fn dropped_values_release_what_they_hold() {
        let texture = std::sync::Arc::new(());
        let mut cache = FrameCache::default();
        cache.get_or_insert_with(0, || texture.clone());
        assert_eq!(std::sync::Arc::strong_count(&texture), 2);

        cache.end_frame();
        cache.end_frame();
        assert_eq!(std::sync::Arc::strong_count(&texture), 1);
    }
}
