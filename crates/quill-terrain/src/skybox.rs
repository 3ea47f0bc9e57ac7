use quill_engine::render::{
    BasicEffect, Brush, DepthState, RenderResources, Texture2D, TextureBrush,
};

/// Texture brush that ignores the depth buffer, so the sky stays behind everything
/// drawn after it no matter how small its box is.
#[derive(Debug, Clone)]
pub struct SkyboxBrush {
    inner: TextureBrush,
    depth: Option<DepthState>,
}

impl SkyboxBrush {
    pub fn new(texture: Texture2D) -> Self {
        Self {
            inner: TextureBrush::new(texture),
            depth: None,
        }
    }

    pub fn texture(&self) -> &Texture2D {
        self.inner.texture()
    }
}

impl Brush for SkyboxBrush {
    fn is_prepared(&self) -> bool {
        self.inner.is_prepared() && self.depth.is_some()
    }

    fn prepare(&mut self, resources: &RenderResources) {
        self.inner.prepare(resources);
        self.depth = Some(DepthState::None);
    }

    fn configure(&self, effect: &mut BasicEffect) {
        self.inner.configure(effect);
        if let Some(depth) = self.depth {
            effect.depth = depth;
        }
    }
}
