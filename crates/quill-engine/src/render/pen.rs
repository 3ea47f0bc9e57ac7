//! Outline materials, drawn as a wireframe pass after the fill.

use glam::Vec3;

use crate::paint::Color;

use super::effect::{BasicEffect, CullMode, RasterizerState, SamplerState};
use super::resources::RenderResources;

/// Configures the wireframe parameters of a draw.
pub trait Pen {
    fn is_prepared(&self) -> bool;

    /// Called lazily before the first draw using this pen.
    fn prepare(&mut self, resources: &RenderResources);

    fn configure(&self, effect: &mut BasicEffect);
}

/// Wireframe settings shared by the pens: an optional cull override, resolved on prepare.
#[derive(Debug, Copy, Clone, Default)]
struct Outline {
    cull: Option<CullMode>,
    rasterizer: Option<RasterizerState>,
    prepared: bool,
}

impl Outline {
    fn new(cull: Option<CullMode>) -> Self {
        Self {
            cull,
            ..Self::default()
        }
    }

    fn prepare(&mut self) {
        self.rasterizer = self.cull.map(RasterizerState::wireframe);
        self.prepared = true;
    }

    fn configure(&self, effect: &mut BasicEffect) {
        if let Some(rasterizer) = self.rasterizer {
            effect.rasterizer = Some(rasterizer);
        }
        effect.sampler = SamplerState::LINEAR_MIP_POINT;
    }
}

/// Wireframe in a single color.
#[derive(Debug, Clone)]
pub struct SolidColorPen {
    color: Color,
    diffuse: Vec3,
    outline: Outline,
}

impl SolidColorPen {
    /// `cull` overrides the render context's cull mode for the wireframe pass.
    pub fn new(color: Color, cull: Option<CullMode>) -> Self {
        Self {
            color,
            diffuse: color.into(),
            outline: Outline::new(cull),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.diffuse = color.into();
    }
}

impl Pen for SolidColorPen {
    fn is_prepared(&self) -> bool {
        self.outline.prepared
    }

    fn prepare(&mut self, _resources: &RenderResources) {
        self.outline.prepare();
    }

    fn configure(&self, effect: &mut BasicEffect) {
        effect.diffuse_color = self.diffuse;
        effect.vertex_color_enabled = false;
        effect.texture_enabled = false;
        self.outline.configure(effect);
    }
}

/// Wireframe using the vertex colors.
#[derive(Debug, Clone, Default)]
pub struct VertexColorPen {
    outline: Outline,
}

impl VertexColorPen {
    pub fn new(cull: Option<CullMode>) -> Self {
        Self {
            outline: Outline::new(cull),
        }
    }
}

impl Pen for VertexColorPen {
    fn is_prepared(&self) -> bool {
        self.outline.prepared
    }

    fn prepare(&mut self, _resources: &RenderResources) {
        self.outline.prepare();
    }

    fn configure(&self, effect: &mut BasicEffect) {
        effect.vertex_color_enabled = true;
        effect.texture_enabled = false;
        self.outline.configure(effect);
    }
}
