//! Fill materials.

use glam::{Vec2, Vec3};

use crate::paint::Color;

use super::effect::{BasicEffect, BlendMode, SamplerState};
use super::resources::RenderResources;
use super::texture::Texture2D;

/// Configures the fill parameters of a draw.
///
/// The render context resets the effect's material state before every
/// [`Brush::configure`] call, so implementations only set what they use.
pub trait Brush {
    fn is_prepared(&self) -> bool {
        true
    }

    /// Creates device resources; called once before the first draw.
    fn prepare(&mut self, resources: &RenderResources) {
        let _ = resources;
    }

    fn configure(&self, effect: &mut BasicEffect);
}

/// Uniform color fill.
#[derive(Debug, Clone)]
pub struct SolidColorBrush {
    color: Color,
    diffuse: Vec3,
}

impl SolidColorBrush {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            diffuse: color.into(),
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

impl Brush for SolidColorBrush {
    fn configure(&self, effect: &mut BasicEffect) {
        effect.diffuse_color = self.diffuse;
        effect.vertex_color_enabled = false;
        effect.texture_enabled = false;
        // Smoother borders on solid geometry.
        effect.sampler = SamplerState::LINEAR_MIP_POINT;
    }
}

/// Texture tinted by a color and the vertex colors, alpha blended.
#[derive(Debug, Clone)]
pub struct TextureColorBrush {
    texture: Texture2D,
    color: Color,
    diffuse: Vec3,
}

impl TextureColorBrush {
    pub fn new(texture: Texture2D, color: Color) -> Self {
        Self {
            texture,
            color,
            diffuse: color.into(),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.diffuse = color.into();
    }

    pub fn texture(&self) -> &Texture2D {
        &self.texture
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }
}

impl Brush for TextureColorBrush {
    fn configure(&self, effect: &mut BasicEffect) {
        effect.diffuse_color = self.diffuse;
        effect.alpha = self.color.a;
        effect.texture = Some(self.texture.clone());
        effect.texture_enabled = true;
        effect.vertex_color_enabled = true;
        // Keeps textures from flickering while the camera moves.
        effect.sampler = SamplerState::LINEAR_MIP_POINT;
        effect.blend = BlendMode::AlphaBlend;
    }
}

/// Untinted texture fill.
#[derive(Debug, Clone)]
pub struct TextureBrush(TextureColorBrush);

impl TextureBrush {
    pub fn new(texture: Texture2D) -> Self {
        Self(TextureColorBrush::new(texture, Color::WHITE))
    }

    pub fn texture(&self) -> &Texture2D {
        self.0.texture()
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn size(&self) -> Vec2 {
        self.0.size()
    }
}

impl Brush for TextureBrush {
    fn configure(&self, effect: &mut BasicEffect) {
        self.0.configure(effect);
    }
}

/// Fill using only the vertex colors.
#[derive(Debug, Copy, Clone, Default)]
pub struct VertexColorBrush;

impl VertexColorBrush {
    /// Shared stateless instance.
    pub const DEFAULT: VertexColorBrush = VertexColorBrush;
}

impl Brush for VertexColorBrush {
    fn configure(&self, effect: &mut BasicEffect) {
        effect.vertex_color_enabled = true;
        effect.texture_enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_brush_sets_straight_diffuse() {
        let brush = SolidColorBrush::new(Color::from_straight(1.0, 0.5, 0.0, 0.5));
        let mut effect = BasicEffect::default();
        effect.vertex_color_enabled = true;
        brush.configure(&mut effect);

        assert!((effect.diffuse_color - Vec3::new(1.0, 0.5, 0.0)).length() < 1e-5);
        assert!(!effect.vertex_color_enabled);
        assert!(!effect.texture_enabled);
        assert_eq!(effect.sampler, SamplerState::LINEAR_MIP_POINT);
    }

    #[test]
    fn set_color_updates_diffuse() {
        let mut brush = SolidColorBrush::new(Color::BLACK);
        brush.set_color(Color::RED);
        let mut effect = BasicEffect::default();
        brush.configure(&mut effect);
        assert_eq!(effect.diffuse_color, Vec3::X);
        assert_eq!(brush.color(), Color::RED);
    }

    #[test]
    fn vertex_color_brush_only_enables_vertex_colors() {
        let mut effect = BasicEffect::default();
        effect.texture_enabled = true;
        VertexColorBrush::DEFAULT.configure(&mut effect);
        assert!(effect.vertex_color_enabled);
        assert!(!effect.texture_enabled);
        assert!(VertexColorBrush::DEFAULT.is_prepared());
    }
}
