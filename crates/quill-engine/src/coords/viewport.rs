use glam::Vec2;

use super::Rect;

/// Size of the surface currently being drawn to, in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height; `1.0` for degenerate viewports so projections stay finite.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.is_valid() {
            self.width / self.height
        } else {
            1.0
        }
    }

    #[inline]
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Maps a pixel position to clip space (+Y up).
    #[inline]
    pub fn pixel_to_clip(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.width * 2.0 - 1.0, 1.0 - p.y / self.height * 2.0)
    }

    /// Maps a clip-space position back to pixels.
    #[inline]
    pub fn clip_to_pixel(self, clip: Vec2) -> Vec2 {
        Vec2::new(
            (clip.x + 1.0) * 0.5 * self.width,
            (1.0 - clip.y) * 0.5 * self.height,
        )
    }
}
