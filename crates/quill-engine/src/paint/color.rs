use glam::Vec3;

/// RGBA color with `f32` channels in `[0, 1]`, rgb premultiplied by alpha.
///
/// Opaque colors are identical in straight and premultiplied form, which is why the
/// named palette below can be declared with [`Color::from_premul`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

const fn opaque(r: u8, g: u8, b: u8) -> Color {
    Color::from_premul(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = opaque(0, 0, 0);
    pub const WHITE: Color = opaque(255, 255, 255);
    pub const RED: Color = opaque(255, 0, 0);
    pub const GREEN: Color = opaque(0, 128, 0);
    pub const BLUE: Color = opaque(0, 0, 255);
    pub const YELLOW: Color = opaque(255, 255, 0);
    pub const CORNFLOWER_BLUE: Color = opaque(100, 149, 237);
    pub const SNOW: Color = opaque(255, 250, 250);
    pub const SADDLE_BROWN: Color = opaque(139, 69, 19);
    pub const LAWN_GREEN: Color = opaque(124, 252, 0);
    pub const SANDY_BROWN: Color = opaque(244, 164, 96);

    /// Creates a premultiplied color from straight bytes (`0`–`255`).
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplies straight components, clamping each to `[0, 1]`.
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        let premul = |c: f32| c.clamp(0.0, 1.0) * a;
        Self::from_premul(premul(r), premul(g), premul(b), a)
    }

    /// Un-premultiplied `(r, g, b, a)`; fully transparent colors give all zeros.
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        match self.a {
            a if a > 0.0 => (self.r / a, self.g / a, self.b / a, a),
            _ => (0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Straight-alpha bytes, the layout used by vertex colors and texture uploads.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let (r, g, b, a) = self.to_straight();
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(r), q(g), q(b), q(a)]
    }

    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

/// Straight RGB in `[0, 1]`, the form the effect expects for its diffuse color.
impl From<Color> for Vec3 {
    #[inline]
    fn from(color: Color) -> Self {
        let (r, g, b, _) = color.to_straight();
        Vec3::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_are_opaque() {
        for c in [Color::BLACK, Color::WHITE, Color::CORNFLOWER_BLUE, Color::SNOW] {
            assert_eq!(c.a, 1.0);
        }
    }

    #[test]
    fn rgba8_round_trips_opaque_bytes() {
        let c = Color::from_rgba8(100, 149, 237, 255);
        assert_eq!(c.to_rgba8(), [100, 149, 237, 255]);
        assert_eq!(c, Color::CORNFLOWER_BLUE);
    }

    #[test]
    fn vec3_conversion_uses_straight_rgb() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        let v: Vec3 = c.into();
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!((v.y - 0.5).abs() < 1e-6);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn transparent_converts_to_zero() {
        assert_eq!(Color::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
        assert_eq!(Vec3::from(Color::TRANSPARENT), Vec3::ZERO);
    }
}
