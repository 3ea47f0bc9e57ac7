//! Fixed-function style effect parameters.
//!
//! [`BasicEffect`] is a plain parameter block. Brushes and pens write into it;
//! the render context turns it into a pipeline key plus a uniform upload.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use super::texture::Texture2D;

/// Which triangle winding is discarded. Front faces are clockwise on screen.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    CullClockwiseFace,
    #[default]
    CullCounterClockwiseFace,
}

impl CullMode {
    pub(crate) fn face(self) -> Option<wgpu::Face> {
        match self {
            CullMode::None => None,
            CullMode::CullClockwiseFace => Some(wgpu::Face::Front),
            CullMode::CullCounterClockwiseFace => Some(wgpu::Face::Back),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum FillMode {
    #[default]
    Solid,
    WireFrame,
}

/// Rasterizer settings of a draw.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct RasterizerState {
    pub cull_mode: CullMode,
    pub fill_mode: FillMode,
    /// Constant depth bias in depth-buffer units; negative pulls towards the viewer.
    pub depth_bias: i32,
}

impl RasterizerState {
    pub const fn solid(cull_mode: CullMode) -> Self {
        Self {
            cull_mode,
            fill_mode: FillMode::Solid,
            depth_bias: 0,
        }
    }

    /// Line fill pulled slightly towards the viewer so outlines win over coplanar fills.
    pub const fn wireframe(cull_mode: CullMode) -> Self {
        Self {
            cull_mode,
            fill_mode: FillMode::WireFrame,
            depth_bias: -1,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Opaque,
    /// Premultiplied alpha.
    #[default]
    AlphaBlend,
    Additive,
    NonPremultiplied,
}

impl BlendMode {
    pub(crate) fn state(self) -> Option<wgpu::BlendState> {
        let component = |src, dst| wgpu::BlendComponent {
            src_factor: src,
            dst_factor: dst,
            operation: wgpu::BlendOperation::Add,
        };
        let both = |src, dst| wgpu::BlendState {
            color: component(src, dst),
            alpha: component(src, dst),
        };

        match self {
            BlendMode::Opaque => None,
            BlendMode::AlphaBlend => Some(both(
                wgpu::BlendFactor::One,
                wgpu::BlendFactor::OneMinusSrcAlpha,
            )),
            BlendMode::Additive => Some(both(wgpu::BlendFactor::SrcAlpha, wgpu::BlendFactor::One)),
            BlendMode::NonPremultiplied => Some(both(
                wgpu::BlendFactor::SrcAlpha,
                wgpu::BlendFactor::OneMinusSrcAlpha,
            )),
        }
    }
}

/// Depth buffer usage of a draw.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum DepthState {
    /// Test and write.
    #[default]
    Default,
    /// Neither test nor write.
    None,
    /// Test without writing.
    Read,
}

impl DepthState {
    pub(crate) fn compare(self) -> wgpu::CompareFunction {
        match self {
            DepthState::None => wgpu::CompareFunction::Always,
            DepthState::Default | DepthState::Read => wgpu::CompareFunction::LessEqual,
        }
    }

    pub(crate) fn writes(self) -> bool {
        matches!(self, DepthState::Default)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Point,
    Linear,
    /// Linear min/mag filtering, point mip selection.
    #[default]
    LinearMipPoint,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SamplerState {
    pub filter: TextureFilter,
}

impl SamplerState {
    pub const LINEAR_MIP_POINT: SamplerState = SamplerState {
        filter: TextureFilter::LinearMipPoint,
    };

    pub(crate) fn descriptor(self) -> wgpu::SamplerDescriptor<'static> {
        let (filter, mip) = match self.filter {
            TextureFilter::Point => (wgpu::FilterMode::Nearest, wgpu::MipmapFilterMode::Nearest),
            TextureFilter::Linear => (wgpu::FilterMode::Linear, wgpu::MipmapFilterMode::Linear),
            TextureFilter::LinearMipPoint => {
                (wgpu::FilterMode::Linear, wgpu::MipmapFilterMode::Nearest)
            }
        };
        wgpu::SamplerDescriptor {
            label: Some("quill sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: mip,
            ..Default::default()
        }
    }
}

/// Parameter block of the built-in shader.
#[derive(Debug, Clone)]
pub struct BasicEffect {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,

    /// Straight RGB in `[0, 1]`.
    pub diffuse_color: Vec3,
    pub alpha: f32,

    pub vertex_color_enabled: bool,
    pub texture_enabled: bool,
    pub texture: Option<Texture2D>,
    pub sampler: SamplerState,

    pub blend: BlendMode,
    pub depth: DepthState,

    /// Overrides the rasterizer chosen by the render context for this draw.
    pub rasterizer: Option<RasterizerState>,
}

impl Default for BasicEffect {
    fn default() -> Self {
        Self {
            world: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            diffuse_color: Vec3::ONE,
            alpha: 1.0,
            vertex_color_enabled: false,
            texture_enabled: false,
            texture: None,
            sampler: SamplerState::default(),
            blend: BlendMode::default(),
            depth: DepthState::default(),
            rasterizer: None,
        }
    }
}

impl BasicEffect {
    /// Resets material state, keeping the transforms.
    pub(crate) fn reset_material(&mut self, blend: BlendMode) {
        self.diffuse_color = Vec3::ONE;
        self.alpha = 1.0;
        self.vertex_color_enabled = false;
        self.texture_enabled = false;
        self.texture = None;
        self.sampler = SamplerState::default();
        self.blend = blend;
        self.depth = DepthState::default();
        self.rasterizer = None;
    }

    pub(crate) fn uniform(&self) -> EffectUniform {
        let wvp = self.projection * self.view * self.world;
        EffectUniform {
            world_view_projection: wvp.to_cols_array_2d(),
            diffuse: [
                self.diffuse_color.x,
                self.diffuse_color.y,
                self.diffuse_color.z,
                self.alpha,
            ],
            flags: [
                self.vertex_color_enabled as u32,
                (self.texture_enabled && self.texture.is_some()) as u32,
                0,
                0,
            ],
        }
    }
}

/// GPU layout of the effect parameters (std140 compatible).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct EffectUniform {
    pub world_view_projection: [[f32; 4]; 4],
    pub diffuse: [f32; 4],
    pub flags: [u32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── state mapping ─────────────────────────────────────────────────────

    #[test]
    fn counter_clockwise_culling_drops_back_faces() {
        assert_eq!(CullMode::default().face(), Some(wgpu::Face::Back));
        assert_eq!(CullMode::CullClockwiseFace.face(), Some(wgpu::Face::Front));
        assert_eq!(CullMode::None.face(), None);
    }

    #[test]
    fn alpha_blend_is_premultiplied() {
        let state = BlendMode::AlphaBlend.state().unwrap();
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert!(BlendMode::Opaque.state().is_none());
    }

    #[test]
    fn depth_none_never_rejects() {
        assert_eq!(DepthState::None.compare(), wgpu::CompareFunction::Always);
        assert!(!DepthState::None.writes());
        assert!(!DepthState::Read.writes());
        assert!(DepthState::Default.writes());
    }

    #[test]
    fn wireframe_is_biased_towards_viewer() {
        let r = RasterizerState::wireframe(CullMode::None);
        assert_eq!(r.fill_mode, FillMode::WireFrame);
        assert!(r.depth_bias < 0);
    }

    // ── uniform ───────────────────────────────────────────────────────────

    #[test]
    fn uniform_is_96_bytes() {
        assert_eq!(std::mem::size_of::<EffectUniform>(), 96);
    }

    #[test]
    fn uniform_combines_transforms_in_order() {
        let mut effect = BasicEffect::default();
        effect.world = Mat4::from_translation(Vec3::X);
        effect.view = Mat4::from_scale(Vec3::splat(2.0));
        let u = effect.uniform();
        // scale(translate(p)): the translation is scaled too.
        assert_eq!(u.world_view_projection[3][0], 2.0);
    }

    #[test]
    fn texture_flag_requires_a_texture() {
        let mut effect = BasicEffect::default();
        effect.texture_enabled = true;
        assert_eq!(effect.uniform().flags[1], 0);
    }

    #[test]
    fn reset_material_keeps_transforms() {
        let mut effect = BasicEffect::default();
        effect.world = Mat4::from_translation(Vec3::Y);
        effect.alpha = 0.25;
        effect.depth = DepthState::None;
        effect.reset_material(BlendMode::Opaque);
        assert_eq!(effect.world, Mat4::from_translation(Vec3::Y));
        assert_eq!(effect.alpha, 1.0);
        assert_eq!(effect.depth, DepthState::Default);
        assert_eq!(effect.blend, BlendMode::Opaque);
    }

    #[test]
    fn depth_and_rasterizer_overrides_last_one_pass() {
        let mut effect = BasicEffect::default();
        effect.reset_material(BlendMode::AlphaBlend);
        effect.depth = DepthState::None;
        effect.rasterizer = Some(RasterizerState::solid(CullMode::None));

        effect.reset_material(BlendMode::AlphaBlend);
        assert_eq!(effect.depth, DepthState::Default);
        assert_eq!(effect.rasterizer, None);
    }
}
