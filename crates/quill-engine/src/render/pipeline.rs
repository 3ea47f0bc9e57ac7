use std::collections::HashMap;

use super::effect::{BlendMode, DepthState, EffectUniform, FillMode, RasterizerState};
use super::mesh::{PrimitiveType, VertexKind};

/// Depth format of every render target and of the back buffer's depth attachment.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Everything that selects a distinct render pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PipelineKey {
    pub vertex_kind: VertexKind,
    pub primitive_type: PrimitiveType,
    pub rasterizer: RasterizerState,
    pub depth: DepthState,
    pub blend: BlendMode,
    pub color_format: wgpu::TextureFormat,
}

impl PipelineKey {
    /// Depth bias only applies to triangle topologies; lines ignore it.
    pub(crate) fn normalized(mut self) -> Self {
        if !self.primitive_type.is_triangles() {
            self.rasterizer.depth_bias = 0;
        }
        self
    }

    fn primitive_state(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: self.primitive_type.topology(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: self.rasterizer.cull_mode.face(),
            unclipped_depth: false,
            polygon_mode: match self.rasterizer.fill_mode {
                FillMode::Solid => wgpu::PolygonMode::Fill,
                FillMode::WireFrame => wgpu::PolygonMode::Line,
            },
            conservative: false,
        }
    }

    fn depth_stencil_state(&self) -> wgpu::DepthStencilState {
        let bias = self.rasterizer.depth_bias;
        wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: self.depth.writes(),
            depth_compare: self.depth.compare(),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState {
                constant: bias,
                slope_scale: bias.signum() as f32,
                clamp: 0.0,
            },
        }
    }
}

/// Shader, layouts and a lazily filled cache of render pipelines.
pub(crate) struct PipelineCache {
    shader: wgpu::ShaderModule,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl PipelineCache {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quill basic effect shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/basic_effect.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quill effect uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<EffectUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quill effect texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quill effect pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        Self {
            shader,
            uniform_layout,
            texture_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
        }
    }

    pub(crate) fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }

    pub(crate) fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    /// Returns the pipeline for `key`, building it on first use.
    pub(crate) fn get(&mut self, device: &wgpu::Device, key: PipelineKey) -> &wgpu::RenderPipeline {
        let key = key.normalized();
        let (shader, layout) = (&self.shader, &self.pipeline_layout);

        self.pipelines.entry(key).or_insert_with(|| {
            log::debug!("building pipeline for {key:?}");
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("quill effect pipeline"),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some(key.vertex_kind.entry_point()),
                    compilation_options: Default::default(),
                    buffers: &[key.vertex_kind.layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: key.color_format,
                        blend: key.blend.state(),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: key.primitive_state(),
                depth_stencil: Some(key.depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::effect::CullMode;

    fn key(primitive_type: PrimitiveType, rasterizer: RasterizerState) -> PipelineKey {
        PipelineKey {
            vertex_kind: VertexKind::PositionColor,
            primitive_type,
            rasterizer,
            depth: DepthState::Default,
            blend: BlendMode::AlphaBlend,
            color_format: wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    #[test]
    fn lines_drop_depth_bias() {
        let k = key(PrimitiveType::LineList, RasterizerState::wireframe(CullMode::None)).normalized();
        assert_eq!(k.rasterizer.depth_bias, 0);
        assert_eq!(k.depth_stencil_state().bias.constant, 0);
    }

    #[test]
    fn triangles_keep_depth_bias() {
        let k = key(PrimitiveType::TriangleList, RasterizerState::wireframe(CullMode::None))
            .normalized();
        let bias = k.depth_stencil_state().bias;
        assert_eq!(bias.constant, -1);
        assert_eq!(bias.slope_scale, -1.0);
    }

    #[test]
    fn clockwise_is_front() {
        let k = key(PrimitiveType::TriangleList, RasterizerState::solid(CullMode::default()));
        let p = k.primitive_state();
        assert_eq!(p.front_face, wgpu::FrontFace::Cw);
        assert_eq!(p.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(p.polygon_mode, wgpu::PolygonMode::Fill);
    }

    #[test]
    fn normalized_keys_collapse_line_variants() {
        let a = key(PrimitiveType::LineStrip, RasterizerState::wireframe(CullMode::None)).normalized();
        let mut r = RasterizerState::wireframe(CullMode::None);
        r.depth_bias = 0;
        let b = key(PrimitiveType::LineStrip, r).normalized();
        assert_eq!(a, b);
    }
}
