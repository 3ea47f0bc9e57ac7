use glam::Mat4;

use crate::coords::Viewport;
use crate::paint::Color;

use super::brush::Brush;
use super::effect::{BasicEffect, BlendMode, CullMode, RasterizerState};
use super::error::RenderError;
use super::mesh::{Mesh, MeshCreator};
use super::pen::Pen;
use super::pipeline::{PipelineCache, PipelineKey};
use super::resources::RenderResources;
use super::state::{check_sampling, ContextState};
use super::texture::{create_depth_view, RenderTarget2D, TextureBindings, TEXTURE_FORMAT};
use super::uniforms::UniformArena;

/// Drawing surface exposed to scenes, brushes and helpers.
pub trait RenderContext {
    fn resources(&self) -> &RenderResources;

    fn mesh_creator(&self) -> &MeshCreator;

    /// Switches to alpha blending and clears color and depth of the current target.
    fn clear(&mut self, color: Color) -> Result<(), RenderError>;

    /// Begins a batch of draws.
    fn attach(&mut self) -> Result<(), RenderError>;

    fn detach(&mut self) -> Result<(), RenderError>;

    /// Draws `mesh` filled by `brush`, then outlined by `pen`. At least one must be given.
    fn draw_mesh(
        &mut self,
        mesh: &mut dyn Mesh,
        world: Mat4,
        view: Mat4,
        projection: Mat4,
        brush: Option<&mut dyn Brush>,
        pen: Option<&mut dyn Pen>,
    ) -> Result<(), RenderError>;

    /// The bound off-screen target; `None` means the back buffer.
    fn render_target(&self) -> Option<&RenderTarget2D>;

    fn render_target_count(&self) -> usize {
        self.render_target().map_or(0, |_| 1)
    }

    fn set_render_target(&mut self, target: Option<&RenderTarget2D>);

    /// Size of the current target.
    fn viewport(&self) -> Viewport;
}

/// Render context configuration.
#[derive(Debug, Copy, Clone, Default)]
pub struct ContextConfig {
    /// Cull mode of both the fill and the wireframe rasterizer.
    pub cull_mode: CullMode,
}

struct FrameState {
    encoder: wgpu::CommandEncoder,
    back_buffer: wgpu::TextureView,
}

struct DepthBuffer {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// [`RenderContext`] drawing through the built-in effect.
///
/// Frames are bracketed by [`DefaultRenderContext::begin_frame`] and
/// [`DefaultRenderContext::finish_frame`]; the returned command buffer must be
/// submitted before the next frame begins. Every clear and draw records its
/// own render pass.
pub struct DefaultRenderContext {
    resources: RenderResources,
    mesh_creator: MeshCreator,
    back_buffer_format: wgpu::TextureFormat,

    fill: RasterizerState,
    wireframe: RasterizerState,
    effect: BasicEffect,
    blend: BlendMode,
    state: ContextState,

    pipelines: PipelineCache,
    uniforms: UniformArena,
    textures: TextureBindings,

    frame: Option<FrameState>,
    back_buffer_size: (u32, u32),
    back_depth: Option<DepthBuffer>,
    target: Option<RenderTarget2D>,

    warned_no_wireframe: bool,
}

impl DefaultRenderContext {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        back_buffer_format: wgpu::TextureFormat,
        config: ContextConfig,
    ) -> Result<Self, RenderError> {
        let resources = RenderResources::new(device, queue);
        let pipelines = PipelineCache::new(&resources.device);
        let uniforms = UniformArena::new(&resources.device);
        let textures = TextureBindings::new(&resources)?;

        if !resources.supports_wireframe() {
            log::info!("device lacks POLYGON_MODE_LINE; pens will not be drawn");
        }

        Ok(Self {
            mesh_creator: MeshCreator::new(resources.clone()),
            resources,
            back_buffer_format,
            fill: RasterizerState::solid(config.cull_mode),
            wireframe: RasterizerState::wireframe(config.cull_mode),
            effect: BasicEffect::default(),
            blend: BlendMode::AlphaBlend,
            state: ContextState::default(),
            pipelines,
            uniforms,
            textures,
            frame: None,
            back_buffer_size: (1, 1),
            back_depth: None,
            target: None,
            warned_no_wireframe: false,
        })
    }

    pub fn back_buffer_format(&self) -> wgpu::TextureFormat {
        self.back_buffer_format
    }

    pub fn is_attached(&self) -> bool {
        self.state.attached
    }

    /// Starts recording a frame drawing into `back_buffer` (`width` × `height` pixels).
    pub fn begin_frame(
        &mut self,
        back_buffer: wgpu::TextureView,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        self.state.begin_frame()?;

        let (width, height) = (width.max(1), height.max(1));
        let stale = self
            .back_depth
            .as_ref()
            .is_none_or(|d| d.width != width || d.height != height);
        if stale {
            log::debug!("back buffer depth resized to {width}x{height}");
            self.back_depth = Some(DepthBuffer {
                view: create_depth_view(&self.resources.device, width, height),
                width,
                height,
            });
        }
        self.back_buffer_size = (width, height);

        self.uniforms.reset();
        let encoder = self
            .resources
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quill frame encoder"),
            });
        self.frame = Some(FrameState {
            encoder,
            back_buffer,
        });
        Ok(())
    }

    /// Ends the frame and returns its commands. Buffers drawn during the frame
    /// become writable again once this returns.
    pub fn finish_frame(&mut self) -> Result<wgpu::CommandBuffer, RenderError> {
        if self.state.finish_frame()? {
            log::warn!("frame finished while attached; detaching");
        }
        let frame = self.frame.take().ok_or(RenderError::NoActiveFrame)?;
        let evicted = self.textures.end_frame();
        if evicted > 0 {
            log::debug!("released {evicted} texture bind groups unused this frame");
        }
        self.resources.frame.advance();
        Ok(frame.encoder.finish())
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        match self.target {
            Some(_) => TEXTURE_FORMAT,
            None => self.back_buffer_format,
        }
    }

    /// Records one pass with the current effect state.
    fn draw_pass(&mut self, mesh: &dyn Mesh, rasterizer: RasterizerState) -> Result<(), RenderError> {
        let sampled = self.effect.texture.as_ref().filter(|_| self.effect.texture_enabled);
        check_sampling(self.target.as_ref().map(|t| t.id()), sampled.map(|t| t.id()))?;

        let Some(binding) = mesh.binding() else {
            return Ok(());
        };

        let key = PipelineKey {
            vertex_kind: mesh.vertex_kind(),
            primitive_type: mesh.primitive_type(),
            rasterizer: self.effect.rasterizer.unwrap_or(rasterizer),
            depth: self.effect.depth,
            blend: self.effect.blend,
            color_format: self.color_format(),
        };

        let device = &self.resources.device;
        let pipeline = self.pipelines.get(device, key).clone();
        let slot = self.uniforms.push(
            device,
            &self.resources.queue,
            self.pipelines.uniform_layout(),
            &self.effect.uniform(),
        );
        let texture_group = self
            .textures
            .get(
                device,
                self.pipelines.texture_layout(),
                self.effect.texture.as_ref().filter(|_| self.effect.texture_enabled),
                self.effect.sampler,
            )
            .clone();

        let Some(uniform_group) = self.uniforms.bind_group(slot) else {
            log::error!("uniform chunk {} missing; draw skipped", slot.chunk);
            return Ok(());
        };
        let frame = self.frame.as_mut().ok_or(RenderError::NoActiveFrame)?;
        let (color_view, depth_view) = match (&self.target, &self.back_depth) {
            (Some(target), _) => (target.texture().view(), target.depth_view()),
            (None, Some(depth)) => (&frame.back_buffer, &depth.view),
            (None, None) => return Err(RenderError::NoActiveFrame),
        };

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quill draw pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, uniform_group, &[slot.offset]);
        pass.set_bind_group(1, &texture_group, &[]);
        pass.set_vertex_buffer(0, binding.buffer.slice(..));
        pass.draw(binding.vertices(), 0..1);

        Ok(())
    }
}

impl RenderContext for DefaultRenderContext {
    fn resources(&self) -> &RenderResources {
        &self.resources
    }

    fn mesh_creator(&self) -> &MeshCreator {
        &self.mesh_creator
    }

    fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        self.blend = BlendMode::AlphaBlend;

        let frame = self.frame.as_mut().ok_or(RenderError::NoActiveFrame)?;
        let (color_view, depth_view) = match (&self.target, &self.back_depth) {
            (Some(target), _) => (target.texture().view(), target.depth_view()),
            (None, Some(depth)) => (&frame.back_buffer, &depth.view),
            (None, None) => return Err(RenderError::NoActiveFrame),
        };

        let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quill clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        Ok(())
    }

    fn attach(&mut self) -> Result<(), RenderError> {
        self.state.attach()
    }

    fn detach(&mut self) -> Result<(), RenderError> {
        self.state.detach()
    }

    fn draw_mesh(
        &mut self,
        mesh: &mut dyn Mesh,
        world: Mat4,
        view: Mat4,
        projection: Mat4,
        brush: Option<&mut dyn Brush>,
        pen: Option<&mut dyn Pen>,
    ) -> Result<(), RenderError> {
        self.state.check_draw(brush.is_some(), pen.is_some())?;

        mesh.attach();

        self.effect.world = world;
        self.effect.view = view;
        self.effect.projection = projection;

        let mut result = Ok(());

        if let Some(brush) = brush {
            if !brush.is_prepared() {
                brush.prepare(&self.resources);
            }
            self.effect.reset_material(self.blend);
            brush.configure(&mut self.effect);
            result = self.draw_pass(mesh, self.fill);
        }

        if let Some(pen) = pen.filter(|_| result.is_ok()) {
            if self.resources.supports_wireframe() {
                if !pen.is_prepared() {
                    pen.prepare(&self.resources);
                }
                self.effect.reset_material(self.blend);
                pen.configure(&mut self.effect);
                result = self.draw_pass(mesh, self.wireframe);
            } else if !self.warned_no_wireframe {
                log::warn!("wireframe rendering unsupported by this device; pen passes are skipped");
                self.warned_no_wireframe = true;
            }
        }

        mesh.detach();
        result
    }

    fn render_target(&self) -> Option<&RenderTarget2D> {
        self.target.as_ref()
    }

    fn set_render_target(&mut self, target: Option<&RenderTarget2D>) {
        self.target = target.cloned();
    }

    fn viewport(&self) -> Viewport {
        match &self.target {
            Some(target) => Viewport::from_size(target.width(), target.height()),
            None => Viewport::from_size(self.back_buffer_size.0, self.back_buffer_size.1),
        }
    }
}
