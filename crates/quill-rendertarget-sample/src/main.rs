mod camera;

use anyhow::{Context, Result};
use glam::{Mat4, Vec2, Vec3};
use winit::dpi::LogicalSize;

use quill_engine::camera::Camera;
use quill_engine::coords::{Rect, Viewport};
use quill_engine::core::{App, AppControl, FrameCtx};
use quill_engine::device::{Gpu, GpuInit};
use quill_engine::input::Key;
use quill_engine::logging::{init_logging, LoggingConfig};
use quill_engine::paint::Color;
use quill_engine::render::mesh::description::{
    BoundingBox, MeshDescriptionBuilder, TextureMeshDescriptionBuilder,
};
use quill_engine::render::mesh::{CreateMesh, StaticMesh, VertexPositionColorTexture};
use quill_engine::render::{
    BackBufferSwapUsage, ContextConfig, DefaultRenderContext, RenderContext, RenderContextExt,
    RenderError, RenderTarget2D, SolidColorBrush, SolidColorPen, Texture2D,
};
use quill_engine::window::{Runtime, RuntimeConfig};

use crate::camera::StaticCamera;

/// Everything drawn each frame, built once the device exists.
struct Scene {
    pixel: Texture2D,
    targets: [RenderTarget2D; 3],
    cube: StaticMesh<VertexPositionColorTexture>,
    fill: SolidColorBrush,
    outline: SolidColorPen,
    camera: StaticCamera,
}

impl Scene {
    fn new(context: &DefaultRenderContext, size: (u32, u32)) -> Result<Self, RenderError> {
        let resources = context.resources();
        let (width, height) = size;

        let pixel = Texture2D::from_pixels(resources, 1, 1, &[Color::WHITE])?;
        let targets = [(); 3].map(|_| {
            let target = RenderTarget2D::new(resources, width, height);
            target.fill(resources, Color::WHITE);
            target
        });

        let mut description = TextureMeshDescriptionBuilder::new();
        description.add_box(BoundingBox::new(Vec3::ZERO, Vec3::splat(10.0)), Vec2::ONE);
        let cube = context.mesh_creator().create_mesh_from_description(&description)?;

        let camera = StaticCamera::new(
            Viewport::from_size(width, height),
            Vec3::new(0.0, 0.0, 50.0),
        );

        Ok(Self {
            pixel,
            targets,
            cube,
            fill: SolidColorBrush::new(Color::GREEN),
            outline: SolidColorPen::new(Color::BLACK, None),
            camera,
        })
    }

    /// Walks through the four swap cases, then composites the targets on the back buffer.
    fn draw(&mut self, ctx: &mut DefaultRenderContext, seconds: f32) -> Result<(), RenderError> {
        let [rt1, rt2, rt3] = &self.targets;

        // back buffer -> target
        ctx.set_render_target(None);
        {
            let mut scope = ctx.render_to(Some(rt1), BackBufferSwapUsage::OriginalBehaviour);
            expect_bound(&*scope, 1, "rendering into rt1");

            scope.clear(Color::BLUE)?;
            scope.attach()?;
            let world = Mat4::from_rotation_x(seconds)
                * Mat4::from_rotation_y(seconds)
                * Mat4::from_translation(Vec3::splat(-5.0));
            let drawn = scope.draw_mesh(
                &mut self.cube,
                world,
                self.camera.view(),
                self.camera.projection(),
                Some(&mut self.fill),
                Some(&mut self.outline),
            );
            scope.detach()?;
            drawn?;
        }
        expect_bound(ctx, 0, "after rt1");

        // target -> target
        ctx.set_render_target(Some(rt2));
        {
            let mut scope = ctx.render_to(Some(rt3), BackBufferSwapUsage::OriginalBehaviour);
            scope.clear(Color::RED)?;
        }
        expect_bound(ctx, 1, "after rt3");
        ctx.set_render_target(Some(rt2));
        ctx.clear(Color::GREEN)?;

        // target -> back buffer
        {
            let scope = ctx.render_to(None, BackBufferSwapUsage::OriginalBehaviour);
            expect_bound(&*scope, 0, "back buffer while rt2 was bound");
        }
        expect_bound(ctx, 1, "rt2 restored");

        // back buffer -> back buffer
        ctx.set_render_target(None);
        {
            let scope = ctx.render_to(None, BackBufferSwapUsage::OriginalBehaviour);
            expect_bound(&*scope, 0, "back buffer to back buffer");
        }
        expect_bound(ctx, 0, "back buffer kept");

        self.composite(ctx)
    }

    fn composite(&self, ctx: &mut DefaultRenderContext) -> Result<(), RenderError> {
        let viewport = ctx.viewport();
        let (w, h) = (viewport.width, viewport.height);

        ctx.clear(Color::CORNFLOWER_BLUE)?;
        ctx.attach()?;
        let drawn = self.draw_quadrants(ctx, w, h);
        ctx.detach()?;
        drawn
    }

    fn draw_quadrants(&self, ctx: &mut DefaultRenderContext, w: f32, h: f32) -> Result<(), RenderError> {
        let [rt1, rt2, rt3] = &self.targets;
        let (half_w, half_h) = ((w / 2.0).floor(), (h / 2.0).floor());

        ctx.draw_texture(rt1.texture(), Rect::new(0.0, 0.0, half_w, half_h), Color::WHITE)?;
        ctx.draw_texture(rt2.texture(), Rect::new(half_w, 0.0, half_w, half_h), Color::WHITE)?;
        ctx.draw_texture(rt3.texture(), Rect::new(0.0, half_h, half_w, half_h), Color::WHITE)?;

        ctx.draw_texture(&self.pixel, Rect::new(w - 50.0, h - 50.0, 50.0, 50.0), Color::YELLOW)?;
        ctx.draw_texture(&self.pixel, Rect::new(w - 100.0, h - 100.0, 100.0, 50.0), Color::RED)
    }
}

fn expect_bound(ctx: &dyn RenderContext, expected: usize, stage: &str) {
    let bound = ctx.render_target_count();
    if bound != expected {
        log::error!("{stage}: expected {expected} bound render target(s), found {bound}");
    }
}

#[derive(Default)]
struct RenderTargetApp {
    context: Option<DefaultRenderContext>,
    scene: Option<Scene>,
}

impl App for RenderTargetApp {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let context = DefaultRenderContext::new(
            gpu.device().clone(),
            gpu.queue().clone(),
            gpu.surface_format(),
            ContextConfig::default(),
        )
        .context("failed to create render context")?;

        let size = gpu.size();
        let scene = Scene::new(&context, (size.width, size.height))
            .context("failed to create sample resources")?;

        self.context = Some(context);
        self.scene = Some(scene);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        let (Some(context), Some(scene)) = (self.context.as_mut(), self.scene.as_mut()) else {
            return AppControl::Continue;
        };

        scene.camera.update(&ctx.time);
        let seconds = ctx.time.total_elapsed_seconds();
        ctx.render(context, |rc| scene.draw(rc, seconds))
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "RenderTargetSample - Esc to quit".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        RenderTargetApp::default(),
    )
}
