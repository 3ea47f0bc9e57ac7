use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use quill_engine::coords::Viewport;
use quill_engine::core::{App, AppControl, FrameCtx};
use quill_engine::device::{Gpu, GpuInit};
use quill_engine::input::Key;
use quill_engine::logging::{init_logging, LoggingConfig};
use quill_engine::window::{Runtime, RuntimeConfig};
use quill_terrain::{SceneInput, TerrainScene, WorldConfig};

struct TerrainApp {
    config: WorldConfig,
    scene: Option<TerrainScene>,
    cursor_hidden: bool,
}

impl App for TerrainApp {
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let scene = TerrainScene::new(gpu, self.config).context("failed to build terrain scene")?;
        self.scene = Some(scene);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };

        if !self.cursor_hidden {
            ctx.window.set_cursor_visible(false);
            self.cursor_hidden = true;
        }

        let size = ctx.gpu.size();
        let input = SceneInput {
            focused: ctx.input.focused,
            pointer: ctx.input.pointer_pos,
            center: ctx.window.center(),
            viewport: Viewport::from_size(size.width, size.height),
            forward: ctx.input.key_down(Key::W),
            back: ctx.input.key_down(Key::S),
            left: ctx.input.key_down(Key::A),
            right: ctx.input.key_down(Key::D),
        };

        let (window, input_state) = (&ctx.window, &mut *ctx.input);
        scene.update(&ctx.time, &input, |center| {
            if window.set_cursor_position(center) {
                input_state.warp_pointer(center);
            }
        });

        scene.draw(ctx)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = WorldConfig::from_env();
    log::info!("terrain sample: mouse to look, WASD to fly, Esc to quit");

    let app = TerrainApp {
        config,
        scene: None,
        cursor_hidden: false,
    };

    Runtime::run(
        RuntimeConfig {
            title: "TerrainSample - Esc to quit".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        app,
    )
}
