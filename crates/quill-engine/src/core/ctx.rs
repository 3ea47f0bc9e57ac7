use glam::Vec2;
use winit::dpi::LogicalPosition;
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{DefaultRenderContext, RenderError};
use crate::time::FrameTime;

use super::app::AppControl;

/// Window handle plus helpers the samples need for mouse look.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Logical window size in logical pixels.
    pub fn logical_size(&self) -> Vec2 {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        Vec2::new(logical.width as f32, logical.height as f32)
    }

    /// Center of the client area in logical pixels.
    pub fn center(&self) -> Vec2 {
        (self.logical_size() * 0.5).floor()
    }

    /// Moves the OS cursor; returns `false` when the platform refuses.
    pub fn set_cursor_position(&self, pos: Vec2) -> bool {
        match self
            .window
            .set_cursor_position(LogicalPosition::new(pos.x as f64, pos.y as f64))
        {
            Ok(()) => true,
            Err(err) => {
                log::debug!("cursor warp unavailable: {err}");
                false
            }
        }
    }

    pub fn set_cursor_visible(&self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a mut InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires a swapchain image, lets `draw` record into `ctx`, then submits and presents.
    ///
    /// Draw errors are logged and the frame is still presented. Surface errors
    /// skip the frame; only fatal ones end the application.
    pub fn render<F>(&mut self, ctx: &mut DefaultRenderContext, draw: F) -> AppControl
    where
        F: FnOnce(&mut DefaultRenderContext) -> Result<(), RenderError>,
    {
        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        let (width, height) = frame.size();
        if let Err(err) = ctx.begin_frame(frame.view.clone(), width, height) {
            log::error!("cannot begin frame: {err}");
            return AppControl::Continue;
        }

        if let Err(err) = draw(ctx) {
            log::error!("frame draw failed: {err}");
        }

        match ctx.finish_frame() {
            Ok(commands) => {
                self.gpu.queue().submit(std::iter::once(commands));
            }
            Err(err) => log::error!("cannot finish frame: {err}"),
        }

        self.window.window.pre_present_notify();
        self.gpu.present(frame);

        AppControl::Continue
    }
}
