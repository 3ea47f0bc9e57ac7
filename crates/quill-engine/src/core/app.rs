use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the samples.
pub trait App {
    /// Called once the window's GPU context exists, before the first frame.
    ///
    /// Device-bound state (render contexts, meshes, textures) is created here.
    /// An error closes the window.
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()>;

    /// Called for raw window events, after input state has been updated.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
