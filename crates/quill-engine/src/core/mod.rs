//! Contract between the window runtime and the samples.
//!
//! Keeps winit's event loop out of application code and hands each frame a
//! consistent context (window, GPU, input, timing).

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
