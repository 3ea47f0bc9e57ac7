//! GPU device + surface management.
//!
//! Creates the wgpu instance/adapter/device/queue for a window, keeps the
//! surface configured across resizes and hands out swapchain images.

mod frame;
mod gpu;
mod init;

pub use frame::{GpuFrame, SurfaceErrorAction};
pub use gpu::Gpu;
pub use init::GpuInit;
