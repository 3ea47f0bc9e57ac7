/// One acquired swapchain image.
///
/// Hand it back through [`Gpu::present`](super::Gpu::present) once the frame's
/// commands are submitted; holding it blocks acquisition of the next image.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl GpuFrame {
    /// Size of the acquired image in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        let texture = &self.surface_texture.texture;
        (texture.width(), texture.height())
    }
}

/// What the caller should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Unrecoverable (out of memory); shut down.
    Fatal,
}
