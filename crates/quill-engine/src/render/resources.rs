use super::frame::FrameSerial;

/// Device handles shared by meshes, textures, brushes and pens.
///
/// Cloning is cheap; all fields are reference-counted wgpu handles.
#[derive(Debug, Clone)]
pub struct RenderResources {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub frame: FrameSerial,
}

impl RenderResources {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            frame: FrameSerial::new(),
        }
    }

    /// True when the device can rasterize polygons as lines.
    pub fn supports_wireframe(&self) -> bool {
        self.device.features().contains(wgpu::Features::POLYGON_MODE_LINE)
    }
}
