use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::paint::Color;

/// Attribute set carried by a vertex type; selects the shader entry point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexKind {
    PositionColor,
    PositionColorTexture,
    PositionTexture,
}

impl VertexKind {
    pub(crate) fn entry_point(self) -> &'static str {
        match self {
            VertexKind::PositionColor => "vs_position_color",
            VertexKind::PositionColorTexture => "vs_position_color_texture",
            VertexKind::PositionTexture => "vs_position_texture",
        }
    }

    pub(crate) fn layout(self) -> wgpu::VertexBufferLayout<'static> {
        match self {
            VertexKind::PositionColor => VertexPositionColor::layout(),
            VertexKind::PositionColorTexture => VertexPositionColorTexture::layout(),
            VertexKind::PositionTexture => VertexPositionTexture::layout(),
        }
    }
}

/// Plain-old-data vertex uploaded as-is into a vertex buffer.
///
/// Shader locations: 0 position, 1 color, 2 texture coordinate.
pub trait Vertex: Pod + 'static {
    const KIND: VertexKind;

    fn layout() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    pub position: [f32; 3],
    pub color: [u8; 4], // straight rgba8
}

impl VertexPositionColor {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Unorm8x4];

    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_rgba8(),
        }
    }
}

impl Vertex for VertexPositionColor {
    const KIND: VertexKind = VertexKind::PositionColor;

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColorTexture {
    pub position: [f32; 3],
    pub color: [u8; 4],
    pub uv: [f32; 2],
}

impl VertexPositionColorTexture {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Unorm8x4, 2 => Float32x2];

    pub fn new(position: Vec3, color: Color, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_rgba8(),
            uv: uv.to_array(),
        }
    }
}

impl Vertex for VertexPositionColorTexture {
    const KIND: VertexKind = VertexKind::PositionColorTexture;

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexPositionTexture {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionTexture {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 2 => Float32x2];

    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
        }
    }
}

impl Vertex for VertexPositionTexture {
    const KIND: VertexKind = VertexKind::PositionTexture;

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<VertexPositionColor>(), 16);
        assert_eq!(std::mem::size_of::<VertexPositionColorTexture>(), 24);
        assert_eq!(std::mem::size_of::<VertexPositionTexture>(), 20);
    }

    #[test]
    fn layouts_follow_the_kind() {
        assert_eq!(VertexKind::PositionColorTexture.layout().attributes.len(), 3);
        assert_eq!(VertexKind::PositionTexture.layout().attributes[1].shader_location, 2);
        assert_eq!(
            VertexKind::PositionColor.layout().array_stride,
            std::mem::size_of::<VertexPositionColor>() as u64
        );
    }

    #[test]
    fn color_is_stored_as_straight_bytes() {
        let v = VertexPositionColor::new(Vec3::ZERO, Color::CORNFLOWER_BLUE);
        assert_eq!(v.color, [100, 149, 237, 255]);
    }
}
