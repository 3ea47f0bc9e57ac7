use std::marker::PhantomData;

use wgpu::util::DeviceExt;

use crate::render::error::MeshError;
use crate::render::resources::RenderResources;

use super::{primitive_count, Mesh, MeshBinding, PrimitiveType, Vertex, VertexKind};

/// Vertex-buffer mesh uploaded once at creation.
pub struct StaticMesh<V: Vertex> {
    buffer: Option<wgpu::Buffer>,
    primitive_type: PrimitiveType,
    primitives: u32,
    vertices: u32,
    _vertex: PhantomData<V>,
}

impl<V: Vertex> StaticMesh<V> {
    /// Validates the primitive count and uploads `vertices`.
    ///
    /// An empty vertex list yields a mesh that draws nothing.
    pub fn new(
        resources: &RenderResources,
        primitive_type: PrimitiveType,
        vertices: &[V],
    ) -> Result<Self, MeshError> {
        let count = vertices.len() as u32;
        let primitives = primitive_count(primitive_type, count)?;

        let buffer = (count > 0).then(|| {
            resources
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("quill static mesh"),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        Ok(Self {
            buffer,
            primitive_type,
            primitives,
            vertices: count,
            _vertex: PhantomData,
        })
    }
}

impl<V: Vertex> Mesh for StaticMesh<V> {
    fn primitives(&self) -> u32 {
        self.primitives
    }

    fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    fn vertices(&self) -> u32 {
        self.vertices
    }

    fn vertex_kind(&self) -> VertexKind {
        V::KIND
    }

    // Immutable after creation.
    fn attach(&mut self) {}

    fn binding(&self) -> Option<MeshBinding<'_>> {
        if self.primitives == 0 {
            return None;
        }
        let buffer = self.buffer.as_ref()?;
        Some(MeshBinding {
            buffer,
            first_vertex: 0,
            vertex_count: super::vertex_count(self.primitive_type, self.primitives),
        })
    }
}
