//! Vertex-buffer backed meshes.
//!
//! Three strategies exist:
//! - [`StaticMesh`]: uploaded once, never modified.
//! - [`AppendingMesh`]: circular append buffer for geometry updated several times per frame.
//! - [`UpdatableDynamicMesh`]: contents replaced wholesale, reallocating only when growing.
//!
//! Meshes are unindexed; every draw covers a contiguous vertex range.

mod appending;
mod creator;
pub mod description;
mod primitive;
mod static_mesh;
mod updatable;
mod vertex;

use std::ops::Range;

use crate::render::error::MeshError;
use crate::render::frame::BufferUse;
use crate::render::resources::RenderResources;

pub use appending::AppendingMesh;
pub use creator::{CreateMesh, DynamicMeshUsage, MeshCreator};
pub use primitive::{first_vertex, primitive_count, vertex_count, PrimitiveType};
pub use static_mesh::StaticMesh;
pub use updatable::UpdatableDynamicMesh;
pub use vertex::{
    Vertex, VertexKind, VertexPositionColor, VertexPositionColorTexture, VertexPositionTexture,
};

/// Vertex range of a mesh ready to be bound for a draw.
#[derive(Debug, Copy, Clone)]
pub struct MeshBinding<'a> {
    pub buffer: &'a wgpu::Buffer,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl MeshBinding<'_> {
    #[inline]
    pub fn vertices(&self) -> Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }
}

/// A vertex-based 3D object.
///
/// The render context calls [`Mesh::attach`] before drawing and [`Mesh::detach`] after.
pub trait Mesh {
    /// Number of primitives of the current contents.
    fn primitives(&self) -> u32;

    fn primitive_type(&self) -> PrimitiveType;

    /// Number of vertices of the current contents.
    fn vertices(&self) -> u32;

    fn vertex_kind(&self) -> VertexKind;

    /// Marks the vertex buffer as referenced by the frame being recorded.
    fn attach(&mut self);

    /// The vertex range to draw, or `None` when there is nothing to draw.
    fn binding(&self) -> Option<MeshBinding<'_>>;

    fn detach(&mut self) {}
}

/// Mutable, unindexed mesh.
pub trait DynamicMesh<V: Vertex>: Mesh {
    /// Replaces the contents, keeping the primitive type.
    fn update(&mut self, vertices: &[V]) -> Result<(), MeshError>;

    /// Replaces the contents and the primitive type.
    ///
    /// On error the previous primitive type is kept.
    fn update_with_type(
        &mut self,
        vertices: &[V],
        primitive_type: PrimitiveType,
    ) -> Result<(), MeshError>;

    /// Primitives actually drawn. Equals `0..primitives()` unless narrowed by
    /// [`DynamicMesh::update_primitive_range`].
    fn primitive_range(&self) -> Range<u32>;

    /// Restricts drawing to `count` primitives starting at primitive `start`.
    ///
    /// Reset to the full contents by the next update.
    fn update_primitive_range(&mut self, start: u32, count: u32) -> Result<(), MeshError>;
}

// ── shared buffer plumbing ────────────────────────────────────────────────

/// Vertex buffer plus the bookkeeping needed to avoid overwriting in-flight data.
pub(crate) struct VertexBuffer {
    pub(crate) buffer: wgpu::Buffer,
    /// Capacity in vertices.
    pub(crate) capacity: u32,
    pub(crate) last_use: BufferUse,
}

impl VertexBuffer {
    pub(crate) fn new<V: Vertex>(resources: &RenderResources, capacity: u32, label: &str) -> Self {
        let size = (capacity.max(1) as u64) * std::mem::size_of::<V>() as u64;
        let buffer = resources.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        log::debug!("{label}: allocated vertex buffer for {capacity} vertices ({size} bytes)");

        Self {
            buffer,
            capacity,
            last_use: BufferUse::default(),
        }
    }

    pub(crate) fn write<V: Vertex>(&self, resources: &RenderResources, first: u32, vertices: &[V]) {
        if vertices.is_empty() {
            return;
        }
        let offset = first as u64 * std::mem::size_of::<V>() as u64;
        resources
            .queue
            .write_buffer(&self.buffer, offset, bytemuck::cast_slice(vertices));
    }

    #[inline]
    pub(crate) fn in_flight(&self, resources: &RenderResources) -> bool {
        self.last_use.in_flight(&resources.frame)
    }

    pub(crate) fn status(&self, resources: &RenderResources) -> BufferStatus {
        BufferStatus {
            capacity: self.capacity,
            in_flight: self.in_flight(resources),
        }
    }
}

/// GPU-free view of an existing vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct BufferStatus {
    pub(crate) capacity: u32,
    /// Referenced by the frame being recorded.
    pub(crate) in_flight: bool,
}

/// Whether a write may go to the current buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BufferAction {
    Reuse,
    /// Allocate a fresh buffer of this many vertices; the old one stays alive
    /// until the commands referencing it are done.
    Allocate(u32),
}

/// Primitive bookkeeping of a dynamic mesh's current contents.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MeshShape {
    pub(crate) primitive_type: PrimitiveType,
    pub(crate) vertices: u32,
    pub(crate) primitives: u32,
    pub(crate) window: PrimitiveWindow,
}

impl MeshShape {
    pub(crate) fn new(primitive_type: PrimitiveType) -> Self {
        Self {
            primitive_type,
            vertices: 0,
            primitives: 0,
            window: PrimitiveWindow::default(),
        }
    }

    /// Takes `vertices` as the new contents, drawn as `primitive_type`.
    ///
    /// Nothing changes when the count is invalid for the type.
    pub(crate) fn reshape(&mut self, primitive_type: PrimitiveType, vertices: u32) -> Result<(), MeshError> {
        let primitives = primitive_count(primitive_type, vertices)?;
        *self = Self {
            primitive_type,
            vertices,
            primitives,
            window: PrimitiveWindow::full(primitives),
        };
        Ok(())
    }

    pub(crate) fn narrow(&mut self, start: u32, count: u32) -> Result<(), MeshError> {
        self.window = PrimitiveWindow::narrowed(start, count, self.primitives)?;
        Ok(())
    }

    /// Vertex range drawn, relative to the first vertex of the contents.
    #[inline]
    pub(crate) fn vertex_span(&self) -> (u32, u32) {
        self.window.vertex_span(self.primitive_type)
    }
}

/// Narrowed drawing window over the primitives of a dynamic mesh.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub(crate) struct PrimitiveWindow {
    pub(crate) start: u32,
    pub(crate) count: u32,
}

impl PrimitiveWindow {
    pub(crate) fn full(primitives: u32) -> Self {
        Self {
            start: 0,
            count: primitives,
        }
    }

    pub(crate) fn narrowed(start: u32, count: u32, available: u32) -> Result<Self, MeshError> {
        match start.checked_add(count) {
            Some(end) if end <= available => Ok(Self { start, count }),
            _ => Err(MeshError::RangeOutOfBounds {
                start,
                count,
                available,
            }),
        }
    }

    #[inline]
    pub(crate) fn range(self) -> Range<u32> {
        self.start..self.start + self.count
    }

    /// Vertex range of the window, relative to the first vertex of the contents.
    pub(crate) fn vertex_span(self, primitive_type: PrimitiveType) -> (u32, u32) {
        (
            first_vertex(primitive_type, self.start),
            vertex_count(primitive_type, self.count),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_rejects_ranges_past_the_contents() {
        assert!(PrimitiveWindow::narrowed(2, 3, 5).is_ok());
        assert_eq!(
            PrimitiveWindow::narrowed(4, 2, 5),
            Err(MeshError::RangeOutOfBounds {
                start: 4,
                count: 2,
                available: 5
            })
        );
        assert!(PrimitiveWindow::narrowed(u32::MAX, 2, 5).is_err());
    }

    #[test]
    fn window_vertex_span_for_lists_and_strips() {
        let w = PrimitiveWindow::narrowed(1, 2, 4).unwrap();
        assert_eq!(w.vertex_span(PrimitiveType::TriangleList), (3, 6));
        assert_eq!(w.vertex_span(PrimitiveType::TriangleStrip), (1, 4));
        assert_eq!(w.range(), 1..3);
    }

    #[test]
    fn empty_window_spans_no_vertices() {
        assert_eq!(PrimitiveWindow::full(0).vertex_span(PrimitiveType::LineStrip), (0, 0));
    }

    // ── shape ─────────────────────────────────────────────────────────────

    #[test]
    fn reshape_resets_the_window() {
        let mut shape = MeshShape::new(PrimitiveType::TriangleList);
        shape.reshape(PrimitiveType::TriangleList, 12).unwrap();
        shape.narrow(1, 2).unwrap();
        assert_eq!(shape.window.range(), 1..3);

        shape.reshape(PrimitiveType::TriangleList, 6).unwrap();
        assert_eq!(shape.primitives, 2);
        assert_eq!(shape.window.range(), 0..2);
        assert_eq!(shape.vertex_span(), (0, 6));
    }

    #[test]
    fn rejected_type_change_keeps_previous_shape() {
        let mut shape = MeshShape::new(PrimitiveType::TriangleList);
        shape.reshape(PrimitiveType::TriangleList, 6).unwrap();
        let before = shape;

        let err = shape.reshape(PrimitiveType::LineList, 3).unwrap_err();
        assert!(matches!(err, MeshError::InvalidVertexCount { .. }));
        assert_eq!(shape, before);
        assert_eq!(shape.primitive_type, PrimitiveType::TriangleList);
    }

    #[test]
    fn empty_contents_have_no_primitives() {
        let mut shape = MeshShape::new(PrimitiveType::LineStrip);
        shape.reshape(PrimitiveType::LineStrip, 5).unwrap();
        shape.reshape(PrimitiveType::LineStrip, 0).unwrap();
        assert_eq!((shape.vertices, shape.primitives), (0, 0));
        assert!(shape.narrow(0, 1).is_err());
    }
}
