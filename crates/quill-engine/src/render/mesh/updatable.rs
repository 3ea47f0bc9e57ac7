use std::marker::PhantomData;
use std::ops::Range;

use crate::render::error::MeshError;
use crate::render::resources::RenderResources;

use super::{
    BufferAction, BufferStatus, DynamicMesh, Mesh, MeshBinding, MeshShape, PrimitiveType, Vertex,
    VertexBuffer, VertexKind,
};

/// Buffer needed to replace the contents with `len` vertices.
///
/// A buffer still referenced by the current frame is never overwritten; it is
/// renamed to a fresh one of the same capacity instead.
pub(crate) fn plan_replace(current: Option<BufferStatus>, len: u32) -> BufferAction {
    match current {
        Some(status) if status.capacity >= len && !status.in_flight => BufferAction::Reuse,
        Some(status) if status.capacity >= len => BufferAction::Allocate(status.capacity),
        _ => BufferAction::Allocate(len),
    }
}

/// Dynamic mesh whose contents are replaced wholesale on every update.
///
/// The buffer is reallocated only when the new contents exceed its capacity,
/// or when the current frame still references it.
pub struct UpdatableDynamicMesh<V: Vertex> {
    resources: RenderResources,
    buffer: Option<VertexBuffer>,
    shape: MeshShape,
    _vertex: PhantomData<V>,
}

impl<V: Vertex> UpdatableDynamicMesh<V> {
    pub fn new(resources: RenderResources, primitive_type: PrimitiveType) -> Self {
        Self {
            resources,
            buffer: None,
            shape: MeshShape::new(primitive_type),
            _vertex: PhantomData,
        }
    }

    /// Capacity of the current buffer in vertices.
    pub fn capacity(&self) -> u32 {
        self.buffer.as_ref().map_or(0, |b| b.capacity)
    }

    fn replace(&mut self, vertices: &[V], primitive_type: PrimitiveType) -> Result<(), MeshError> {
        let len = vertices.len() as u32;
        let mut shape = self.shape;
        shape.reshape(primitive_type, len)?;

        if len > 0 {
            let current = self.buffer.as_ref().map(|b| b.status(&self.resources));
            if let BufferAction::Allocate(capacity) = plan_replace(current, len) {
                self.buffer = Some(VertexBuffer::new::<V>(
                    &self.resources,
                    capacity,
                    "quill updatable mesh",
                ));
            }
            if let Some(buffer) = &self.buffer {
                buffer.write(&self.resources, 0, vertices);
            }
        }

        self.shape = shape;
        Ok(())
    }
}

impl<V: Vertex> Mesh for UpdatableDynamicMesh<V> {
    fn primitives(&self) -> u32 {
        self.shape.primitives
    }

    fn primitive_type(&self) -> PrimitiveType {
        self.shape.primitive_type
    }

    fn vertices(&self) -> u32 {
        self.shape.vertices
    }

    fn vertex_kind(&self) -> VertexKind {
        V::KIND
    }

    fn attach(&mut self) {
        if self.shape.primitives == 0 {
            return;
        }
        if let Some(buffer) = &mut self.buffer {
            buffer.last_use.mark(&self.resources.frame);
        }
    }

    fn binding(&self) -> Option<MeshBinding<'_>> {
        if self.shape.primitives == 0 {
            return None;
        }
        let buffer = self.buffer.as_ref()?;
        let (first, count) = self.shape.vertex_span();
        if count == 0 {
            return None;
        }
        Some(MeshBinding {
            buffer: &buffer.buffer,
            first_vertex: first,
            vertex_count: count,
        })
    }
}

impl<V: Vertex> DynamicMesh<V> for UpdatableDynamicMesh<V> {
    fn update(&mut self, vertices: &[V]) -> Result<(), MeshError> {
        self.replace(vertices, self.shape.primitive_type)
    }

    fn update_with_type(
        &mut self,
        vertices: &[V],
        primitive_type: PrimitiveType,
    ) -> Result<(), MeshError> {
        self.replace(vertices, primitive_type)
    }

    fn primitive_range(&self) -> Range<u32> {
        self.shape.window.range()
    }

    fn update_primitive_range(&mut self, start: u32, count: u32) -> Result<(), MeshError> {
        self.shape.narrow(start, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(capacity: u32, in_flight: bool) -> Option<BufferStatus> {
        Some(BufferStatus {
            capacity,
            in_flight,
        })
    }

    // ── allocation ────────────────────────────────────────────────────────

    #[test]
    fn first_update_allocates_exact_size() {
        assert_eq!(plan_replace(None, 36), BufferAction::Allocate(36));
    }

    #[test]
    fn grows_when_contents_exceed_capacity() {
        assert_eq!(plan_replace(status(36, false), 72), BufferAction::Allocate(72));
        assert_eq!(plan_replace(status(36, true), 72), BufferAction::Allocate(72));
    }

    // ── reuse ─────────────────────────────────────────────────────────────

    #[test]
    fn reuses_idle_buffer_in_place() {
        assert_eq!(plan_replace(status(72, false), 72), BufferAction::Reuse);
        assert_eq!(plan_replace(status(72, false), 3), BufferAction::Reuse);
    }

    #[test]
    fn renames_buffer_in_flight_keeping_capacity() {
        assert_eq!(plan_replace(status(72, true), 36), BufferAction::Allocate(72));
    }
}
