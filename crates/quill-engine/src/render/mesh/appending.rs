use std::marker::PhantomData;
use std::ops::Range;

use crate::render::error::MeshError;
use crate::render::resources::RenderResources;

use super::{
    BufferAction, BufferStatus, DynamicMesh, Mesh, MeshBinding, MeshShape, PrimitiveType, Vertex,
    VertexBuffer, VertexKind,
};

/// Buffers grow in multiples of this many vertices.
pub const GROW_SIZE: u32 = 1024;

/// Appends reaching past this many vertices wrap back to the start of the buffer.
pub const CLEAR_SIZE: u32 = 10 * GROW_SIZE;

/// Write position inside the circular buffer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub(crate) struct AppendCursor {
    /// Capacity in vertices; `0` while no buffer exists.
    pub(crate) capacity: u32,
    pub(crate) start: u32,
    pub(crate) count: u32,
}

/// What an append of `len` vertices requires.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct AppendStep {
    /// A new buffer of this capacity must be allocated first.
    pub(crate) grow_to: Option<u32>,
    /// The write restarts at offset 0, discarding previous contents.
    pub(crate) discard: bool,
    /// First vertex written.
    pub(crate) write_at: u32,
    /// Cursor after the append.
    pub(crate) next: AppendCursor,
}

impl AppendCursor {
    #[inline]
    pub(crate) fn end(self) -> u32 {
        self.start + self.count
    }

    pub(crate) fn plan(self, len: u32) -> AppendStep {
        let mut cursor = self;
        let mut grow_to = None;

        if cursor.capacity == 0 || cursor.end() + len > cursor.capacity {
            let capacity = (cursor.end() + len).div_ceil(GROW_SIZE).max(1) * GROW_SIZE;
            grow_to = Some(capacity);
            cursor = AppendCursor {
                capacity,
                start: 0,
                count: 0,
            };
        }

        if cursor.end() + len > CLEAR_SIZE {
            AppendStep {
                grow_to,
                discard: true,
                write_at: 0,
                next: AppendCursor {
                    capacity: cursor.capacity,
                    start: 0,
                    count: len,
                },
            }
        } else {
            AppendStep {
                grow_to,
                discard: false,
                write_at: cursor.end(),
                next: AppendCursor {
                    capacity: cursor.capacity,
                    start: cursor.end(),
                    count: len,
                },
            }
        }
    }
}

/// Buffer needed to carry out `step`.
///
/// Growing always allocates. A wrap-around discards earlier contents, so it
/// also switches to a fresh buffer while the current frame still references
/// the old one. Plain appends never overlap earlier draws and write in place.
pub(crate) fn plan_append(current: Option<BufferStatus>, step: &AppendStep) -> BufferAction {
    if let Some(capacity) = step.grow_to {
        return BufferAction::Allocate(capacity);
    }
    match current {
        None => BufferAction::Allocate(step.next.capacity),
        Some(status) if step.discard && status.in_flight => {
            BufferAction::Allocate(step.next.capacity)
        }
        Some(_) => BufferAction::Reuse,
    }
}

/// Dynamic mesh appending every update behind the previous one in a circular buffer.
///
/// Suited to geometry that is updated and drawn several times per frame
/// (update, draw, update, draw, ...). Appends never touch data referenced by
/// earlier draws; a wrap-around to the start of a buffer still in use by the
/// current frame switches to a fresh buffer.
pub struct AppendingMesh<V: Vertex> {
    resources: RenderResources,
    buffer: Option<VertexBuffer>,
    cursor: AppendCursor,
    shape: MeshShape,
    _vertex: PhantomData<V>,
}

impl<V: Vertex> AppendingMesh<V> {
    pub fn new(resources: RenderResources, primitive_type: PrimitiveType) -> Self {
        Self {
            resources,
            buffer: None,
            cursor: AppendCursor::default(),
            shape: MeshShape::new(primitive_type),
            _vertex: PhantomData,
        }
    }

    /// Capacity of the current buffer in vertices.
    pub fn capacity(&self) -> u32 {
        self.cursor.capacity
    }

    fn append(&mut self, vertices: &[V], primitive_type: PrimitiveType) -> Result<(), MeshError> {
        let len = vertices.len() as u32;
        let mut shape = self.shape;
        shape.reshape(primitive_type, len)?;
        let step = self.cursor.plan(len);

        let current = self.buffer.as_ref().map(|b| b.status(&self.resources));
        if let BufferAction::Allocate(capacity) = plan_append(current, &step) {
            self.buffer = Some(VertexBuffer::new::<V>(
                &self.resources,
                capacity,
                "quill appending mesh",
            ));
        }

        if let Some(buffer) = &self.buffer {
            buffer.write(&self.resources, step.write_at, vertices);
        }

        self.cursor = step.next;
        self.shape = shape;
        Ok(())
    }
}

impl<V: Vertex> Mesh for AppendingMesh<V> {
    fn primitives(&self) -> u32 {
        self.shape.primitives
    }

    fn primitive_type(&self) -> PrimitiveType {
        self.shape.primitive_type
    }

    fn vertices(&self) -> u32 {
        self.cursor.count
    }

    fn vertex_kind(&self) -> VertexKind {
        V::KIND
    }

    fn attach(&mut self) {
        if let Some(buffer) = &mut self.buffer {
            buffer.last_use.mark(&self.resources.frame);
        }
    }

    fn binding(&self) -> Option<MeshBinding<'_>> {
        let buffer = self.buffer.as_ref()?;
        let (first, count) = self.shape.vertex_span();
        if count == 0 {
            return None;
        }
        Some(MeshBinding {
            buffer: &buffer.buffer,
            first_vertex: self.cursor.start + first,
            vertex_count: count,
        })
    }
}

impl<V: Vertex> DynamicMesh<V> for AppendingMesh<V> {
    fn update(&mut self, vertices: &[V]) -> Result<(), MeshError> {
        self.append(vertices, self.shape.primitive_type)
    }

    fn update_with_type(
        &mut self,
        vertices: &[V],
        primitive_type: PrimitiveType,
    ) -> Result<(), MeshError> {
        self.append(vertices, primitive_type)
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

    fn cursor(capacity: u32, start: u32, count: u32) -> AppendCursor {
        AppendCursor {
            capacity,
            start,
            count,
        }
    }

    // ── growth ────────────────────────────────────────────────────────────

    #[test]
    fn first_append_allocates_one_grow_step() {
        let step = AppendCursor::default().plan(36);
        assert_eq!(step.grow_to, Some(GROW_SIZE));
        assert!(!step.discard);
        assert_eq!(step.write_at, 0);
        assert_eq!(step.next, cursor(1024, 0, 36));
    }

    #[test]
    fn growth_rounds_up_to_grow_size_and_resets() {
        let step = cursor(1024, 900, 100).plan(100);
        assert_eq!(step.grow_to, Some(2048));
        assert_eq!(step.write_at, 0);
        assert_eq!(step.next, cursor(2048, 0, 100));
    }

    #[test]
    fn empty_first_update_still_allocates() {
        let step = AppendCursor::default().plan(0);
        assert_eq!(step.grow_to, Some(GROW_SIZE));
        assert_eq!(step.next, cursor(1024, 0, 0));
    }

    // ── append ────────────────────────────────────────────────────────────

    #[test]
    fn appends_behind_previous_contents() {
        let step = cursor(1024, 0, 36).plan(36);
        assert_eq!(step.grow_to, None);
        assert!(!step.discard);
        assert_eq!(step.write_at, 36);
        assert_eq!(step.next, cursor(1024, 36, 36));
    }

    #[test]
    fn empty_append_advances_start() {
        let step = cursor(1024, 10, 6).plan(0);
        assert_eq!(step.next, cursor(1024, 16, 0));
    }

    // ── discard ───────────────────────────────────────────────────────────

    #[test]
    fn wraps_to_start_past_clear_size() {
        let step = cursor(CLEAR_SIZE + GROW_SIZE, 10_000, 200).plan(100);
        assert_eq!(step.grow_to, None);
        assert!(step.discard);
        assert_eq!(step.write_at, 0);
        assert_eq!(step.next, cursor(CLEAR_SIZE + GROW_SIZE, 0, 100));
    }

    #[test]
    fn oversized_update_grows_then_discards() {
        let step = AppendCursor::default().plan(20_000);
        assert_eq!(step.grow_to, Some(20_480));
        assert!(step.discard);
        assert_eq!(step.next, cursor(20_480, 0, 20_000));
    }

    #[test]
    fn exactly_clear_size_still_appends() {
        let step = cursor(CLEAR_SIZE, 0, CLEAR_SIZE - 6).plan(6);
        assert!(!step.discard);
        assert_eq!(step.write_at, CLEAR_SIZE - 6);
    }

    // ── buffer plan ───────────────────────────────────────────────────────

    fn status(capacity: u32, in_flight: bool) -> Option<BufferStatus> {
        Some(BufferStatus {
            capacity,
            in_flight,
        })
    }

    #[test]
    fn growth_always_allocates() {
        let step = cursor(1024, 900, 100).plan(100);
        assert_eq!(plan_append(status(1024, false), &step), BufferAction::Allocate(2048));
        assert_eq!(plan_append(None, &AppendCursor::default().plan(6)), BufferAction::Allocate(1024));
    }

    #[test]
    fn append_in_flight_writes_in_place() {
        let step = cursor(1024, 0, 36).plan(36);
        assert_eq!(plan_append(status(1024, true), &step), BufferAction::Reuse);
    }

    #[test]
    fn wrap_around_reuses_idle_buffer() {
        let step = cursor(CLEAR_SIZE + GROW_SIZE, 10_000, 200).plan(100);
        assert_eq!(plan_append(status(CLEAR_SIZE + GROW_SIZE, false), &step), BufferAction::Reuse);
    }

    #[test]
    fn wrap_around_renames_buffer_in_flight() {
        let step = cursor(CLEAR_SIZE + GROW_SIZE, 10_000, 200).plan(100);
        assert_eq!(
            plan_append(status(CLEAR_SIZE + GROW_SIZE, true), &step),
            BufferAction::Allocate(CLEAR_SIZE + GROW_SIZE)
        );
    }
}
