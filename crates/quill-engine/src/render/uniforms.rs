use super::effect::EffectUniform;

/// Uniform slots per buffer chunk.
const SLOTS_PER_CHUNK: u32 = 256;

/// Location of one uploaded [`EffectUniform`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct UniformSlot {
    pub chunk: usize,
    pub offset: u32,
}

struct Chunk {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Per-frame bump allocator of effect uniforms.
///
/// Every draw of a frame gets its own slot so that queued uniform writes never
/// clobber values read by earlier draws of the same command buffer. Chunks are
/// kept across frames and reused after [`UniformArena::reset`].
pub(crate) struct UniformArena {
    stride: u32,
    chunks: Vec<Chunk>,
    next: u32,
}

impl UniformArena {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        Self {
            stride: align_up(std::mem::size_of::<EffectUniform>() as u32, alignment),
            chunks: Vec::new(),
            next: 0,
        }
    }

    /// Starts a new frame; previous slots may be overwritten.
    pub(crate) fn reset(&mut self) {
        self.next = 0;
    }

    pub(crate) fn push(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        uniform: &EffectUniform,
    ) -> UniformSlot {
        let slot = locate(self.next, self.stride);
        self.next += 1;

        while self.chunks.len() <= slot.chunk {
            let chunk = self.create_chunk(device, layout);
            self.chunks.push(chunk);
        }

        let chunk = &self.chunks[slot.chunk];
        queue.write_buffer(&chunk.buffer, slot.offset as u64, bytemuck::bytes_of(uniform));
        slot
    }

    pub(crate) fn bind_group(&self, slot: UniformSlot) -> Option<&wgpu::BindGroup> {
        self.chunks.get(slot.chunk).map(|c| &c.bind_group)
    }

    fn create_chunk(&self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Chunk {
        log::debug!("allocating effect uniform chunk #{}", self.chunks.len());

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quill effect uniforms"),
            size: self.stride as u64 * SLOTS_PER_CHUNK as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quill effect uniform bg"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<EffectUniform>() as u64),
                }),
            }],
        });

        Chunk { buffer, bind_group }
    }
}

#[inline]
pub(crate) fn align_up(value: u32, alignment: u32) -> u32 {
    let alignment = alignment.max(1);
    value.div_ceil(alignment) * alignment
}

/// Chunk and byte offset of the `index`-th slot.
#[inline]
pub(crate) fn locate(index: u32, stride: u32) -> UniformSlot {
    UniformSlot {
        chunk: (index / SLOTS_PER_CHUNK) as usize,
        offset: (index % SLOTS_PER_CHUNK) * stride,
    }
}
