use crate::render::error::MeshError;

/// How consecutive vertices are assembled into primitives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

impl PrimitiveType {
    pub(crate) fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveType::LineList => wgpu::PrimitiveTopology::LineList,
            PrimitiveType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveType::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }

    #[inline]
    pub fn is_triangles(self) -> bool {
        matches!(self, PrimitiveType::TriangleList | PrimitiveType::TriangleStrip)
    }
}

/// Number of primitives described by `vertex_count` vertices.
///
/// Zero vertices always yield zero primitives.
pub fn primitive_count(primitive_type: PrimitiveType, vertex_count: u32) -> Result<u32, MeshError> {
    if vertex_count == 0 {
        return Ok(0);
    }

    let invalid = |reason| MeshError::InvalidVertexCount {
        primitive_type,
        count: vertex_count,
        reason,
    };

    match primitive_type {
        PrimitiveType::LineList => {
            if vertex_count % 2 != 0 {
                return Err(invalid("line lists need a multiple of 2 vertices"));
            }
            Ok(vertex_count / 2)
        }
        // A single vertex is accepted and draws nothing.
        PrimitiveType::LineStrip => Ok(vertex_count - 1),
        PrimitiveType::TriangleList => {
            if vertex_count % 3 != 0 {
                return Err(invalid("triangle lists need a multiple of 3 vertices"));
            }
            Ok(vertex_count / 3)
        }
        PrimitiveType::TriangleStrip => {
            if vertex_count < 3 {
                return Err(invalid("triangle strips need at least 3 vertices"));
            }
            Ok(vertex_count - 2)
        }
    }
}

/// Vertices consumed by `primitives` consecutive primitives.
pub fn vertex_count(primitive_type: PrimitiveType, primitives: u32) -> u32 {
    if primitives == 0 {
        return 0;
    }
    match primitive_type {
        PrimitiveType::LineList => primitives * 2,
        PrimitiveType::LineStrip => primitives + 1,
        PrimitiveType::TriangleList => primitives * 3,
        PrimitiveType::TriangleStrip => primitives + 2,
    }
}

/// Index of the first vertex of primitive `primitive`.
pub fn first_vertex(primitive_type: PrimitiveType, primitive: u32) -> u32 {
    match primitive_type {
        PrimitiveType::LineList => primitive * 2,
        PrimitiveType::TriangleList => primitive * 3,
        PrimitiveType::LineStrip | PrimitiveType::TriangleStrip => primitive,
    }
}
