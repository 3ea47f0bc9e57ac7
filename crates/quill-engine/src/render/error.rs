use thiserror::Error;

use super::mesh::PrimitiveType;

/// Errors raised while building or updating meshes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("{primitive_type:?} cannot be built from {count} vertices: {reason}")]
    InvalidVertexCount {
        primitive_type: PrimitiveType,
        count: u32,
        reason: &'static str,
    },

    #[error("dynamic meshes need at least one vertex to be created from data")]
    EmptyVertices,

    #[error("primitive range {start}+{count} exceeds the {available} primitives of the mesh")]
    RangeOutOfBounds { start: u32, count: u32, available: u32 },
}

/// Errors raised by the render context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("render context is already attached")]
    AlreadyAttached,

    #[error("render context is not attached")]
    NotAttached,

    #[error("either a brush, a pen or both must be given; nothing would be drawn")]
    NoBrushOrPen,

    #[error("no frame is being recorded; call begin_frame first")]
    NoActiveFrame,

    #[error("a frame is already being recorded")]
    FrameAlreadyActive,

    #[error("the bound render target cannot be sampled while drawing into it")]
    TargetBoundAsTexture,

    #[error("{pixels} pixels cannot fill a {width}x{height} texture")]
    InvalidTextureData { width: u32, height: u32, pixels: usize },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}
