//! Brush/pen rendering layer over wgpu.
//!
//! Meshes hold vertex buffers, brushes and pens configure a [`BasicEffect`]
//! per draw, and a [`RenderContext`] records the resulting passes.
//!
//! Convention:
//! - World space is right-handed; matrices follow `glam` (column vectors).
//! - Front faces are wound clockwise on screen.
//! - [`RenderContextExt::draw_texture`] takes pixel rectangles (top-left origin, +Y down).

mod brush;
mod context;
mod effect;
mod error;
mod frame;
pub mod mesh;
mod pen;
mod pipeline;
mod resources;
mod state;
mod target;
mod texture;
mod uniforms;

pub use brush::{Brush, SolidColorBrush, TextureBrush, TextureColorBrush, VertexColorBrush};
pub use context::{ContextConfig, DefaultRenderContext, RenderContext};
pub use effect::{
    BasicEffect, BlendMode, CullMode, DepthState, FillMode, RasterizerState,
    SamplerState, TextureFilter,
};
pub use error::{MeshError, RenderError};
pub use frame::FrameSerial;
pub use pen::{Pen, SolidColorPen, VertexColorPen};
pub use pipeline::DEPTH_FORMAT;
pub use resources::RenderResources;
pub use target::{BackBufferSwapUsage, RenderContextExt, RenderTargetScope, SwapPlan};
pub use texture::{RenderTarget2D, Texture2D, TextureId, TEXTURE_FORMAT};
