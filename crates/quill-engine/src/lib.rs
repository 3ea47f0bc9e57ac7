//! Quill engine crate.
//!
//! Brush/pen rendering helpers over wgpu (meshes, render contexts,
//! render-target swapping, cameras) plus the window runtime the samples run on.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod camera;
pub mod render;
pub mod paint;
