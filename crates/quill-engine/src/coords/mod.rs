//! Screen-space geometry shared by the render context and cameras.
//!
//! Canonical pixel space:
//! - physical pixels of the bound render target
//! - origin top-left
//! - +X right, +Y down
//!
//! Clip space (x, y in `[-1, 1]`, +Y up) is reached through [`Viewport`].

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
