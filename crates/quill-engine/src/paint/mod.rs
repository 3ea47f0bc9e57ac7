//! Color model shared by brushes, pens and clears.
//!
//! Colors are stored premultiplied; conversions to straight bytes (vertex colors,
//! texture uploads) and straight `Vec3` (effect diffuse color) live on [`Color`].

pub mod color;

pub use color::Color;
