//! Color model shared between the graph painter and renderers.
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
