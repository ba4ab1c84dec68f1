//! Font loading and text measurement.
//!
//! Rasterization lives in `render::shapes::text`; this module only owns the
//! parsed fonts so the graph painter can measure labels for layout.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
