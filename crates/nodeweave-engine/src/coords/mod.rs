//! Coordinate and geometry types shared across renderers and the graph editor.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware) for screen space
//! - Origin top-left
//! - +X right, +Y down
//!
//! World space uses the same axis orientation; the graph camera maps between
//! the two. Renderers convert screen space to NDC in shaders using a viewport
//! uniform.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
