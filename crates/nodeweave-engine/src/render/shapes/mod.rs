//! Shape renderers.
//!
//! Invoke order used by the studio: lines, rects, circles, text.

mod common;

pub mod circle;
pub mod line;
pub mod rect;
pub mod text;

pub use circle::CircleRenderer;
pub use line::LineRenderer;
pub use rect::RectRenderer;
pub use text::TextRenderer;
