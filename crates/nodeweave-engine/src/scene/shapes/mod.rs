pub(crate) mod circle;
pub(crate) mod line;
pub(crate) mod rect;
pub(crate) mod text;

pub use circle::CircleCmd;
pub use line::LineCmd;
pub use rect::RectCmd;
pub use text::TextCmd;
