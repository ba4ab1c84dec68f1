use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

impl FontId {
    /// Handle for the `index`-th font loaded into a [`FontSystem`].
    ///
    /// Handles are load-order indices; a handle with no loaded font is
    /// skipped by the text renderer and measures as an empty string.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. The system is owned by the application
/// and passed to `TextRenderer::render` each frame so new glyphs can be
/// rasterized on demand.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font {:?} ({} bytes)", id, bytes.len());
        Ok(id)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Computes the bounding box of a laid-out single-line string.
    ///
    /// Returns `(width, height)` in the same unit as `size`. Unknown fonts and
    /// empty strings measure as zero width with a nominal line height.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32) -> Vec2 {
        let Some(font) = self.get(id) else {
            return Vec2::new(0.0, size * 1.2);
        };
        if size <= 0.0 {
            return Vec2::zero();
        }

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, size, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::new(0.0, size * 1.2);
        }

        // Pen position after each glyph rather than the bitmap's right edge,
        // so trailing spaces and side bearings are included.
        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = glyphs.iter().map(|g| g.y + g.height as f32).fold(size, f32::max);
        Vec2::new(w, h)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_font(b"definitely not a font").unwrap_err();
        assert!(err.to_string().starts_with("font load error"));
    }

    #[test]
    fn unknown_font_measures_nominal_height() {
        let fonts = FontSystem::new();
        let m = fonts.measure_text("abc", FontId(3), 10.0);
        assert_eq!(m.x, 0.0);
        assert!((m.y - 12.0).abs() < 1e-4);
    }
}
