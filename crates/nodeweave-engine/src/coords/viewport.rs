/// Drawable area in logical pixels.
///
/// Uploaded to every shape renderer as a uniform so screen-space geometry
/// can be converted to NDC in the vertex stage.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Uniform payload, clamped so shaders never divide by zero.
    #[inline]
    pub fn clamped(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }
}
