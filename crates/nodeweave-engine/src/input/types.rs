/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input; `Pixel` is high precision.
/// Positive `y` means the wheel moved up / away from the user.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Vertical component regardless of unit.
    #[inline]
    pub fn vertical(self) -> f32 {
        match self {
            MouseWheelDelta::Line { y, .. } | MouseWheelDelta::Pixel { y, .. } => y,
        }
    }
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Pointer button event.
///
/// Carries the pointer position at the time of the press/release so the
/// consumer does not depend on a separately tracked cursor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),
    MouseWheel { delta: MouseWheelDelta },

    /// Pointer left the window surface.
    PointerLeft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_ignores_unit() {
        assert_eq!(MouseWheelDelta::Line { x: 0.0, y: 1.0 }.vertical(), 1.0);
        assert_eq!(MouseWheelDelta::Pixel { x: 3.0, y: -12.5 }.vertical(), -12.5);
    }
}
