use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

/// Current input state for a single window.
///
/// Holds "is down" information and the current pointer position. Events are
/// forwarded to an [`InputFrame`] only when they represent a real transition.
#[derive(Debug, Default)]
pub struct InputState {
    /// Last known pointer position in logical pixels; `None` until the
    /// pointer first enters. Kept after it leaves so late releases land where
    /// the pointer was last seen.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an input event to the current state and records it in `frame`.
    ///
    /// Releases of buttons that were never seen pressed (the press happened
    /// outside the window) and repeated presses are dropped.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        let forward = match &ev {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
                true
            }

            InputEvent::PointerLeft => true,

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y }) => {
                self.pointer_pos = Some((*x, *y));
                match state {
                    MouseButtonState::Pressed => self.buttons_down.insert(*button),
                    MouseButtonState::Released => self.buttons_down.remove(button),
                }
            }

            InputEvent::MouseWheel { .. } => true,
        };

        if forward {
            frame.push_event(ev);
        }
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(button: MouseButton, state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent { button, state, x: 4.0, y: 5.0 })
    }

    #[test]
    fn press_then_release_are_both_forwarded() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, button(MouseButton::Left, MouseButtonState::Pressed));
        assert!(state.button_down(MouseButton::Left));
        state.apply_event(&mut frame, button(MouseButton::Left, MouseButtonState::Released));

        assert_eq!(frame.events().len(), 2);
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn orphan_release_is_dropped() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, button(MouseButton::Middle, MouseButtonState::Released));
        assert!(frame.events().is_empty());
        assert_eq!(state.pointer_pos, Some((4.0, 5.0)));
    }

    #[test]
    fn pointer_left_keeps_last_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        state.apply_event(&mut frame, button(MouseButton::Left, MouseButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::PointerMoved(PointerMoveEvent { x: 790.0, y: 300.0 }));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, Some((790.0, 300.0)));
        assert_eq!(frame.events().len(), 4);

        // A release delivered after leaving is still forwarded, at the last known spot.
        state.apply_event(&mut frame, button(MouseButton::Left, MouseButtonState::Released));
        assert!(!state.button_down(MouseButton::Left));
        assert_eq!(frame.events().len(), 5);
    }
}
