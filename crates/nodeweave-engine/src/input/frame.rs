use super::types::InputEvent;

/// Input events recorded since the previous frame, in arrival order.
///
/// Order matters to consumers: a press followed by motion is a drag, motion
/// followed by a press is not.
#[derive(Debug, Default)]
pub struct InputFrame {
    events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }
}
