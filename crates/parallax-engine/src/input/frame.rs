use super::types::InputEvent;

/// Input events gathered since the previous frame.
///
/// `InputState` holds what persists across frames (modifiers, pointer
/// position); `InputFrame` is cleared after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
