use super::frame::InputFrame;
use super::types::{InputEvent, Modifiers, PointerButtonEvent, PointerMoveEvent};

/// Input state that outlives a frame.
///
/// The platform layer reads it to fill in events that arrive without a
/// position or modifier set (wheel and button events).
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    /// Pointer position in logical pixels; `None` outside the window.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    /// Applies an input event to the current state and records it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { modifiers, .. } | InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }

            InputEvent::PointerButton(PointerButtonEvent { x, y, modifiers, .. }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
            }

            InputEvent::Resized(_) => {}
        }

        frame.push_event(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState, MouseButton, MouseButtonState, MouseWheelDelta};

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn shift() -> Modifiers {
        Modifiers { shift: true, ..Modifiers::default() }
    }

    #[test]
    fn events_are_recorded_in_order_with_repeats() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        for repeat in [false, true] {
            let ev = InputEvent::Key {
                key: Key::H,
                state: KeyState::Pressed,
                modifiers: shift(),
                repeat,
            };
            state.apply_event(&mut frame, ev);
        }

        assert_eq!(frame.events.len(), 2);
        assert!(matches!(frame.events[1], InputEvent::Key { repeat: true, .. }));
        assert!(state.modifiers.shift);
    }

    #[test]
    fn pointer_position_follows_moves_buttons_and_leave() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, moved(1.0, 2.0));
        assert_eq!(state.pointer_pos, Some((1.0, 2.0)));

        state.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x: 3.0,
                y: 4.0,
                modifiers: Modifiers::default(),
            }),
        );
        assert_eq!(state.pointer_pos, Some((3.0, 4.0)));

        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn clear_drops_events_but_keeps_state() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, moved(1.0, 2.0));
        state.apply_event(
            &mut frame,
            InputEvent::MouseWheel {
                delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
                modifiers: shift(),
            },
        );

        frame.clear();
        assert!(frame.is_empty());
        assert!(state.modifiers.shift);
        assert_eq!(state.pointer_pos, Some((1.0, 2.0)));
    }
}
