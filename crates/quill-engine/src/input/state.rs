use std::collections::HashSet;

use glam::Vec2;

use super::event::{ButtonState, InputEvent, Key, MouseButton};

/// Transitions recorded during one frame; cleared by the runtime after each frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }

    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}

/// Current input state of a window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies `ev` and records the resulting transitions in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases are not delivered to unfocused windows.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some(Vec2::new(x, y)),
            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, .. } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        frame.buttons_released.insert(button);
                    }
                }
            },
        }
    }

    /// Records a pointer position set by the application (cursor warp).
    pub fn warp_pointer(&mut self, pos: Vec2) {
        self.pointer_pos = Some(pos);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    #[test]
    fn key_press_is_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::W, ButtonState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, key(Key::W, ButtonState::Pressed));

        assert!(state.key_down(Key::W));
        assert!(!frame.key_pressed(Key::W));
    }

    #[test]
    fn release_clears_key() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Escape, ButtonState::Pressed));
        state.apply_event(&mut frame, key(Key::Escape, ButtonState::Released));

        assert!(!state.key_down(Key::Escape));
        assert!(frame.key_pressed(Key::Escape));
        assert!(frame.keys_released.contains(&Key::Escape));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, ButtonState::Pressed));
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
            },
        );
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(state.keys_down.is_empty());
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn pointer_tracks_moves_and_warps() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 3.0, y: 4.0 });
        assert_eq!(state.pointer_pos, Some(Vec2::new(3.0, 4.0)));

        state.warp_pointer(Vec2::new(100.0, 50.0));
        assert_eq!(state.pointer_pos, Some(Vec2::new(100.0, 50.0)));

        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }
}
