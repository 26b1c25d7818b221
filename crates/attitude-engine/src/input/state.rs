use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current keyboard state for the window.
///
/// Level-triggered queries (`key_down`) read from here; transitions are
/// recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Folds one event into the held state and records deltas into `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(true) => {}

            InputEvent::Focused(false) => {
                // Release events are not delivered after focus loss.
                frame.keys_released.extend(self.keys_down.drain());
            }

            InputEvent::Key { key, state: KeyState::Pressed } => {
                // OS key-repeat arrives as another press of a held key.
                if self.keys_down.insert(key) {
                    frame.keys_pressed.insert(key);
                }
            }

            InputEvent::Key { key, state: KeyState::Released } => {
                if self.keys_down.remove(&key) {
                    frame.keys_released.insert(key);
                }
            }
        }
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state }
    }

    #[test]
    fn press_and_release_track_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed));
        assert!(state.key_down(Key::ArrowUp));
        assert!(frame.keys_pressed.contains(&Key::ArrowUp));

        frame.clear();
        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Released));
        assert!(!state.key_down(Key::ArrowUp));
        assert!(frame.keys_released.contains(&Key::ArrowUp));
    }

    #[test]
    fn repeat_does_not_record_a_second_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Pressed));

        assert!(state.key_down(Key::ArrowLeft));
        assert!(frame.keys_pressed.is_empty());
    }

    #[test]
    fn held_keys_survive_frame_clear() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::ArrowRight, KeyState::Pressed));
        frame.clear();
        assert!(state.key_down(Key::ArrowRight));
    }

    #[test]
    fn release_of_unheld_key_is_ignored() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Escape, KeyState::Released));
        assert!(frame.keys_released.is_empty());
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Focused(true));
        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed));
        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Pressed));
        frame.clear();

        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());
        assert_eq!(frame.keys_released.len(), 2);
    }
}
