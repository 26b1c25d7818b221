use std::collections::HashSet;

use super::types::Key;

/// Per-frame input deltas.
///
/// `InputState` answers "is it held"; `InputFrame` answers "what changed
/// since the last frame".
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys that went down this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys that went up this frame.
    pub keys_released: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }
}
