use std::collections::HashSet;

use strum::Display;
use strum::EnumString;

/// The logical keys the game reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Jump,
    /// Restart from the game over and clear screens.
    Confirm,
}

/// Keyboard state for the current frame, provided by the host.
pub trait InputSource {
    /// Is the key down this frame?
    fn is_held(&self, key: Key) -> bool;
    /// Did the key go down this frame?
    fn was_pressed(&self, key: Key) -> bool;
}

/// Input driven by code. Presses last until `next_frame`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl ScriptedInput {
    pub fn hold(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn next_frame(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for ScriptedInput {
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}
