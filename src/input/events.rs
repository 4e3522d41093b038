//! Raw input signals delivered by a windowing backend.

use serde::{Deserialize, Serialize};

use super::types::{ModificationKeyType, PointerKeyType, WindowPosition};

/// Generic key representation for cross-backend compatibility.
///
/// Backends map their native key codes to these values. Only the modifier
/// keys influence dispatch; everything else is accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    Shift,
    Ctrl,
    Alt,
    /// Unmapped or unrecognized key
    Unknown,
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<MouseButton> for PointerKeyType {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerKeyType::LEFT,
            MouseButton::Right => PointerKeyType::RIGHT,
            MouseButton::Middle => PointerKeyType::MIDDLE,
        }
    }
}

/// One raw pointer down, move or up signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub window_position: WindowPosition,
    pub pointer: PointerKeyType,
    /// Modifier reported with the signal. `None` means "use the modifier
    /// state tracked from keyboard edges".
    pub key: Option<ModificationKeyType>,
}

impl PointerInput {
    pub fn new(button: MouseButton, x: f64, y: f64) -> Self {
        Self {
            window_position: WindowPosition::new(x, y),
            pointer: button.into(),
            key: None,
        }
    }

    pub fn with_pointer(mut self, pointer: PointerKeyType) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_key(mut self, key: ModificationKeyType) -> Self {
        self.key = Some(key);
        self
    }
}
