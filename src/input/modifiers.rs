//! Keyboard modifier state tracking.

use super::events::Key;
use super::types::ModificationKeyType;

/// Keyboard modifier state.
///
/// Tracks which modifier keys (Shift, Alt, Ctrl) are currently pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    /// Creates a new Modifiers instance with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Determines the single modifier an event is tagged with.
    ///
    /// # Priority
    /// 1. Shift
    /// 2. Alt
    /// 3. Ctrl
    /// 4. None
    pub fn modification_key(&self) -> ModificationKeyType {
        if self.shift {
            ModificationKeyType::SHIFT
        } else if self.alt {
            ModificationKeyType::ALT
        } else if self.ctrl {
            ModificationKeyType::CTRL
        } else {
            ModificationKeyType::NONE
        }
    }

    /// Records a key edge. Returns false for keys that are not modifiers.
    fn set(&mut self, key: Key, pressed: bool) -> bool {
        match key {
            Key::Shift => self.shift = pressed,
            Key::Alt => self.alt = pressed,
            Key::Ctrl => self.ctrl = pressed,
            _ => return false,
        }
        true
    }
}

/// Derives modifier transitions from raw key edges.
///
/// Only changes of the derived [`ModificationKeyType`] are reported, so
/// pressing a second modifier while a stronger one is held, or releasing a
/// weaker one, produces no transition.
#[derive(Debug, Default)]
pub struct ModifierTracker {
    pressed: Modifiers,
    current: ModificationKeyType,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ModificationKeyType {
        self.current
    }

    pub fn pressed(&self) -> Modifiers {
        self.pressed
    }

    pub fn key_down(&mut self, key: Key) -> Option<ModificationKeyType> {
        if !self.pressed.set(key, true) {
            return None;
        }
        self.reevaluate()
    }

    pub fn key_up(&mut self, key: Key) -> Option<ModificationKeyType> {
        if !self.pressed.set(key, false) {
            return None;
        }
        self.reevaluate()
    }

    /// Replaces the whole pressed state at once.
    pub fn apply(&mut self, modifiers: Modifiers) -> Option<ModificationKeyType> {
        self.pressed = modifiers;
        self.reevaluate()
    }

    fn reevaluate(&mut self) -> Option<ModificationKeyType> {
        let next = self.pressed.modification_key();
        if next == self.current {
            None
        } else {
            self.current = next;
            Some(next)
        }
    }
}
