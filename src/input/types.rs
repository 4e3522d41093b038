//! Bit-flag types describing semantic events, pointer buttons and modifiers.
//!
//! Interactions declare masks of these flags; an event matches an
//! interaction when every one of its own single-bit values intersects the
//! corresponding mask.

use bitflags::{Flags, bitflags};
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Kind of semantic interaction event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EventType: u32 {
        /// Matches nothing.
        const NONE = 0;
        const CLICK = 1;
        const DBLCLICK = 1 << 1;
        const DRAGSTART = 1 << 2;
        const DRAG = 1 << 3;
        const DRAGEND = 1 << 4;
        const MOVE = 1 << 5;

        const CLICKMOVE = Self::CLICK.bits() | Self::MOVE.bits();
        const DRAGEVENTS = Self::DRAGSTART.bits() | Self::DRAG.bits() | Self::DRAGEND.bits();
        const CLICKMOVEDRAG = Self::CLICKMOVE.bits() | Self::DRAGEVENTS.bits();
        const ALL = Self::CLICKMOVEDRAG.bits() | Self::DBLCLICK.bits();
    }
}

bitflags! {
    /// Pointer button an event was produced with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PointerKeyType: u8 {
        const LEFT = 1;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        /// Sentinel that matches every button.
        const ALL = Self::LEFT.bits() | Self::RIGHT.bits() | Self::MIDDLE.bits();
    }
}

bitflags! {
    /// Active modifier key.
    ///
    /// An event carries exactly one of `NONE`, `ALT`, `CTRL` or `SHIFT`.
    /// `NONE` is a real bit so that an interaction declared for "no modifier"
    /// only matches unmodified events; `ALL` matches any modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ModificationKeyType: u8 {
        const NONE = 1;
        const ALT = 1 << 1;
        const CTRL = 1 << 2;
        const SHIFT = 1 << 3;
        const ALL = Self::NONE.bits() | Self::ALT.bits() | Self::CTRL.bits() | Self::SHIFT.bits();
    }
}

impl Default for EventType {
    fn default() -> Self {
        Self::NONE
    }
}

impl Default for PointerKeyType {
    fn default() -> Self {
        Self::LEFT
    }
}

impl Default for ModificationKeyType {
    fn default() -> Self {
        Self::NONE
    }
}

/// Returns true when `value` shares at least one bit with `mask`.
///
/// An empty mask never matches.
pub fn matches<F: Flags>(mask: F, value: F) -> bool {
    mask.intersects(value)
}

/// Renders a flag set as `A|B`, or `NONE` when it is empty.
fn write_names<F: Flags>(flags: &F, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let names: Vec<&str> = flags.iter_names().map(|(name, _)| name).collect();
    if names.is_empty() {
        f.write_str("NONE")
    } else {
        f.write_str(&names.join("|"))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_names(self, f)
    }
}

impl fmt::Display for PointerKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_names(self, f)
    }
}

impl fmt::Display for ModificationKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_names(self, f)
    }
}

/// Window-relative pointer coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: f64,
    pub y: f64,
}

impl WindowPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: WindowPosition) -> f64 {
        crate::util::distance((self.x, self.y), (other.x, other.y))
    }
}

impl fmt::Display for WindowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
