//! Click, double-click and drag classification.
//!
//! Raw downs, moves and ups go in; at most one classified gesture comes out
//! per signal. The tracker holds only per-handler state, so independent
//! handlers never share click timing.

use std::time::{Duration, Instant};

use log::debug;

use super::events::PointerInput;
use super::types::{EventType, ModificationKeyType, PointerKeyType, WindowPosition};
use crate::config::InputConfig;

/// Timing and distance thresholds for gesture classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSettings {
    /// Maximum delay between two clicks that still forms a double click.
    pub click_duration: Duration,
    /// Time a button must be held before a move starts a drag.
    pub drag_duration: Duration,
    /// Maximum pointer travel between two clicks of a double click, in pixels.
    pub click_distance: f64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self::from(&InputConfig::default())
    }
}

impl From<&InputConfig> for InputSettings {
    fn from(cfg: &InputConfig) -> Self {
        Self {
            click_duration: Duration::from_millis(cfg.click_duration_ms),
            drag_duration: Duration::from_millis(cfg.drag_duration_ms),
            click_distance: cfg.click_distance,
        }
    }
}

/// A classified gesture, ready to become an interaction event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub kind: EventType,
    pub pointer: PointerKeyType,
    pub key: ModificationKeyType,
    pub window_position: WindowPosition,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DownRecord {
    pub time: Instant,
    pub window_position: WindowPosition,
    pub pointer: PointerKeyType,
    pub key: ModificationKeyType,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ClickRecord {
    pub time: Instant,
    pub window_position: WindowPosition,
}

/// Per-handler gesture state.
#[derive(Debug, Default)]
pub struct GestureTracker {
    pub(crate) last_down: Option<DownRecord>,
    pub(crate) last_click: Option<ClickRecord>,
    /// Set when another down arrives before the pending one is released.
    pub(crate) multiples: bool,
    /// Pointer and modifier captured by the down that started the current drag.
    pub(crate) dragging: Option<DownRecord>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between a down and its up.
    pub fn is_pressed(&self) -> bool {
        self.last_down.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn on_down(&mut self, now: Instant, input: PointerInput, key: ModificationKeyType) {
        if self.last_down.is_some() {
            debug!("Second pointer down before release; gesture will be discarded");
            self.multiples = true;
            return;
        }
        self.last_down = Some(DownRecord {
            time: now,
            window_position: input.window_position,
            pointer: input.pointer,
            key,
        });
    }

    /// Moves without a pressed button are plain `MOVE`s. While a button is
    /// held, moves are swallowed until the drag threshold elapses.
    pub fn on_move(
        &mut self,
        now: Instant,
        input: PointerInput,
        key: ModificationKeyType,
        settings: &InputSettings,
    ) -> Option<Gesture> {
        if let Some(drag) = self.dragging {
            return Some(Gesture {
                kind: EventType::DRAG,
                pointer: drag.pointer,
                key: drag.key,
                window_position: input.window_position,
            });
        }

        let Some(down) = self.last_down else {
            return Some(Gesture {
                kind: EventType::MOVE,
                pointer: input.pointer,
                key,
                window_position: input.window_position,
            });
        };

        if self.multiples || now.saturating_duration_since(down.time) <= settings.drag_duration {
            return None;
        }

        debug!("Drag started at {}", down.window_position);
        self.dragging = Some(down);
        Some(Gesture {
            kind: EventType::DRAGSTART,
            pointer: down.pointer,
            key: down.key,
            window_position: down.window_position,
        })
    }

    pub fn on_up(
        &mut self,
        now: Instant,
        input: PointerInput,
        settings: &InputSettings,
    ) -> Option<Gesture> {
        if self.multiples {
            self.last_down = None;
            self.dragging = None;
            self.multiples = false;
            return None;
        }

        if let Some(drag) = self.dragging.take() {
            self.last_down = None;
            return Some(Gesture {
                kind: EventType::DRAGEND,
                pointer: drag.pointer,
                key: drag.key,
                window_position: input.window_position,
            });
        }

        let down = self.last_down.take()?;
        let position = input.window_position;
        let is_double = self.last_click.is_some_and(|click| {
            now.saturating_duration_since(click.time) <= settings.click_duration
                && position.distance_to(click.window_position) <= settings.click_distance
        });

        let kind = if is_double {
            self.last_click = None;
            EventType::DBLCLICK
        } else {
            self.last_click = Some(ClickRecord {
                time: now,
                window_position: position,
            });
            EventType::CLICK
        };

        Some(Gesture {
            kind,
            pointer: down.pointer,
            key: down.key,
            window_position: position,
        })
    }
}
