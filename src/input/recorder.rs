//! An interaction that keeps a log of what it was piped.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use super::event::InteractionEvent;
use super::interaction::{Interaction, InteractionBase, InteractionError};
use super::types::{EventType, ModificationKeyType, PointerKeyType, WindowPosition};
use crate::util::lock;

/// Snapshot of the dispatch-relevant part of an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordedEvent {
    pub kind: EventType,
    pub pointer: PointerKeyType,
    pub key: ModificationKeyType,
    pub window_position: WindowPosition,
}

impl From<&InteractionEvent> for RecordedEvent {
    fn from(event: &InteractionEvent) -> Self {
        Self {
            kind: event.kind,
            pointer: event.pointer,
            key: event.key,
            window_position: event.window_position,
        }
    }
}

/// Records every event it matches. Matches everything by default.
pub struct EventRecorder {
    base: InteractionBase,
    events: Mutex<Vec<RecordedEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::with_base(InteractionBase::passthrough())
    }

    /// Records only what `base` matches.
    pub fn with_base(base: InteractionBase) -> Self {
        Self {
            base,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        lock(&self.events).clone()
    }

    pub fn kinds(&self) -> Vec<EventType> {
        lock(&self.events).iter().map(|event| event.kind).collect()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *lock(&self.events))
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Interaction for EventRecorder {
    fn base(&self) -> &InteractionBase {
        &self.base
    }

    async fn pipe(&self, event: &mut InteractionEvent) -> Result<(), InteractionError> {
        lock(&self.events).push(RecordedEvent::from(&*event));
        Ok(())
    }
}
