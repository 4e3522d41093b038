//! Scripted raw-input sessions.
//!
//! A replay script is a TOML list of timestamped raw signals:
//!
//! ```toml
//! [[steps]]
//! at_ms = 0
//! action = "down"
//! x = 1.0
//! y = 1.0
//!
//! [[steps]]
//! at_ms = 20
//! action = "up"
//! x = 1.0
//! y = 1.0
//! ```
//!
//! Each step is fed to a real [`EventHandler`] driven by a [`ManualClock`],
//! and the classified events are collected in dispatch order.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;

use crate::input::{
    EventHandler, EventRecorder, InputSettings, Key, ManualClock, MouseButton, PointerInput,
    RecordedEvent,
};

/// Errors raised while loading or running a replay script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read replay script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse replay script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Step {index} ({action:?}) is missing `{field}`")]
    MissingField {
        index: usize,
        action: StepAction,
        field: &'static str,
    },

    #[error("Step {index} goes back in time ({at_ms} ms < {previous_ms} ms)")]
    NonMonotonic {
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepAction {
    Down,
    Up,
    Move,
    KeyDown,
    KeyUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierName {
    Shift,
    Alt,
    Ctrl,
}

impl From<ModifierName> for Key {
    fn from(name: ModifierName) -> Self {
        match name {
            ModifierName::Shift => Key::Shift,
            ModifierName::Alt => Key::Alt,
            ModifierName::Ctrl => Key::Ctrl,
        }
    }
}

/// One raw signal at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayStep {
    /// Milliseconds since the start of the session.
    pub at_ms: u64,
    pub action: StepAction,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    /// Pointer button; defaults to `left`.
    #[serde(default)]
    pub button: Option<MouseButton>,
    /// Modifier key for `key-down` / `key-up`.
    #[serde(default)]
    pub key: Option<ModifierName>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

/// An event as seen at the end of the chain, with the script time it was
/// triggered at.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: RecordedEvent,
}

impl ReplayScript {
    pub fn from_toml(source: &str) -> Result<Self, ReplayError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Checks ordering and required fields without running anything.
    pub fn validate(&self) -> Result<(), ReplayError> {
        let mut previous_ms = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at_ms < previous_ms {
                return Err(ReplayError::NonMonotonic {
                    index,
                    at_ms: step.at_ms,
                    previous_ms,
                });
            }
            previous_ms = step.at_ms;
            match step.action {
                StepAction::Down | StepAction::Up | StepAction::Move => {
                    step.pointer_input(index)?;
                }
                StepAction::KeyDown | StepAction::KeyUp => {
                    step.modifier(index)?;
                }
            }
        }
        Ok(())
    }

    /// Feeds every step through a fresh handler and returns what reached the
    /// end of its chain.
    ///
    /// Each step waits for the chain to go idle before the next one, so a
    /// script never loses `MOVE` events to a busy pipeline.
    pub async fn run(
        &self,
        settings: InputSettings,
        runtime: &Handle,
    ) -> Result<Vec<ReplayedEvent>, ReplayError> {
        self.validate()?;

        let clock = Arc::new(ManualClock::new());
        let handler = EventHandler::with_clock(settings, runtime, clock.clone());
        let recorder = Arc::new(EventRecorder::new());
        let _ = handler.add_persistent_interaction(recorder.clone(), None);

        let mut replayed = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            clock.set(Duration::from_millis(step.at_ms));
            debug!("Replaying step {index}: {:?} at {} ms", step.action, step.at_ms);
            match step.action {
                StepAction::Down => handler.pointer_down(step.pointer_input(index)?),
                StepAction::Up => handler.pointer_up(step.pointer_input(index)?),
                StepAction::Move => handler.pointer_move(step.pointer_input(index)?),
                StepAction::KeyDown => handler.key_down(step.modifier(index)?.into()),
                StepAction::KeyUp => handler.key_up(step.modifier(index)?.into()),
            }
            handler.wait_idle().await;
            replayed.extend(recorder.take().into_iter().map(|event| ReplayedEvent {
                at_ms: step.at_ms,
                event,
            }));
        }

        handler.destroy();
        Ok(replayed)
    }
}

impl ReplayStep {
    fn pointer_input(&self, index: usize) -> Result<PointerInput, ReplayError> {
        let missing = |field| ReplayError::MissingField {
            index,
            action: self.action,
            field,
        };
        let x = self.x.ok_or_else(|| missing("x"))?;
        let y = self.y.ok_or_else(|| missing("y"))?;
        Ok(PointerInput::new(
            self.button.unwrap_or(MouseButton::Left),
            x,
            y,
        ))
    }

    fn modifier(&self, index: usize) -> Result<ModifierName, ReplayError> {
        self.key.ok_or(ReplayError::MissingField {
            index,
            action: self.action,
            field: "key",
        })
    }
}
