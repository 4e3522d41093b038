//! Input disambiguation and interaction dispatch.
//!
//! This module translates raw pointer and keyboard signals into semantic
//! interaction events (click, double click, the drag lifecycle, move) and
//! routes them, one chain run at a time, through the registered tools.

pub mod chain;
pub mod clock;
pub mod event;
pub mod events;
pub mod gesture;
pub mod handler;
pub mod interaction;
pub mod modifiers;
pub mod observer;
pub mod recorder;
pub mod types;

// Re-export commonly used types at module level
pub use chain::InteractionChain;
pub use clock::{Clock, ManualClock, SystemClock};
pub use event::InteractionEvent;
pub use events::{Key, MouseButton, PointerInput};
pub use gesture::InputSettings;
pub use handler::{EventHandler, ExclusiveAdded, Remover};
pub use interaction::{Interaction, InteractionBase, InteractionError, InteractionId};
pub use modifiers::Modifiers;
pub use observer::{ListenerRemover, Observable};
pub use recorder::{EventRecorder, RecordedEvent};
pub use types::{EventType, ModificationKeyType, PointerKeyType, WindowPosition};
