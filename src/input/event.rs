//! The mutable record passed through one interaction chain run.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::observer::Observable;
use super::types::{EventType, ModificationKeyType, PointerKeyType, WindowPosition};

/// Opaque payload attached by picking collaborators.
pub type Feature = Arc<dyn Any + Send + Sync>;

/// A semantic interaction event.
///
/// Created fresh for every classified gesture and dropped once its
/// `chain_ended` listeners have run. Fields beyond the gesture description
/// (`position`, `feature`, `attributes`) are never read by the dispatcher;
/// interactions earlier in the chain fill them for interactions later on.
pub struct InteractionEvent {
    pub kind: EventType,
    pub pointer: PointerKeyType,
    pub key: ModificationKeyType,
    pub window_position: WindowPosition,
    /// Set by an interaction to skip every later member of the chain.
    pub stop_propagation: bool,
    /// Fired once after the chain run for this event settles.
    pub chain_ended: Observable<()>,
    /// World position under the pointer, when a picking interaction found one.
    pub position: Option<[f64; 3]>,
    pub feature: Option<Feature>,
    pub attributes: HashMap<String, serde_json::Value>,
}

impl InteractionEvent {
    pub fn new(
        kind: EventType,
        pointer: PointerKeyType,
        key: ModificationKeyType,
        window_position: WindowPosition,
    ) -> Self {
        Self {
            kind,
            pointer,
            key,
            window_position,
            stop_propagation: false,
            chain_ended: Observable::new(),
            position: None,
            feature: None,
            attributes: HashMap::new(),
        }
    }

    /// Downcasts the attached feature.
    pub fn feature_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.feature.as_deref().and_then(|feature| feature.downcast_ref())
    }
}

impl fmt::Debug for InteractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionEvent")
            .field("kind", &self.kind)
            .field("pointer", &self.pointer)
            .field("key", &self.key)
            .field("window_position", &self.window_position)
            .field("stop_propagation", &self.stop_propagation)
            .field("position", &self.position)
            .field("has_feature", &self.feature.is_some())
            .finish()
    }
}
