//! The contract every pluggable tool implements.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use thiserror::Error;

use super::event::InteractionEvent;
use super::types::{EventType, ModificationKeyType, PointerKeyType, matches};
use crate::util::lock;

/// Process-unique identity of an interaction instance.
pub type InteractionId = u64;

static NEXT_INTERACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Errors an interaction may reject a chain run with.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("interaction failed: {0}")]
    Failed(String),

    #[error("interaction panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A pluggable handler for semantic interaction events.
///
/// `pipe` is only invoked by a chain when [`Interaction::matches`] accepts
/// the event; an interaction that does not match sees nothing and therefore
/// cannot alter the event or stop its propagation.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Registration state (identity, masks and their defaults).
    fn base(&self) -> &InteractionBase;

    /// Handles one event. Implementations may mutate the event and set
    /// `stop_propagation` to keep it from later chain members.
    async fn pipe(&self, event: &mut InteractionEvent) -> Result<(), InteractionError>;

    /// Called when the handler's derived modifier changes while this
    /// interaction is registered.
    fn modifier_changed(&self, _modifier: ModificationKeyType) {}

    fn id(&self) -> InteractionId {
        self.base().id()
    }

    fn matches(&self, event: &InteractionEvent) -> bool {
        self.base().matches(event)
    }
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    active: EventType,
    pointer_key: PointerKeyType,
    modification_key: ModificationKeyType,
    default_active: EventType,
    default_pointer_key: PointerKeyType,
    default_modification_key: ModificationKeyType,
}

/// Identity plus the active/pointer/modifier masks of an interaction.
///
/// Setters take `&self`: masks are switched from UI code while the
/// interaction sits in a chain that may be dispatching.
#[derive(Debug)]
pub struct InteractionBase {
    id: InteractionId,
    registration: Mutex<Registration>,
}

impl InteractionBase {
    /// Active for `default_active` on the left button without modifiers.
    pub fn new(default_active: EventType) -> Self {
        Self::with_defaults(
            default_active,
            PointerKeyType::LEFT,
            ModificationKeyType::NONE,
        )
    }

    /// Starts with the given defaults already in effect.
    pub fn with_defaults(
        default_active: EventType,
        default_pointer_key: PointerKeyType,
        default_modification_key: ModificationKeyType,
    ) -> Self {
        Self {
            id: NEXT_INTERACTION_ID.fetch_add(1, Ordering::Relaxed),
            registration: Mutex::new(Registration {
                active: default_active,
                pointer_key: default_pointer_key,
                modification_key: default_modification_key,
                default_active,
                default_pointer_key,
                default_modification_key,
            }),
        }
    }

    /// Matches every event regardless of button or modifier.
    pub fn passthrough() -> Self {
        Self::with_defaults(EventType::ALL, PointerKeyType::ALL, ModificationKeyType::ALL)
    }

    pub fn id(&self) -> InteractionId {
        self.id
    }

    pub fn active(&self) -> EventType {
        lock(&self.registration).active
    }

    pub fn pointer_key(&self) -> PointerKeyType {
        lock(&self.registration).pointer_key
    }

    pub fn modification_key(&self) -> ModificationKeyType {
        lock(&self.registration).modification_key
    }

    pub fn default_active(&self) -> EventType {
        lock(&self.registration).default_active
    }

    pub fn matches(&self, event: &InteractionEvent) -> bool {
        let registration = *lock(&self.registration);
        matches(registration.active, event.kind)
            && matches(registration.pointer_key, event.pointer)
            && matches(registration.modification_key, event.key)
    }

    /// Listens for exactly `mask`.
    pub fn set_active(&self, mask: EventType) {
        lock(&self.registration).active = mask;
    }

    /// `true` restores the default mask, `false` deactivates.
    pub fn toggle_active(&self, on: bool) {
        let mut registration = lock(&self.registration);
        registration.active = if on {
            registration.default_active
        } else {
            EventType::NONE
        };
    }

    /// Deactivates and restores the default modifier.
    ///
    /// The default is `NONE` for [`InteractionBase::new`]; an interaction
    /// built with [`InteractionBase::with_defaults`] returns to its own
    /// default modifier instead.
    pub fn reset_active(&self) {
        let mut registration = lock(&self.registration);
        registration.active = EventType::NONE;
        registration.modification_key = registration.default_modification_key;
    }

    /// `None` restores the default modifier: `NONE`, or the modifier passed
    /// to [`InteractionBase::with_defaults`].
    pub fn set_modification(&self, key: Option<ModificationKeyType>) {
        let mut registration = lock(&self.registration);
        registration.modification_key = key.unwrap_or(registration.default_modification_key);
    }

    /// `None` restores the default pointer (`LEFT` unless configured).
    pub fn set_pointer(&self, key: Option<PointerKeyType>) {
        let mut registration = lock(&self.registration);
        registration.pointer_key = key.unwrap_or(registration.default_pointer_key);
    }
}
