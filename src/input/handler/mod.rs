//! Root orchestrator: raw input in, one serialized stream of semantic events
//! out through a single root chain.

mod dispatch;
mod exclusive;
#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use log::debug;
use tokio::runtime::Handle;
use tokio::sync::Notify;

use super::chain::InteractionChain;
use super::clock::{Clock, SystemClock};
use super::event::InteractionEvent;
use super::events::{Key, PointerInput};
use super::gesture::{Gesture, GestureTracker, InputSettings};
use super::interaction::Interaction;
use super::modifiers::{ModifierTracker, Modifiers};
use super::observer::Observable;
use super::types::ModificationKeyType;
use crate::util::lock;

pub use exclusive::{ExclusiveAdded, ExclusiveEntryInfo};

/// Undoes one registration. Returns 1 the first time it removes something
/// and 0 on every later call.
pub type Remover = Box<dyn Fn() -> usize + Send + Sync>;

#[derive(Debug, Default)]
struct DispatchState {
    running: bool,
    queue: VecDeque<InteractionEvent>,
}

struct HandlerInner {
    runtime: Handle,
    clock: Arc<dyn Clock>,
    settings: Mutex<InputSettings>,
    chain: InteractionChain,
    gesture: Mutex<GestureTracker>,
    modifiers: Mutex<ModifierTracker>,
    slot: Mutex<exclusive::ExclusiveSlot>,
    dispatch: Mutex<DispatchState>,
    idle: Notify,
    exclusive_added: Observable<ExclusiveAdded>,
    exclusive_removed: Observable<()>,
    modifier_changed: Observable<ModificationKeyType>,
}

/// Turns raw pointer and keyboard signals into interaction events and
/// delivers them, one chain run at a time, to the registered interactions.
///
/// Cloning yields another handle to the same handler.
#[derive(Clone)]
pub struct EventHandler {
    inner: Arc<HandlerInner>,
}

impl EventHandler {
    /// Creates a handler whose chain runs are spawned on `runtime_handle`.
    pub fn new(settings: InputSettings, runtime_handle: &Handle) -> Self {
        Self::with_clock(settings, runtime_handle, Arc::new(SystemClock))
    }

    /// Creates a handler with a custom time source (useful for testing).
    pub fn with_clock(
        settings: InputSettings,
        runtime_handle: &Handle,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(HandlerInner {
                runtime: runtime_handle.clone(),
                clock,
                settings: Mutex::new(settings),
                chain: InteractionChain::new(),
                gesture: Mutex::new(GestureTracker::new()),
                modifiers: Mutex::new(ModifierTracker::new()),
                slot: Mutex::new(exclusive::ExclusiveSlot::default()),
                dispatch: Mutex::new(DispatchState::default()),
                idle: Notify::new(),
                exclusive_added: Observable::new(),
                exclusive_removed: Observable::new(),
                modifier_changed: Observable::new(),
            }),
        }
    }

    pub fn settings(&self) -> InputSettings {
        *lock(&self.inner.settings)
    }

    pub fn set_settings(&self, settings: InputSettings) {
        *lock(&self.inner.settings) = settings;
    }

    /// The root chain every event is piped through.
    pub fn chain(&self) -> &InteractionChain {
        &self.inner.chain
    }

    /// Fired after an exclusive interaction joined the slot.
    pub fn exclusive_added(&self) -> &Observable<ExclusiveAdded> {
        &self.inner.exclusive_added
    }

    /// Fired once whenever the slot becomes empty.
    pub fn exclusive_removed(&self) -> &Observable<()> {
        &self.inner.exclusive_removed
    }

    /// Fired with the new derived modifier after it changes.
    pub fn modifier_changed(&self) -> &Observable<ModificationKeyType> {
        &self.inner.modifier_changed
    }

    /// Registers an interaction that stays until its remover is called.
    ///
    /// Registering an instance that is already in the chain keeps its
    /// current position.
    pub fn add_persistent_interaction(
        &self,
        interaction: Arc<dyn Interaction>,
        index: Option<usize>,
    ) -> Remover {
        let id = interaction.id();
        if self.inner.chain.add(interaction, index) {
            debug!("Persistent interaction {id} registered");
        }

        let weak = Arc::downgrade(&self.inner);
        Box::new(move || {
            weak.upgrade()
                .map_or(0, |inner| inner.chain.remove_by_id(id))
        })
    }

    /// The modifier derived from keyboard edges.
    pub fn current_modifier(&self) -> ModificationKeyType {
        lock(&self.inner.modifiers).current()
    }

    pub fn pressed_modifiers(&self) -> Modifiers {
        lock(&self.inner.modifiers).pressed()
    }

    pub fn key_down(&self, key: Key) {
        let change = lock(&self.inner.modifiers).key_down(key);
        self.notify_modifier(change);
    }

    pub fn key_up(&self, key: Key) {
        let change = lock(&self.inner.modifiers).key_up(key);
        self.notify_modifier(change);
    }

    /// Replaces the tracked modifier state, for backends reporting the whole
    /// state at once. Notifies at most once.
    pub fn sync_modifiers(&self, modifiers: Modifiers) {
        let change = lock(&self.inner.modifiers).apply(modifiers);
        self.notify_modifier(change);
    }

    /// Keyboard focus left the map; every modifier counts as released.
    pub fn focus_lost(&self) {
        self.sync_modifiers(Modifiers::new());
    }

    fn notify_modifier(&self, change: Option<ModificationKeyType>) {
        let Some(modifier) = change else {
            return;
        };
        debug!("Modifier changed to {modifier}");
        self.inner.chain.modifier_changed(modifier);
        self.inner.modifier_changed.raise(&modifier);
    }

    fn resolve_key(&self, input: &PointerInput) -> ModificationKeyType {
        input.key.unwrap_or_else(|| self.current_modifier())
    }

    pub fn pointer_down(&self, input: PointerInput) {
        let key = self.resolve_key(&input);
        let now = self.inner.clock.now();
        lock(&self.inner.gesture).on_down(now, input, key);
    }

    pub fn pointer_move(&self, input: PointerInput) {
        let key = self.resolve_key(&input);
        let now = self.inner.clock.now();
        let settings = self.settings();
        let gesture = lock(&self.inner.gesture).on_move(now, input, key, &settings);
        self.emit(gesture);
    }

    pub fn pointer_up(&self, input: PointerInput) {
        let now = self.inner.clock.now();
        let settings = self.settings();
        let gesture = lock(&self.inner.gesture).on_up(now, input, &settings);
        self.emit(gesture);
    }

    fn emit(&self, gesture: Option<Gesture>) {
        let Some(gesture) = gesture else {
            return;
        };
        let event = InteractionEvent::new(
            gesture.kind,
            gesture.pointer,
            gesture.key,
            gesture.window_position,
        );
        dispatch::start_chain(&self.inner, event);
    }

    /// True while a chain run is in flight.
    pub fn is_running(&self) -> bool {
        lock(&self.inner.dispatch).running
    }

    /// Number of events waiting for the current run to finish.
    pub fn queued_events(&self) -> usize {
        lock(&self.inner.dispatch).queue.len()
    }

    /// Resolves once no chain run is in flight and nothing is queued.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if !self.is_running() {
                return;
            }
            notified.await;
        }
    }

    /// Tears the handler down: evicts the exclusive slot, empties the chain,
    /// drops pending events and every observer.
    pub fn destroy(&self) {
        self.remove_exclusive();
        self.inner.chain.clear();
        lock(&self.inner.dispatch).queue.clear();
        *lock(&self.inner.gesture) = GestureTracker::new();
        self.inner.exclusive_added.clear();
        self.inner.exclusive_removed.clear();
        self.inner.modifier_changed.clear();
        debug!("Event handler destroyed");
    }
}
