//! Exclusive slot arbitration.
//!
//! The slot holds interactions of a single group. Registering under another
//! group evicts the whole occupant set first and tells each evicted
//! interaction through its removed callback. Within the slot, members are
//! ordered by descending priority, and the chain mirrors that order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use super::{EventHandler, HandlerInner, Remover};
use crate::input::interaction::{Interaction, InteractionId};
use crate::util::lock;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

type RemovedCallback = Arc<dyn Fn() + Send + Sync>;

/// Payload of the `exclusive_added` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveAdded {
    pub interaction: InteractionId,
    pub priority: i32,
    pub group_id: String,
}

/// Read-only view of one slot member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveEntryInfo {
    pub interaction: InteractionId,
    pub priority: i32,
    pub group_id: String,
}

struct ExclusiveEntry {
    token: u64,
    interaction: Arc<dyn Interaction>,
    removed: RemovedCallback,
    priority: i32,
    group_id: String,
    /// False when the interaction was already in the chain (e.g. persistent)
    /// before it joined the slot; leaving the slot then keeps it there.
    owns_chain_entry: bool,
}

#[derive(Default)]
pub(super) struct ExclusiveSlot {
    entries: Vec<ExclusiveEntry>,
}

impl ExclusiveSlot {
    fn group_id(&self) -> Option<&str> {
        self.entries.first().map(|entry| entry.group_id.as_str())
    }

    /// Empties the slot, returning what was in it.
    fn take(&mut self) -> Vec<ExclusiveEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Index in `entries` for a new member: after every entry of equal or
    /// higher priority.
    fn insertion_index(&self, priority: i32) -> usize {
        self.entries
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(self.entries.len())
    }

    fn position_of(&self, id: InteractionId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.interaction.id() == id)
    }
}

impl HandlerInner {
    /// Removes `evicted` from the chain and notifies each of them, then the
    /// handler's listeners. Must be called without the slot lock held.
    fn finish_eviction(&self, evicted: Vec<ExclusiveEntry>) {
        if evicted.is_empty() {
            return;
        }
        for entry in evicted.iter().filter(|entry| entry.owns_chain_entry) {
            self.chain.remove_by_id(entry.interaction.id());
        }
        for entry in &evicted {
            debug!(
                "Exclusive interaction {} evicted (group {})",
                entry.interaction.id(),
                entry.group_id
            );
            (entry.removed)();
        }
        self.exclusive_removed.raise(&());
    }

    fn remove_exclusive_entry(&self, token: u64) -> usize {
        let emptied = {
            let mut slot = lock(&self.slot);
            let Some(index) = slot.entries.iter().position(|entry| entry.token == token) else {
                return 0;
            };
            let entry = slot.entries.remove(index);
            if entry.owns_chain_entry {
                self.chain.remove_by_id(entry.interaction.id());
            }
            debug!("Exclusive interaction {} removed", entry.interaction.id());
            slot.entries.is_empty()
        };

        if emptied {
            self.exclusive_removed.raise(&());
        }
        1
    }
}

impl EventHandler {
    /// Registers an interaction in the exclusive slot.
    ///
    /// When the slot is held by a different `group_id` (a fresh id when
    /// `None`), every occupant is removed and its `removed` callback invoked
    /// before the new interaction is inserted. Callbacks may register again;
    /// eviction repeats until the slot is empty or holds `group_id`. Within a
    /// group, higher `priority` runs earlier; equal priorities keep
    /// registration order.
    ///
    /// Registering an instance that is already in the slot replaces its
    /// entry, and the earlier remover becomes a no-op. An instance that was
    /// already in the chain beforehand (a persistent interaction) keeps its
    /// chain position and stays in the chain when it leaves the slot.
    ///
    /// The returned remover takes out only this interaction and does not
    /// invoke `removed`, which is reserved for forced eviction.
    pub fn add_exclusive_interaction<F>(
        &self,
        interaction: Arc<dyn Interaction>,
        removed: F,
        priority: i32,
        group_id: Option<String>,
    ) -> Remover
    where
        F: Fn() + Send + Sync + 'static,
    {
        let group_id = group_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        let id = interaction.id();

        loop {
            let mut slot = lock(&self.inner.slot);
            if slot
                .group_id()
                .is_some_and(|current| current != group_id)
            {
                let evicted = slot.take();
                drop(slot);
                self.inner.finish_eviction(evicted);
                continue;
            }

            let mut owns_chain_entry = true;
            if let Some(previous) = slot.position_of(id) {
                let previous = slot.entries.remove(previous);
                if previous.owns_chain_entry {
                    self.inner.chain.remove_by_id(id);
                } else {
                    owns_chain_entry = false;
                }
                debug!("Exclusive interaction {id} re-registered, replacing its entry");
            }

            let index = slot.insertion_index(priority);
            if owns_chain_entry {
                let chain_index = match slot.entries.get(index) {
                    Some(next) => self.inner.chain.index_of(next.interaction.id()),
                    None => slot
                        .entries
                        .last()
                        .and_then(|last| self.inner.chain.index_of(last.interaction.id()))
                        .map(|last| last + 1),
                };
                owns_chain_entry = self.inner.chain.add(Arc::clone(&interaction), chain_index);
            }
            slot.entries.insert(
                index,
                ExclusiveEntry {
                    token,
                    interaction,
                    removed: Arc::new(removed),
                    priority,
                    group_id: group_id.clone(),
                    owns_chain_entry,
                },
            );
            break;
        }
        debug!("Exclusive interaction {id} added (group {group_id}, priority {priority})");

        self.inner.exclusive_added.raise(&ExclusiveAdded {
            interaction: id,
            priority,
            group_id,
        });

        let weak = Arc::downgrade(&self.inner);
        Box::new(move || {
            weak.upgrade()
                .map_or(0, |inner| inner.remove_exclusive_entry(token))
        })
    }

    /// Evicts every occupant of the slot, invoking each removed callback and
    /// firing `exclusive_removed` once. Does nothing when the slot is empty.
    pub fn remove_exclusive(&self) {
        let evicted = lock(&self.inner.slot).take();
        self.inner.finish_eviction(evicted);
    }

    pub fn has_exclusive(&self) -> bool {
        !lock(&self.inner.slot).entries.is_empty()
    }

    /// Current slot members in dispatch order.
    pub fn exclusive_interactions(&self) -> Vec<ExclusiveEntryInfo> {
        lock(&self.inner.slot)
            .entries
            .iter()
            .map(|entry| ExclusiveEntryInfo {
                interaction: entry.interaction.id(),
                priority: entry.priority,
                group_id: entry.group_id.clone(),
            })
            .collect()
    }
}
