//! Ordered composite of interactions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::debug;

use super::event::InteractionEvent;
use super::interaction::{Interaction, InteractionBase, InteractionError, InteractionId};
use super::types::ModificationKeyType;
use crate::util::lock;

/// Runs its members in order and stops as soon as one of them sets
/// `stop_propagation`.
///
/// A chain is itself an [`Interaction`] matching every event, so chains nest.
/// Each member appears at most once.
pub struct InteractionChain {
    base: InteractionBase,
    members: Mutex<Vec<Arc<dyn Interaction>>>,
}

impl InteractionChain {
    pub fn new() -> Self {
        Self::with_members(Vec::new())
    }

    /// Builds a chain from `members`, dropping repeated instances.
    pub fn with_members(members: Vec<Arc<dyn Interaction>>) -> Self {
        let chain = Self {
            base: InteractionBase::passthrough(),
            members: Mutex::new(Vec::with_capacity(members.len())),
        };
        for member in members {
            chain.add(member, None);
        }
        chain
    }

    /// Inserts `interaction` at `index` (clamped to the chain length), or
    /// appends it. Returns false when the instance is already a member.
    pub fn add(&self, interaction: Arc<dyn Interaction>, index: Option<usize>) -> bool {
        let mut members = lock(&self.members);
        let id = interaction.id();
        if members.iter().any(|member| member.id() == id) {
            return false;
        }
        let at = index.map_or(members.len(), |index| index.min(members.len()));
        members.insert(at, interaction);
        debug!("Interaction {id} added to chain {} at {at}", self.base.id());
        true
    }

    /// Removes `interaction`; returns 1 if it was a member, 0 otherwise.
    pub fn remove(&self, interaction: &dyn Interaction) -> usize {
        self.remove_by_id(interaction.id())
    }

    pub fn remove_by_id(&self, id: InteractionId) -> usize {
        let mut members = lock(&self.members);
        match members.iter().position(|member| member.id() == id) {
            Some(index) => {
                members.remove(index);
                debug!("Interaction {id} removed from chain {}", self.base.id());
                1
            }
            None => 0,
        }
    }

    pub fn contains(&self, id: InteractionId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: InteractionId) -> Option<usize> {
        lock(&self.members).iter().position(|member| member.id() == id)
    }

    pub fn len(&self) -> usize {
        lock(&self.members).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.members).is_empty()
    }

    /// Member identities in dispatch order.
    pub fn member_ids(&self) -> Vec<InteractionId> {
        lock(&self.members).iter().map(|member| member.id()).collect()
    }

    pub fn clear(&self) {
        lock(&self.members).clear();
    }
}

impl Default for InteractionChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Interaction for InteractionChain {
    fn base(&self) -> &InteractionBase {
        &self.base
    }

    async fn pipe(&self, event: &mut InteractionEvent) -> Result<(), InteractionError> {
        // Membership changes during a run apply to the next run.
        let members: Vec<Arc<dyn Interaction>> = lock(&self.members).clone();
        for member in members {
            if !member.matches(event) {
                continue;
            }
            member.pipe(event).await?;
            if event.stop_propagation {
                break;
            }
        }
        Ok(())
    }

    fn modifier_changed(&self, modifier: ModificationKeyType) {
        let members: Vec<Arc<dyn Interaction>> = lock(&self.members).clone();
        for member in members {
            member.modifier_changed(modifier);
        }
    }
}
