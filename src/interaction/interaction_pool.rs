//! Interaction Pool
//!
//! Arena owning every interaction of a world. Freed slots go on a free list
//! and bump their generation, so ids held across a free resolve to
//! `StaleInteraction` instead of aliasing the slot's next tenant.

use super::interaction_data::{Interaction, InteractionId, InteractionStats};
use crate::error::{InteractionError, InteractionResult};

#[derive(Debug, Clone)]
struct PoolSlot {
    generation: u32,
    interaction: Option<Interaction>,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionPool {
    slots: Vec<PoolSlot>,
    free_slots: Vec<u32>,
    live: usize,
    pub stats: InteractionStats,
}

impl InteractionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an interaction and hand back its id
    pub fn alloc(&mut self, interaction: Interaction) -> InteractionId {
        self.live += 1;
        self.stats.allocs += 1;

        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.interaction = Some(interaction);
            return InteractionId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(PoolSlot {
            generation: 0,
            interaction: Some(interaction),
        });
        InteractionId {
            index,
            generation: 0,
        }
    }

    /// Return the slot to the pool, yielding the record it held
    pub fn free(&mut self, id: InteractionId) -> InteractionResult<Interaction> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .ok_or(InteractionError::StaleInteraction(id))?;
        let interaction = slot
            .interaction
            .take()
            .ok_or(InteractionError::StaleInteraction(id))?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(id.index);
        self.live -= 1;
        self.stats.frees += 1;
        Ok(interaction)
    }

    pub fn get(&self, id: InteractionId) -> InteractionResult<&Interaction> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.interaction.as_ref())
            .ok_or(InteractionError::StaleInteraction(id))
    }

    pub fn get_mut(&mut self, id: InteractionId) -> InteractionResult<&mut Interaction> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.interaction.as_mut())
            .ok_or(InteractionError::StaleInteraction(id))
    }

    pub fn contains(&self, id: InteractionId) -> bool {
        self.get(id).is_ok()
    }

    /// Number of allocated interactions
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Every live interaction with its id
    pub fn iter(&self) -> impl Iterator<Item = (InteractionId, &Interaction)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.interaction.as_ref().map(|interaction| {
                (
                    InteractionId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    interaction,
                )
            })
        })
    }

    /// Drop every interaction at once. Ids handed out before stay stale.
    pub fn clear(&mut self) {
        self.free_slots.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.interaction.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.stats.frees += 1;
            }
            self.free_slots.push(index as u32);
        }
        self.live = 0;
    }
}
