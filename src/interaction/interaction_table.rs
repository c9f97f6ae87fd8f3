//! Dense (light, entity) lookup table
//!
//! Row-major by light. Grows with headroom whenever a def index lands past
//! the current edge, so adding a handful of defs does not reallocate each time.

use super::interaction_data::InteractionId;
use crate::entity::EntityHandle;
use crate::error::{InteractionError, InteractionResult};
use crate::light::LightHandle;

#[derive(Debug, Clone)]
pub struct InteractionTable {
    cells: Vec<Option<InteractionId>>,
    num_lights: usize,
    num_entities: usize,
    headroom: usize,
}

impl InteractionTable {
    pub fn new(num_lights: usize, num_entities: usize, headroom: usize) -> Self {
        let num_lights = num_lights + headroom;
        let num_entities = num_entities + headroom;
        log::debug!(
            "[InteractionTable::new] {} x {} cells",
            num_lights,
            num_entities
        );
        Self {
            cells: vec![None; num_lights * num_entities],
            num_lights,
            num_entities,
            headroom,
        }
    }

    pub fn num_lights(&self) -> usize {
        self.num_lights
    }

    pub fn num_entities(&self) -> usize {
        self.num_entities
    }

    fn cell(&self, light: LightHandle, entity: EntityHandle) -> Option<usize> {
        let (l, e) = (light.index(), entity.index());
        (l < self.num_lights && e < self.num_entities).then(|| l * self.num_entities + e)
    }

    pub fn get(&self, light: LightHandle, entity: EntityHandle) -> Option<InteractionId> {
        self.cell(light, entity).and_then(|i| self.cells[i])
    }

    /// Make room for the given def indices, keeping existing cells
    pub fn ensure_capacity(&mut self, min_lights: usize, min_entities: usize) {
        if min_lights <= self.num_lights && min_entities <= self.num_entities {
            return;
        }

        let num_lights = if min_lights > self.num_lights {
            min_lights + self.headroom
        } else {
            self.num_lights
        };
        let num_entities = if min_entities > self.num_entities {
            min_entities + self.headroom
        } else {
            self.num_entities
        };

        let mut cells = vec![None; num_lights * num_entities];
        for l in 0..self.num_lights {
            let old_row = &self.cells[l * self.num_entities..(l + 1) * self.num_entities];
            cells[l * num_entities..l * num_entities + self.num_entities].copy_from_slice(old_row);
        }

        log::debug!(
            "[InteractionTable::ensure_capacity] Grew to {} x {}",
            num_lights,
            num_entities
        );
        self.cells = cells;
        self.num_lights = num_lights;
        self.num_entities = num_entities;
    }

    /// Record a new interaction. The cell must be free.
    pub fn insert(
        &mut self,
        light: LightHandle,
        entity: EntityHandle,
        id: InteractionId,
    ) -> InteractionResult<()> {
        self.ensure_capacity(light.index() + 1, entity.index() + 1);
        let Some(i) = self.cell(light, entity) else {
            return Err(InteractionError::InvalidHandle(format!(
                "table cell [{}][{}]",
                light.0, entity.0
            )));
        };

        if self.cells[i].is_some() {
            log::error!(
                "[InteractionTable::insert] Non-null table entry [{}][{}]",
                light.0,
                entity.0
            );
            return Err(InteractionError::TableCellOccupied {
                light: light.0,
                entity: entity.0,
            });
        }

        self.cells[i] = Some(id);
        Ok(())
    }

    /// Clear the cell of an interaction being freed. The cell must hold `id`.
    pub fn remove(
        &mut self,
        light: LightHandle,
        entity: EntityHandle,
        id: InteractionId,
    ) -> InteractionResult<()> {
        self.check(light, entity, id)?;
        if let Some(i) = self.cell(light, entity) {
            self.cells[i] = None;
        }
        Ok(())
    }

    /// Verify the cell holds `id` without touching it
    pub fn check(
        &self,
        light: LightHandle,
        entity: EntityHandle,
        id: InteractionId,
    ) -> InteractionResult<()> {
        if self.get(light, entity) != Some(id) {
            log::error!(
                "[InteractionTable::check] Entry [{}][{}] does not match interaction",
                light.0,
                entity.0
            );
            return Err(InteractionError::TableCellMismatch {
                light: light.0,
                entity: entity.0,
                id,
            });
        }
        Ok(())
    }

    /// Occupied cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Bytes held by the cells
    pub fn memory_bytes(&self) -> usize {
        self.cells.len() * std::mem::size_of::<Option<InteractionId>>()
    }
}
