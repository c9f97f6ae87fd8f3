//! Render World Data - Pure Data Structures

use super::PortalAreas;
use crate::config::InteractionConfig;
use crate::entity::EntityDef;
use crate::interaction::{InteractionPool, InteractionTable};
use crate::light::LightDef;

/// Lights, entities and the interactions between them
#[derive(Debug)]
pub struct RenderWorld {
    /// Index-stable; freed slots stay `None` until reused
    pub lights: Vec<Option<LightDef>>,
    pub entities: Vec<Option<EntityDef>>,

    pub pool: InteractionPool,
    /// Dense (light, entity) lookup, when enabled
    pub table: Option<InteractionTable>,

    pub areas: Box<dyn PortalAreas>,
    pub config: InteractionConfig,

    /// Bumped by every reference update and every view
    pub view_count: u64,
}

impl RenderWorld {
    pub fn new(areas: Box<dyn PortalAreas>, config: InteractionConfig) -> Self {
        let table = config
            .use_interaction_table
            .then(|| InteractionTable::new(0, 0, config.interaction_table_headroom));
        Self {
            lights: Vec::new(),
            entities: Vec::new(),
            pool: InteractionPool::new(),
            table,
            areas,
            config,
            view_count: 0,
        }
    }

    pub fn num_light_defs(&self) -> usize {
        self.lights.iter().flatten().count()
    }

    pub fn num_entity_defs(&self) -> usize {
        self.entities.iter().flatten().count()
    }
}
