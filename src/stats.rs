//! Interaction memory accounting

use crate::interaction::{interaction_memory_used, InteractionStats};
use crate::world::RenderWorld;
use anyhow::{Context, Result};
use serde::Serialize;

/// Snapshot of what the interaction graph of one or more worlds holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InteractionMemoryReport {
    pub entities: usize,
    pub entities_with_interactions: usize,
    pub interactions: usize,
    pub deferred: usize,
    pub empty: usize,
    /// Lit surfaces across populated interactions
    pub lit_surfaces: usize,
    pub lit_verts: usize,
    pub lit_indexes: usize,
    /// Bytes held by surfaces, cull info and area references
    pub interaction_bytes: usize,
    pub table_bytes: usize,
    pub stats: InteractionStats,
}

impl InteractionMemoryReport {
    /// Fold another world's numbers into this report
    pub fn merge(&mut self, other: &InteractionMemoryReport) {
        self.entities += other.entities;
        self.entities_with_interactions += other.entities_with_interactions;
        self.interactions += other.interactions;
        self.deferred += other.deferred;
        self.empty += other.empty;
        self.lit_surfaces += other.lit_surfaces;
        self.lit_verts += other.lit_verts;
        self.lit_indexes += other.lit_indexes;
        self.interaction_bytes += other.interaction_bytes;
        self.table_bytes += other.table_bytes;
        self.stats.allocs += other.stats.allocs;
        self.stats.frees += other.stats.frees;
        self.stats.create_interactions += other.stats.create_interactions;
        self.stats.free_surfaces += other.stats.free_surfaces;
        self.stats.made_empty += other.stats.made_empty;
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("InteractionMemoryReport: failed to serialize")
    }
}

/// Count everything the world's interaction graph holds
pub fn collect_interaction_memory(world: &RenderWorld) -> InteractionMemoryReport {
    let mut report = InteractionMemoryReport {
        entities: world.num_entity_defs(),
        entities_with_interactions: world
            .entities
            .iter()
            .flatten()
            .filter(|entity| !entity.interactions.is_empty())
            .count(),
        table_bytes: world.table.as_ref().map_or(0, |table| table.memory_bytes()),
        stats: world.pool.stats,
        ..InteractionMemoryReport::default()
    };

    for (_, interaction) in world.pool.iter() {
        report.interactions += 1;
        if interaction.is_deferred() {
            report.deferred += 1;
            continue;
        }
        if interaction.is_empty() {
            report.empty += 1;
            continue;
        }

        report.interaction_bytes += interaction_memory_used(interaction);
        for surface in interaction.surfaces() {
            let Some(tri) = surface.ambient_tris.as_ref() else {
                continue;
            };
            let tri = tri.read();
            report.lit_surfaces += 1;
            report.lit_verts += tri.num_verts();
            report.lit_indexes += tri.num_indexes();
        }
    }

    report
}
