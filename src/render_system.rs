//! Render System
//!
//! Owns every render world and the vertex cache they share. World-wide
//! teardown and rebuild live here since they must cover all worlds at once.

use crate::cache::FrameVertexCache;
use crate::config::InteractionConfig;
use crate::entity::EntityHandle;
use crate::error::{InteractionError, InteractionResult, OptionExt};
use crate::light::LightHandle;
use crate::model::{same_model, RenderModel};
use crate::stats::{collect_interaction_memory, InteractionMemoryReport};
use crate::view::{render_view, ViewDef};
use crate::world::{
    free_entity_def_derived_data, free_light_def_derived_data, reference_entity_def,
    reference_light_def, PortalAreas, RenderWorld,
};
use anyhow::Result;
use std::sync::Arc;

/// All render worlds plus the shared vertex cache
#[derive(Debug)]
pub struct RenderSystem {
    pub config: InteractionConfig,
    pub worlds: Vec<RenderWorld>,
    pub cache: FrameVertexCache,
}

impl RenderSystem {
    pub fn new(config: InteractionConfig) -> Result<Self> {
        config.validate()?;
        let cache = FrameVertexCache::new(config.vertex_cache_bytes);
        Ok(Self {
            config,
            worlds: Vec::new(),
            cache,
        })
    }
}

fn light_handles(world: &RenderWorld) -> Vec<LightHandle> {
    world.lights.iter().flatten().map(|light| light.handle).collect()
}

fn entity_handles(world: &RenderWorld) -> Vec<EntityHandle> {
    world.entities.iter().flatten().map(|entity| entity.handle).collect()
}

/// Create a world and return its index
pub fn alloc_render_world(system: &mut RenderSystem, areas: Box<dyn PortalAreas>) -> usize {
    system
        .worlds
        .push(RenderWorld::new(areas, system.config.clone()));
    system.worlds.len() - 1
}

pub fn render_world_mut(
    system: &mut RenderSystem,
    index: usize,
) -> InteractionResult<&mut RenderWorld> {
    system
        .worlds
        .get_mut(index)
        .ok_or_interaction(|| InteractionError::InvalidHandle(format!("render world {}", index)))
}

/// Free every interaction and every posed model in every world.
/// Returns how many interactions were freed.
pub fn free_derived_data(system: &mut RenderSystem) -> InteractionResult<usize> {
    let mut freed = 0;
    for world in &mut system.worlds {
        freed += free_world_derived_data(world)?;
    }
    log::debug!(
        "[render_system::free_derived_data] Freed {} interactions in {} worlds",
        freed,
        system.worlds.len()
    );
    Ok(freed)
}

fn free_world_derived_data(world: &mut RenderWorld) -> InteractionResult<usize> {
    let mut freed = 0;
    for handle in entity_handles(world) {
        freed += free_entity_def_derived_data(world, handle, false, false)?;
    }
    for handle in light_handles(world) {
        freed += free_light_def_derived_data(world, handle)?;
    }
    Ok(freed)
}

/// Place every light and entity again and regenerate their interactions.
/// Returns how many interactions exist afterwards.
///
/// Lights go first so each entity sees every placed light exactly once.
pub fn recreate_world_references(system: &mut RenderSystem) -> InteractionResult<usize> {
    let mut total = 0;
    for world in &mut system.worlds {
        total += recreate_references(world)?;
    }
    Ok(total)
}

fn recreate_references(world: &mut RenderWorld) -> InteractionResult<usize> {
    for handle in light_handles(world) {
        reference_light_def(world, handle)?;
    }
    for handle in entity_handles(world) {
        reference_entity_def(world, handle)?;
    }
    Ok(world.pool.len())
}

/// Free and rebuild all references and interactions of every world
pub fn regenerate_world(system: &mut RenderSystem) -> InteractionResult<usize> {
    let freed = free_derived_data(system)?;
    let created = recreate_world_references(system)?;
    log::info!(
        "[render_system::regenerate_world] Regenerated world: {} interactions freed, {} created",
        freed,
        created
    );
    Ok(created)
}

/// Free the derived data of any entity still pointing at a model that is
/// about to be reloaded. Returns how many entities were affected.
pub fn check_for_entity_defs_using_model(
    system: &mut RenderSystem,
    model: &Arc<dyn RenderModel>,
) -> InteractionResult<usize> {
    let mut affected = 0;
    for world in &mut system.worlds {
        let using: Vec<EntityHandle> = world
            .entities
            .iter()
            .flatten()
            .filter(|entity| same_model(&entity.parms.model, model))
            .map(|entity| entity.handle)
            .collect();
        for handle in using {
            free_entity_def_derived_data(world, handle, false, false)?;
            affected += 1;
        }
    }
    if affected > 0 {
        log::warn!(
            "[render_system::check_for_entity_defs_using_model] {} entities still used {}",
            affected,
            model.name()
        );
    }
    Ok(affected)
}

/// Resolve a view of one world against the shared cache. Returns how many
/// draw interactions were added.
pub fn render_world_view(
    system: &mut RenderSystem,
    index: usize,
    view: &mut ViewDef,
) -> InteractionResult<usize> {
    let RenderSystem { worlds, cache, .. } = system;
    let world = worlds
        .get_mut(index)
        .ok_or_interaction(|| InteractionError::InvalidHandle(format!("render world {}", index)))?;
    render_view(world, view, cache)
}

/// Start a frame on the shared vertex cache
pub fn begin_frame(system: &mut RenderSystem) {
    system.cache.begin_frame();
}

/// Drop cache entries idle longer than the configured number of frames
pub fn purge_vertex_cache(system: &mut RenderSystem) -> usize {
    let idle = system.config.cache_purge_idle_frames;
    system.cache.purge_unused(idle)
}

/// Memory held by the interaction graphs of all worlds
pub fn report_interaction_memory(system: &RenderSystem) -> InteractionMemoryReport {
    let mut report = InteractionMemoryReport::default();
    for world in &system.worlds {
        report.merge(&collect_interaction_memory(world));
    }

    log::info!(
        "[render_system::report_interaction_memory] {} entities with {} interactions ({} deferred, {} empty)",
        report.entities_with_interactions,
        report.interactions,
        report.deferred,
        report.empty
    );
    log::info!(
        "[render_system::report_interaction_memory] {} lit surfaces, {} verts, {} indexes, {} bytes",
        report.lit_surfaces,
        report.lit_verts,
        report.lit_indexes,
        report.interaction_bytes + report.table_bytes
    );
    report
}
