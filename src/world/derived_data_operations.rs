//! Derived data lifecycle
//!
//! Tearing down exactly the interactions and caches a changed def affects.
//! Walks always read the next link before touching the current node, since
//! freeing unlinks it.

use super::render_world_data::RenderWorld;
use crate::entity::{free_entity_def_decals, free_entity_def_overlay, EntityHandle};
use crate::error::{InteractionError, InteractionResult, OptionExt};
use crate::interaction::{free_surfaces, unlink_and_free, ListKind};
use crate::light::LightHandle;

/// Free every interaction of the light. Returns how many were freed.
///
/// The light volume mesh is kept, so re-deriving unchanged parameters
/// does not rebuild it.
pub fn free_light_def_derived_data(
    world: &mut RenderWorld,
    handle: LightHandle,
) -> InteractionResult<usize> {
    let RenderWorld {
        lights,
        entities,
        pool,
        table,
        ..
    } = world;
    let light = lights
        .get_mut(handle.index())
        .and_then(Option::as_mut)
        .ok_or_interaction(|| InteractionError::MissingLightDef(handle))?;

    let mut freed = 0;
    while let Some(id) = light.interactions.first {
        let entity_handle = pool.get(id)?.entity;
        let entity = entities
            .get_mut(entity_handle.index())
            .and_then(Option::as_mut)
            .ok_or_interaction(|| InteractionError::MissingEntityDef(entity_handle))?;
        unlink_and_free(pool, table.as_mut(), id, light, entity)?;
        freed += 1;
    }

    light.areas.clear();
    light.area_num = None;
    Ok(freed)
}

/// Free every interaction of the entity and drop its posed model.
///
/// Decals and overlays survive when `keep_decals` is set, the cached posed
/// model when `keep_cached_dynamic_model` is set.
pub fn free_entity_def_derived_data(
    world: &mut RenderWorld,
    handle: EntityHandle,
    keep_decals: bool,
    keep_cached_dynamic_model: bool,
) -> InteractionResult<usize> {
    let RenderWorld {
        lights,
        entities,
        pool,
        table,
        ..
    } = world;
    let entity = entities
        .get_mut(handle.index())
        .and_then(Option::as_mut)
        .ok_or_interaction(|| InteractionError::MissingEntityDef(handle))?;

    let mut freed = 0;
    while let Some(id) = entity.interactions.first {
        let light_handle = pool.get(id)?.light;
        let light = lights
            .get_mut(light_handle.index())
            .and_then(Option::as_mut)
            .ok_or_interaction(|| InteractionError::MissingLightDef(light_handle))?;
        unlink_and_free(pool, table.as_mut(), id, light, entity)?;
        freed += 1;
    }

    entity.dynamic_model = None;

    if !keep_decals {
        free_entity_def_decals(entity);
        free_entity_def_overlay(entity);
    }
    if !keep_cached_dynamic_model {
        entity.cached_dynamic_model = None;
    }

    entity.areas.clear();
    Ok(freed)
}

/// Drop the surfaces of the entity's interactions but keep the
/// interactions, for when only the pose changed.
///
/// Stops at the first EMPTY interaction; everything after it is empty too.
/// Returns how many interactions lost their surfaces.
pub fn clear_entity_def_dynamic_model(
    world: &mut RenderWorld,
    handle: EntityHandle,
) -> InteractionResult<usize> {
    let RenderWorld {
        lights,
        entities,
        pool,
        ..
    } = world;
    let entity = entities
        .get_mut(handle.index())
        .and_then(Option::as_mut)
        .ok_or_interaction(|| InteractionError::MissingEntityDef(handle))?;

    let mut cleared = 0;
    let mut cursor = entity.interactions.first;
    while let Some(id) = cursor {
        let interaction = pool.get(id)?;
        if interaction.is_empty() {
            break;
        }
        cursor = interaction.links(ListKind::Entity).next;

        let light_handle = interaction.light;
        let light = lights
            .get_mut(light_handle.index())
            .and_then(Option::as_mut)
            .ok_or_interaction(|| InteractionError::MissingLightDef(light_handle))?;
        if free_surfaces(pool, id, light, entity)? {
            cleared += 1;
        }
    }

    entity.dynamic_model = None;
    Ok(cleared)
}
