//! Render World Operations - Pure DOP Functions
//!
//! Adding, updating and freeing light and entity defs, and generating the
//! DEFERRED interactions between them. Surfaces are never built here; that
//! waits until a view actually needs them.

use super::derived_data_operations::{
    clear_entity_def_dynamic_model, free_entity_def_derived_data, free_light_def_derived_data,
};
use super::render_world_data::RenderWorld;
use crate::constants::channels::LIGHT_CHANNEL_WORLD;
use crate::entity::{create_entity_refs, update_entity_model_matrix, EntityDef, EntityHandle, EntityParms};
use crate::error::{InteractionError, InteractionResult, OptionExt};
use crate::geometry::{bounds_intersects, cull_local_box};
use crate::interaction::{
    alloc_and_link, InteractionId, InteractionPool, InteractionTable, ListKind,
};
use crate::light::{create_light_refs, derive_light_data, LightDef, LightHandle, LightParms};
use crate::model::same_model;

pub fn light_def(world: &RenderWorld, handle: LightHandle) -> InteractionResult<&LightDef> {
    world
        .lights
        .get(handle.index())
        .and_then(Option::as_ref)
        .ok_or_interaction(|| InteractionError::MissingLightDef(handle))
}

pub fn light_def_mut(world: &mut RenderWorld, handle: LightHandle) -> InteractionResult<&mut LightDef> {
    world
        .lights
        .get_mut(handle.index())
        .and_then(Option::as_mut)
        .ok_or_interaction(|| InteractionError::MissingLightDef(handle))
}

pub fn entity_def(world: &RenderWorld, handle: EntityHandle) -> InteractionResult<&EntityDef> {
    world
        .entities
        .get(handle.index())
        .and_then(Option::as_ref)
        .ok_or_interaction(|| InteractionError::MissingEntityDef(handle))
}

pub fn entity_def_mut(
    world: &mut RenderWorld,
    handle: EntityHandle,
) -> InteractionResult<&mut EntityDef> {
    world
        .entities
        .get_mut(handle.index())
        .and_then(Option::as_mut)
        .ok_or_interaction(|| InteractionError::MissingEntityDef(handle))
}

/// Start a new view and return its visibility counter
pub fn begin_view(world: &mut RenderWorld) -> u64 {
    world.view_count += 1;
    world.view_count
}

/// Whether a light and an entity could ever light one another: they share
/// an area and a light channel, their bounds overlap and the entity box is
/// not outside the light volume.
pub fn pair_may_interact(light: &LightDef, entity: &EntityDef) -> bool {
    if !entity.areas.iter().any(|area| light.areas.contains(area)) {
        return false;
    }

    let mut channels = entity.parms.light_channel;
    if entity.parms.model.is_world_mesh() {
        channels |= 1 << LIGHT_CHANNEL_WORLD;
    }
    let light_channel = light.parms.light_channel;
    if light_channel >= 64 || channels & (1u64 << light_channel) == 0 {
        return false;
    }

    if !bounds_intersects(&light.global_light_bounds, &entity.global_reference_bounds) {
        return false;
    }

    !cull_local_box(&entity.reference_bounds, &entity.model_matrix, &light.frustum)
}

fn find_interaction(
    pool: &InteractionPool,
    table: Option<&InteractionTable>,
    light: &LightDef,
    entity: &EntityDef,
) -> InteractionResult<Option<InteractionId>> {
    if let Some(table) = table {
        return Ok(table.get(light.handle, entity.handle));
    }

    let mut cursor = entity.interactions.first;
    while let Some(id) = cursor {
        let interaction = pool.get(id)?;
        if interaction.light == light.handle {
            return Ok(Some(id));
        }
        cursor = interaction.links(ListKind::Entity).next;
    }
    Ok(None)
}

/// The interaction between a light and an entity, if one exists
pub fn lookup_interaction(
    world: &RenderWorld,
    light: LightHandle,
    entity: EntityHandle,
) -> InteractionResult<Option<InteractionId>> {
    find_interaction(
        &world.pool,
        world.table.as_ref(),
        light_def(world, light)?,
        entity_def(world, entity)?,
    )
}

/// Allocate interactions between a light and every entity it may reach.
/// Returns how many were created.
pub fn create_light_def_interactions(
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

    let mut created = 0;
    for entity in entities.iter_mut().flatten() {
        if !pair_may_interact(light, entity) {
            continue;
        }
        if find_interaction(pool, table.as_ref(), light, entity)?.is_some() {
            continue;
        }
        alloc_and_link(pool, table.as_mut(), light, entity)?;
        created += 1;
    }

    Ok(created)
}

/// Allocate interactions between an entity and every light that may reach
/// it. Returns how many were created.
pub fn create_entity_def_interactions(
    world: &mut RenderWorld,
    handle: EntityHandle,
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

    let mut created = 0;
    for light in lights.iter_mut().flatten() {
        if !pair_may_interact(light, entity) {
            continue;
        }
        if find_interaction(pool, table.as_ref(), light, entity)?.is_some() {
            continue;
        }
        alloc_and_link(pool, table.as_mut(), light, entity)?;
        created += 1;
    }

    Ok(created)
}

/// Derive the light, place it in the area graph and generate its
/// interactions
pub fn reference_light_def(world: &mut RenderWorld, handle: LightHandle) -> InteractionResult<()> {
    let RenderWorld {
        lights,
        areas,
        config,
        view_count,
        ..
    } = world;
    let light = lights
        .get_mut(handle.index())
        .and_then(Option::as_mut)
        .ok_or_interaction(|| InteractionError::MissingLightDef(handle))?;

    derive_light_data(light);
    create_light_refs(light, &**areas, config.show_updates, view_count)?;
    create_light_def_interactions(world, handle)?;
    Ok(())
}

/// Place the entity in the area graph and generate its interactions
pub fn reference_entity_def(world: &mut RenderWorld, handle: EntityHandle) -> InteractionResult<()> {
    let RenderWorld {
        entities,
        areas,
        config,
        view_count,
        ..
    } = world;
    let entity = entities
        .get_mut(handle.index())
        .and_then(Option::as_mut)
        .ok_or_interaction(|| InteractionError::MissingEntityDef(handle))?;

    update_entity_model_matrix(entity);
    create_entity_refs(entity, &**areas, config.show_updates, view_count);
    create_entity_def_interactions(world, handle)?;
    Ok(())
}

/// Add a light to the world, reusing the lowest free slot
pub fn add_light_def(world: &mut RenderWorld, parms: LightParms) -> InteractionResult<LightHandle> {
    let index = world
        .lights
        .iter()
        .position(Option::is_none)
        .unwrap_or(world.lights.len());
    let handle = LightHandle(index as u32);
    let light = LightDef::new(handle, parms);

    if index == world.lights.len() {
        world.lights.push(Some(light));
    } else {
        world.lights[index] = Some(light);
    }

    if let Err(err) = reference_light_def(world, handle) {
        // leave nothing half built behind
        free_light_def_derived_data(world, handle)?;
        world.lights[index] = None;
        return Err(err);
    }

    log::debug!("[render_world_operations::add_light_def] Added light {}", index);
    Ok(handle)
}

/// Replace a light's parameters and regenerate its interactions.
///
/// The light volume mesh survives when the new parameters produce the same
/// frustum.
pub fn update_light_def(
    world: &mut RenderWorld,
    handle: LightHandle,
    parms: LightParms,
) -> InteractionResult<()> {
    free_light_def_derived_data(world, handle)?;
    light_def_mut(world, handle)?.parms = parms;
    reference_light_def(world, handle)
}

pub fn free_light_def(world: &mut RenderWorld, handle: LightHandle) -> InteractionResult<()> {
    free_light_def_derived_data(world, handle)?;
    world.lights[handle.index()] = None;
    log::debug!("[render_world_operations::free_light_def] Freed light {}", handle.0);
    Ok(())
}

/// Add an entity to the world, reusing the lowest free slot
pub fn add_entity_def(world: &mut RenderWorld, parms: EntityParms) -> InteractionResult<EntityHandle> {
    let index = world
        .entities
        .iter()
        .position(Option::is_none)
        .unwrap_or(world.entities.len());
    let handle = EntityHandle(index as u32);
    let entity = EntityDef::new(handle, parms);

    if index == world.entities.len() {
        world.entities.push(Some(entity));
    } else {
        world.entities[index] = Some(entity);
    }

    if let Err(err) = reference_entity_def(world, handle) {
        free_entity_def_derived_data(world, handle, false, false)?;
        world.entities[index] = None;
        return Err(err);
    }

    log::debug!("[render_world_operations::add_entity_def] Added entity {}", index);
    Ok(handle)
}

/// Replace an entity's parameters.
///
/// When only the pose can have changed (same model, placement and callback
/// bounds) the interactions stay and just drop their surfaces. Anything else
/// tears the entity's interactions down and places it again, keeping decals
/// and the cached posed model.
pub fn update_entity_def(
    world: &mut RenderWorld,
    handle: EntityHandle,
    parms: EntityParms,
) -> InteractionResult<()> {
    let entity = entity_def(world, handle)?;
    let same_placement = same_model(&entity.parms.model, &parms.model)
        && entity.parms.origin == parms.origin
        && entity.parms.axis == parms.axis
        && entity.parms.callback_bounds == parms.callback_bounds
        && entity.parms.light_channel == parms.light_channel;

    if same_placement {
        clear_entity_def_dynamic_model(world, handle)?;
        entity_def_mut(world, handle)?.parms = parms;
        return Ok(());
    }

    free_entity_def_derived_data(world, handle, true, true)?;
    entity_def_mut(world, handle)?.parms = parms;
    reference_entity_def(world, handle)
}

pub fn free_entity_def(world: &mut RenderWorld, handle: EntityHandle) -> InteractionResult<()> {
    free_entity_def_derived_data(world, handle, false, false)?;
    world.entities[handle.index()] = None;
    log::debug!("[render_world_operations::free_entity_def] Freed entity {}", handle.0);
    Ok(())
}
