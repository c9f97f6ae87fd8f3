//! View Operations - Pure DOP Functions
//!
//! Per-view passes over a world: choose the lights and entities the view
//! sees, stamp the ambient surfaces the view draws, then resolve every
//! interaction of every view light into draw interactions.

use super::view_data::{ViewDef, ViewEntity, ViewLight};
use crate::cache::VertexCacheManager;
use crate::entity::{entity_def_dynamic_model, EntityHandle};
use crate::error::{InteractionError, InteractionResult, OptionExt};
use crate::geometry::{bounds_is_cleared, ScreenRect};
use crate::interaction::{add_active_interaction, has_shadows, ActiveFrame, ListKind};
use crate::light::LightHandle;
use crate::world::{entity_def_mut, RenderWorld};

pub fn mark_area_visible(view: &mut ViewDef, area: usize) {
    if area < view.visible_areas.len() {
        view.visible_areas.set(area, true);
    }
}

pub fn area_is_visible(view: &ViewDef, area: usize) -> bool {
    view.visible_areas.get(area).unwrap_or(false)
}

fn any_area_visible(view: &ViewDef, areas: &[usize]) -> bool {
    areas.iter().any(|area| area_is_visible(view, *area))
}

pub fn add_view_light(view: &mut ViewDef, light: LightHandle, scissor_rect: ScreenRect) {
    view.view_lights.insert(light, ViewLight { scissor_rect });
}

pub fn add_view_entity(view: &mut ViewDef, entity: EntityHandle, scissor_rect: ScreenRect) {
    view.view_entities.insert(entity, ViewEntity { scissor_rect });
}

/// Add every light whose volume reaches a visible area and the view
/// frustum. Returns how many were added.
pub fn add_visible_lights(world: &RenderWorld, view: &mut ViewDef) -> usize {
    let mut added = 0;
    for light in world.lights.iter().flatten() {
        if !any_area_visible(view, &light.areas) {
            continue;
        }
        if view.frustum.cull_bounds(&light.global_light_bounds) {
            continue;
        }
        let viewport = view.viewport;
        add_view_light(view, light.handle, viewport);
        added += 1;
    }
    added
}

/// Add every placed entity in a visible area whose bounds reach the view
/// frustum. Returns how many were added.
pub fn add_visible_entities(world: &RenderWorld, view: &mut ViewDef) -> usize {
    let mut added = 0;
    for entity in world.entities.iter().flatten() {
        if bounds_is_cleared(&entity.global_reference_bounds) {
            continue;
        }
        if !any_area_visible(view, &entity.areas) {
            continue;
        }
        if view.frustum.cull_bounds(&entity.global_reference_bounds) {
            continue;
        }
        let viewport = view.viewport;
        add_view_entity(view, entity.handle, viewport);
        added += 1;
    }
    added
}

/// Stamp the ambient surfaces of every on-screen view entity with the
/// view's counter, posing dynamic models on the way. Only stamped surfaces
/// get lit. Returns how many surfaces were stamped.
pub fn add_entity_ambient_surfaces(
    world: &mut RenderWorld,
    view: &ViewDef,
) -> InteractionResult<usize> {
    let mut stamped = 0;
    for (handle, view_entity) in &view.view_entities {
        if view_entity.scissor_rect.is_empty() {
            continue;
        }
        let entity = entity_def_mut(world, *handle)?;
        let Some(model) = entity_def_dynamic_model(entity, view.view_count) else {
            continue;
        };
        for index in 0..model.num_surfaces() {
            let Some(geometry) = model.surface(index).and_then(|s| s.geometry.as_ref()) else {
                continue;
            };
            geometry.write().ambient_view_count = view.view_count;
            stamped += 1;
        }
    }
    Ok(stamped)
}

/// Resolve the interactions of every view light. Returns how many draw
/// interactions were added to the view.
///
/// Each light list is walked up to its first EMPTY interaction. The next
/// link is read before resolving the current node, which may move it to
/// the tail. Entities the view does not see only take part when they cast
/// shadows.
pub fn add_light_interactions(
    world: &mut RenderWorld,
    view: &mut ViewDef,
    cache: &mut dyn VertexCacheManager,
) -> InteractionResult<usize> {
    let RenderWorld {
        lights,
        entities,
        pool,
        areas,
        config,
        ..
    } = world;

    let mut light_handles: Vec<LightHandle> = view.view_lights.keys().copied().collect();
    light_handles.sort_unstable();
    let before = view.draw_interactions.len();

    let mut frame = ActiveFrame {
        view,
        cache,
        areas: &**areas,
        config,
    };

    for handle in light_handles {
        let light = lights
            .get_mut(handle.index())
            .and_then(Option::as_mut)
            .ok_or_interaction(|| InteractionError::MissingLightDef(handle))?;

        let mut cursor = light.interactions.first;
        while let Some(id) = cursor {
            let interaction = pool.get(id)?;
            if interaction.is_empty() {
                break;
            }
            cursor = interaction.links(ListKind::Light).next;

            let entity_handle = interaction.entity;
            let entity = entities
                .get_mut(entity_handle.index())
                .and_then(Option::as_mut)
                .ok_or_interaction(|| InteractionError::MissingEntityDef(entity_handle))?;

            if !frame.view.view_entities.contains_key(&entity_handle) && !has_shadows(light, entity) {
                continue;
            }

            add_active_interaction(pool, id, light, entity, &mut frame)?;
        }
    }

    let added = frame.view.draw_interactions.len() - before;
    log::debug!(
        "[view_operations::add_light_interactions] View {} added {} draw interactions",
        frame.view.view_id,
        added
    );
    Ok(added)
}

/// Ambient stamping followed by light resolution
pub fn render_view(
    world: &mut RenderWorld,
    view: &mut ViewDef,
    cache: &mut dyn VertexCacheManager,
) -> InteractionResult<usize> {
    add_entity_ambient_surfaces(world, view)?;
    add_light_interactions(world, view, cache)
}
