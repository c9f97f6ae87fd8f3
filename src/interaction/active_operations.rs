//! Active interaction resolution
//!
//! Runs once per visible light per view for every interaction on the
//! light's list. Decides whether the pair draws anything this view, builds
//! the surface list on demand and makes sure every lit surface has live
//! vertex caches. Cache exhaustion only skips the affected surface; it is
//! retried on the next view since nothing about the failure is stored.

use super::cull_info::{calc_interaction_cull_bits, create_light_tris};
use super::interaction_data::{InteractionId, InteractionState};
use super::interaction_operations::{
    calc_interaction_scissor_rectangle, create_interaction, cull_interaction_by_view_frustum,
    free_surfaces, has_shadows,
};
use super::interaction_pool::InteractionPool;
use crate::cache::{CacheHandle, VertexCacheManager};
use crate::config::InteractionConfig;
use crate::entity::{entity_def_dynamic_model, EntityDef};
use crate::error::InteractionResult;
use crate::geometry::{global_point_to_local, potentially_inside_infinite_shadow, ScreenRect};
use crate::light::LightDef;
use crate::view::{DrawInteraction, ViewDef};
use crate::world::PortalAreas;

/// What happened to an interaction in this view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveOutcome {
    /// The light is not part of the view
    NotInView,
    /// The interaction volume is outside the view frustum
    Culled,
    /// Nothing of the pair can reach the screen
    ScissorEmpty,
    /// Vetoed by the entity's suppress/allow flags
    Suppressed,
    /// The entity has no surfaces to light this view
    NoModel,
    /// Evaluated and lights nothing
    Empty,
    /// Surfaces handed to the view
    Drawn { surfaces: usize },
}

/// Per-view collaborators of `add_active_interaction`
pub struct ActiveFrame<'a> {
    pub view: &'a mut ViewDef,
    pub cache: &'a mut dyn VertexCacheManager,
    pub areas: &'a dyn PortalAreas,
    pub config: &'a InteractionConfig,
}

fn suppressed(entity: &EntityDef, light: &LightDef, view_id: u32) -> bool {
    let parms = &entity.parms;
    if parms.suppress_shadow_in_view_id != 0 && parms.suppress_shadow_in_view_id == view_id {
        return true;
    }
    if parms.suppress_shadow_in_light_id != 0
        && parms.suppress_shadow_in_light_id == light.parms.light_id
    {
        return true;
    }
    if parms.suppress_surface_in_view_id != 0 && parms.suppress_surface_in_view_id == view_id {
        return true;
    }
    parms.allow_surface_in_view_id != 0 && parms.allow_surface_in_view_id != view_id
}

fn resident(cache: &dyn VertexCacheManager, handle: Option<CacheHandle>) -> Option<CacheHandle> {
    handle.filter(|h| cache.is_resident(*h))
}

/// Create and add whatever the interaction draws in this view.
///
/// A posed model whose generation moved on since the surfaces were built
/// invalidates them first; a deferred interaction is evaluated here.
pub fn add_active_interaction(
    pool: &mut InteractionPool,
    id: InteractionId,
    light: &mut LightDef,
    entity: &mut EntityDef,
    frame: &mut ActiveFrame<'_>,
) -> InteractionResult<ActiveOutcome> {
    let Some(view_light) = frame.view.view_lights.get(&light.handle).copied() else {
        return Ok(ActiveOutcome::NotInView);
    };
    let entity_scissor = frame
        .view
        .view_entities
        .get(&entity.handle)
        .map(|v| v.scissor_rect)
        .unwrap_or_else(ScreenRect::cleared);

    let casts_shadows = has_shadows(light, entity);
    let shadow_scissor = if !casts_shadows {
        entity_scissor
    } else if entity.parms.model.is_static_world_model() {
        view_light.scissor_rect
    } else {
        let interaction = pool.get_mut(id)?;
        if cull_interaction_by_view_frustum(
            interaction,
            light,
            entity,
            &frame.view.frustum,
            frame.areas,
            frame.config,
        ) && !frame.view.skip_frustum_interaction_check
        {
            return Ok(ActiveOutcome::Culled);
        }
        calc_interaction_scissor_rectangle(&view_light.scissor_rect)
    };

    // get out before posing the model
    if shadow_scissor.is_empty() {
        return Ok(ActiveOutcome::ScissorEmpty);
    }

    if !frame.config.skip_suppress && suppressed(entity, light, frame.view.view_id) {
        return Ok(ActiveOutcome::Suppressed);
    }

    // posed once per view, even when the entity itself is not visible
    let Some(model) = entity_def_dynamic_model(entity, frame.view.view_count) else {
        return Ok(ActiveOutcome::NoModel);
    };
    if model.num_surfaces() == 0 {
        return Ok(ActiveOutcome::NoModel);
    }

    let interaction = pool.get(id)?;
    if !interaction.is_deferred()
        && interaction.dynamic_model_frame_count != entity.dynamic_model_frame_count
    {
        free_surfaces(pool, id, light, entity)?;
    }
    pool.get_mut(id)?.dynamic_model_frame_count = entity.dynamic_model_frame_count;

    if pool.get(id)?.is_deferred() {
        create_interaction(pool, id, model.as_ref(), light, entity, entity_scissor)?;
    }

    let local_light_origin = global_point_to_local(&entity.model_matrix, light.global_light_origin);
    let local_view_origin = global_point_to_local(&entity.model_matrix, frame.view.origin);

    // shadows may still matter when this is empty, lit surfaces do not
    let light_scissor = view_light.scissor_rect.intersected(&entity_scissor);

    let interaction = pool.get_mut(id)?;
    let InteractionState::Populated { surfaces } = &mut interaction.state else {
        return Ok(ActiveOutcome::Empty);
    };
    if light_scissor.is_empty() {
        return Ok(ActiveOutcome::Drawn { surfaces: 0 });
    }

    let cache = &mut *frame.cache;
    let mut drawn = 0;
    for (index, surface) in surfaces.iter_mut().enumerate() {
        let (Some(shader), Some(shared)) = (surface.shader.clone(), surface.ambient_tris.clone())
        else {
            continue;
        };
        let mut tri = shared.write();

        // only surfaces the visibility pass drew this view get lit
        if tri.ambient_view_count != frame.view.view_count {
            continue;
        }

        let light_tri_count = if frame.config.cull_light_triangles {
            calc_interaction_cull_bits(&tri, &entity.model_matrix, &light.frustum, &mut surface.cull_info);
            let count = match &surface.cull_info.light_tris {
                Some(indexes) => indexes.len() / 3,
                None => create_light_tris(&tri, &mut surface.cull_info),
            };
            if count == 0 {
                continue;
            }
            Some(count)
        } else {
            surface.cull_info.clear();
            surface.light_index_cache = None;
            None
        };

        if resident(cache, tri.ambient_cache).is_none()
            && !cache.create_ambient_cache(&mut tri, shader.receives_lighting())
        {
            continue;
        }
        let Some(ambient_cache) = tri.ambient_cache else {
            continue;
        };
        cache.touch(ambient_cache);

        if resident(cache, tri.lighting_cache).is_none()
            && !cache.create_lighting_cache(&mut tri, local_light_origin)
        {
            continue;
        }
        let Some(lighting_cache) = tri.lighting_cache else {
            continue;
        };
        cache.touch(lighting_cache);

        let index_cache = if !frame.config.use_index_buffers {
            None
        } else if let Some(light_tris) = surface.cull_info.light_tris.as_deref() {
            if resident(cache, surface.light_index_cache).is_none() {
                surface.light_index_cache = cache.alloc_index_cache(light_tris);
            }
            resident(cache, surface.light_index_cache)
        } else {
            if resident(cache, tri.index_cache).is_none() {
                tri.index_cache = cache.alloc_index_cache(&tri.indexes);
            }
            resident(cache, tri.index_cache)
        };
        if let Some(handle) = index_cache {
            cache.touch(handle);
        }

        let inside_infinite_shadow = casts_shadows
            && potentially_inside_infinite_shadow(
                &tri.bounds,
                local_view_origin,
                local_light_origin,
                frame.view.z_near,
            );

        frame.view.draw_interactions.push(DrawInteraction {
            light: light.handle,
            entity: entity.handle,
            surface: index,
            shader,
            scissor_rect: light_scissor,
            skinning: surface.skinning,
            ambient_cache,
            lighting_cache,
            index_cache,
            light_tri_count,
            inside_infinite_shadow,
            force_virtual_texture_high_quality: surface.force_virtual_texture_high_quality,
        });
        drawn += 1;
    }

    Ok(ActiveOutcome::Drawn { surfaces: drawn })
}
