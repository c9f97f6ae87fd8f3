//! Interaction Operations - Pure DOP Functions
//!
//! State transitions of a single interaction. Every transition keeps the
//! three indexes of the graph consistent: the light's list, the entity's
//! list and the dense table. EMPTY interactions always sit at the tail of
//! both lists, so walks may stop at the first one they meet.

use super::interaction_data::{
    FrustumState, Interaction, InteractionId, InteractionState, ListHead, ListKind, ListLinks,
    SurfaceInteraction,
};
use super::interaction_pool::InteractionPool;
use super::interaction_table::InteractionTable;
use crate::config::InteractionConfig;
use crate::constants::channels::LIGHT_CHANNEL_WORLD;
use crate::constants::world::MAX_WORLD_SIZE;
use crate::entity::EntityDef;
use crate::error::{InteractionError, InteractionResult};
use crate::geometry::{
    bounds_add_point, bounds_contains_point, bounds_corners, bounds_intersection,
    bounds_intersects, bounds_is_cleared, bounds_translated, local_point_to_global, ScreenRect,
    ViewFrustum,
};
use crate::light::LightDef;
use crate::model::{remap_shader_by_skin, RenderModel};
use crate::world::PortalAreas;
use cgmath::{EuclideanSpace, InnerSpace};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// List plumbing
// ---------------------------------------------------------------------------

fn link_at_head(
    pool: &mut InteractionPool,
    id: InteractionId,
    kind: ListKind,
    head: &mut ListHead,
) -> InteractionResult<()> {
    let old_first = head.first;
    if let Some(next) = old_first {
        pool.get_mut(next)?.links_mut(kind).prev = Some(id);
    } else {
        head.last = Some(id);
    }
    *pool.get_mut(id)?.links_mut(kind) = ListLinks {
        prev: None,
        next: old_first,
    };
    head.first = Some(id);
    Ok(())
}

fn link_at_tail(
    pool: &mut InteractionPool,
    id: InteractionId,
    kind: ListKind,
    head: &mut ListHead,
) -> InteractionResult<()> {
    let old_last = head.last;
    if let Some(prev) = old_last {
        pool.get_mut(prev)?.links_mut(kind).next = Some(id);
    } else {
        head.first = Some(id);
    }
    *pool.get_mut(id)?.links_mut(kind) = ListLinks {
        prev: old_last,
        next: None,
    };
    head.last = Some(id);
    Ok(())
}

fn unlink_from(
    pool: &mut InteractionPool,
    id: InteractionId,
    kind: ListKind,
    head: &mut ListHead,
) -> InteractionResult<()> {
    let ListLinks { prev, next } = *pool.get(id)?.links(kind);

    match prev {
        Some(prev) => pool.get_mut(prev)?.links_mut(kind).next = next,
        None => head.first = next,
    }
    match next {
        Some(next) => pool.get_mut(next)?.links_mut(kind).prev = prev,
        None => head.last = prev,
    }

    *pool.get_mut(id)?.links_mut(kind) = ListLinks::default();
    Ok(())
}

fn check_owners(
    interaction: &Interaction,
    light: &LightDef,
    entity: &EntityDef,
) -> InteractionResult<()> {
    if interaction.light != light.handle || interaction.entity != entity.handle {
        log::error!(
            "[interaction_operations::check_owners] Interaction of light {} / entity {} used with light {} / entity {}",
            interaction.light.0,
            interaction.entity.0,
            light.handle.0,
            entity.handle.0
        );
        return Err(InteractionError::InvalidHandle(format!(
            "interaction belongs to light {} and entity {}",
            interaction.light.0, interaction.entity.0
        )));
    }
    Ok(())
}

/// Ids of a list in walk order
pub fn list_ids(
    pool: &InteractionPool,
    head: &ListHead,
    kind: ListKind,
) -> InteractionResult<Vec<InteractionId>> {
    let mut ids = Vec::new();
    let mut cursor = head.first;
    while let Some(id) = cursor {
        ids.push(id);
        cursor = pool.get(id)?.links(kind).next;
    }
    Ok(ids)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Allocate a DEFERRED interaction and link it at the head of both lists.
///
/// The table cell must be free; an occupied cell is a consistency violation
/// and nothing is allocated.
pub fn alloc_and_link(
    pool: &mut InteractionPool,
    table: Option<&mut InteractionTable>,
    light: &mut LightDef,
    entity: &mut EntityDef,
) -> InteractionResult<InteractionId> {
    if let Some(existing) = table.as_ref().and_then(|t| t.get(light.handle, entity.handle)) {
        log::error!(
            "[interaction_operations::alloc_and_link] Non-null table entry [{}][{}] ({:?})",
            light.handle.0,
            entity.handle.0,
            existing
        );
        return Err(InteractionError::TableCellOccupied {
            light: light.handle.0,
            entity: entity.handle.0,
        });
    }

    let mut light_channel = entity.parms.light_channel;
    // world meshes are implicitly on the world channel
    if entity.parms.model.is_world_mesh() {
        light_channel |= 1 << LIGHT_CHANNEL_WORLD;
    }

    let id = pool.alloc(Interaction::new(light.handle, entity.handle, light_channel));
    link_at_head(pool, id, ListKind::Light, &mut light.interactions)?;
    link_at_head(pool, id, ListKind::Entity, &mut entity.interactions)?;

    if let Some(table) = table {
        table.insert(light.handle, entity.handle, id)?;
    }

    Ok(id)
}

/// Remove from both lists. The table cell is left alone.
pub fn unlink(
    pool: &mut InteractionPool,
    id: InteractionId,
    light: &mut LightDef,
    entity: &mut EntityDef,
) -> InteractionResult<()> {
    check_owners(pool.get(id)?, light, entity)?;
    unlink_from(pool, id, ListKind::Entity, &mut entity.interactions)?;
    unlink_from(pool, id, ListKind::Light, &mut light.interactions)
}

/// Discard the surfaces and move the interaction to the tail of both lists
pub fn make_empty(
    pool: &mut InteractionPool,
    id: InteractionId,
    light: &mut LightDef,
    entity: &mut EntityDef,
) -> InteractionResult<()> {
    unlink(pool, id, light, entity)?;

    let interaction = pool.get_mut(id)?;
    interaction.state = InteractionState::Empty;
    interaction.has_skinning = false;
    pool.stats.made_empty += 1;

    link_at_tail(pool, id, ListKind::Entity, &mut entity.interactions)?;
    link_at_tail(pool, id, ListKind::Light, &mut light.interactions)
}

/// Drop the surfaces but keep the interaction linked, so it gets rebuilt on
/// its next use. Returns false when it was already deferred.
///
/// An EMPTY interaction moves back to the head of both lists, since a
/// deferred one must not trail the empty suffix.
pub fn free_surfaces(
    pool: &mut InteractionPool,
    id: InteractionId,
    light: &mut LightDef,
    entity: &mut EntityDef,
) -> InteractionResult<bool> {
    let interaction = pool.get(id)?;
    check_owners(interaction, light, entity)?;

    let was_empty = match interaction.state {
        InteractionState::Deferred => return Ok(false),
        InteractionState::Empty => true,
        InteractionState::Populated { .. } => false,
    };

    let interaction = pool.get_mut(id)?;
    // cull info goes with the surfaces
    interaction.state = InteractionState::Deferred;
    interaction.has_skinning = false;
    pool.stats.free_surfaces += 1;

    if was_empty {
        unlink(pool, id, light, entity)?;
        link_at_head(pool, id, ListKind::Light, &mut light.interactions)?;
        link_at_head(pool, id, ListKind::Entity, &mut entity.interactions)?;
    }
    Ok(true)
}

/// Clear the table cell, unlink, and give the interaction back to the pool.
///
/// A table cell that does not reference this interaction means the graph is
/// corrupt; the error is returned before anything changes.
pub fn unlink_and_free(
    pool: &mut InteractionPool,
    table: Option<&mut InteractionTable>,
    id: InteractionId,
    light: &mut LightDef,
    entity: &mut EntityDef,
) -> InteractionResult<()> {
    check_owners(pool.get(id)?, light, entity)?;

    if let Some(table) = table {
        table.check(light.handle, entity.handle, id)?;
        table.remove(light.handle, entity.handle, id)?;
    }

    unlink(pool, id, light, entity)?;

    // surfaces, cull info and area references all go with the record
    pool.free(id)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub fn has_light_channel(interaction: &Interaction, channel: u32) -> bool {
    channel < 64 && interaction.light_channel & (1u64 << channel) != 0
}

pub fn has_shadows(light: &LightDef, entity: &EntityDef) -> bool {
    !light.parms.no_shadows && !entity.parms.no_shadow
}

/// Bytes held by the interaction's generated data
pub fn interaction_memory_used(interaction: &Interaction) -> usize {
    let surfaces = interaction.surfaces();
    let mut total = surfaces.len() * std::mem::size_of::<SurfaceInteraction>();
    for surface in surfaces {
        if let Some(tris) = &surface.cull_info.light_tris {
            total += tris.len() * std::mem::size_of::<u32>();
        }
        if let Some(super::cull_info::CullBits::PerVertex(bits)) = &surface.cull_info.cull_bits {
            total += bits.len();
        }
    }
    total + interaction.frustum_areas.len() * std::mem::size_of::<usize>()
}

// ---------------------------------------------------------------------------
// Surface generation
// ---------------------------------------------------------------------------

/// Build the surface list of a DEFERRED interaction.
///
/// Model bounds are moved by the entity origin (not rotated) and compared
/// against the light bounds first; a miss makes the interaction EMPTY
/// without allocating any slots. Otherwise there is one slot per model
/// surface, filled in only for surfaces whose effective shader receives
/// lighting. If none does, the slots are dropped and the interaction is
/// EMPTY. Calling this on an interaction that is not deferred does nothing.
pub fn create_interaction(
    pool: &mut InteractionPool,
    id: InteractionId,
    model: &dyn RenderModel,
    light: &mut LightDef,
    entity: &mut EntityDef,
    entity_scissor: ScreenRect,
) -> InteractionResult<()> {
    let interaction = pool.get(id)?;
    check_owners(interaction, light, entity)?;
    if !interaction.is_deferred() {
        return Ok(());
    }
    pool.stats.create_interactions += 1;

    let bounds = bounds_translated(&model.bounds(Some(&entity.parms)), entity.parms.origin.to_vec());
    if !bounds_intersects(&bounds, &light.global_light_bounds) {
        return make_empty(pool, id, light, entity);
    }

    let parms = &entity.parms;
    let mut surfaces = vec![SurfaceInteraction::default(); model.num_surfaces()];
    let mut generated = false;
    let mut has_skinning = false;

    for (index, slot) in surfaces.iter_mut().enumerate() {
        let Some(surface) = model.surface(index) else {
            continue;
        };
        let Some(tri) = surface.geometry.as_ref() else {
            continue;
        };

        let Some(shader) = remap_shader_by_skin(
            surface.shader.as_ref(),
            parms.custom_skin.as_deref(),
            parms.custom_shader.as_ref(),
        ) else {
            continue;
        };
        if !shader.receives_lighting() {
            continue;
        }

        slot.scissor_rect = entity_scissor;
        slot.force_virtual_texture_high_quality = parms.force_virtual_texture_high_quality;
        if model.is_skeletal_mesh() {
            slot.skinning = model.skinning();
            has_skinning = true;
        }
        // shared with the ambient pass so vertex caches are reused
        slot.ambient_tris = Some(Arc::clone(tri));
        slot.shader = Some(shader);
        generated = true;
    }

    if !generated {
        return make_empty(pool, id, light, entity);
    }

    let interaction = pool.get_mut(id)?;
    interaction.state = InteractionState::Populated { surfaces };
    interaction.has_skinning = has_skinning;
    Ok(())
}

// ---------------------------------------------------------------------------
// Culling
// ---------------------------------------------------------------------------

/// True when the interaction volume is entirely outside the view.
///
/// The volume is the entity box extruded away from the light origin and
/// constrained to the light bounds. It is built once and memoized; when the
/// light origin sits inside the entity box there is no usable volume and
/// the interaction is never culled.
pub fn cull_interaction_by_view_frustum(
    interaction: &mut Interaction,
    light: &LightDef,
    entity: &EntityDef,
    view_frustum: &ViewFrustum,
    areas: &dyn PortalAreas,
    config: &InteractionConfig,
) -> bool {
    if !config.use_interaction_culling {
        return false;
    }

    match interaction.frustum_state {
        FrustumState::Invalid => return false,
        FrustumState::Valid => {}
        FrustumState::Uninitialized => {
            let light_origin = light.global_light_origin;
            let corners = bounds_corners(&entity.reference_bounds)
                .map(|corner| local_point_to_global(&entity.model_matrix, corner));

            if bounds_is_cleared(&entity.global_reference_bounds)
                || bounds_contains_point(&entity.global_reference_bounds, light_origin)
            {
                interaction.frustum_state = FrustumState::Invalid;
                return false;
            }

            let mut volume = entity.global_reference_bounds;
            for corner in corners {
                let away = corner - light_origin;
                if away.magnitude2() > 0.0 {
                    bounds_add_point(&mut volume, corner + away.normalize() * MAX_WORLD_SIZE);
                }
            }
            let volume = bounds_intersection(&volume, &light.global_light_bounds);

            if bounds_is_cleared(&volume) {
                interaction.frustum_state = FrustumState::Invalid;
                return false;
            }

            interaction.frustum_bounds = volume;
            interaction.frustum_areas = areas.areas_for_bounds(&volume);
            interaction.frustum_state = FrustumState::Valid;
        }
    }

    view_frustum.cull_bounds(&interaction.frustum_bounds)
}

/// Scissor used for shadow-casting interactions: the light's full scissor
pub fn calc_interaction_scissor_rectangle(light_scissor: &ScreenRect) -> ScreenRect {
    *light_scissor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{update_entity_model_matrix, EntityHandle, EntityParms};
    use crate::light::{derive_light_data, LightHandle, LightParms};
    use crate::model::test_support::{cube_model_with, unit_cube_model};
    use crate::model::Material;
    use crate::world::SingleArea;
    use cgmath::{Matrix4, Point3};

    fn light_at(index: u32, origin: Point3<f32>, radius: f32) -> LightDef {
        let mut light = LightDef::new(LightHandle(index), LightParms::point(origin, radius));
        derive_light_data(&mut light);
        light
    }

    fn entity_at(index: u32, origin: Point3<f32>) -> EntityDef {
        let mut entity = EntityDef::new(EntityHandle(index), EntityParms::new(unit_cube_model(), origin));
        update_entity_model_matrix(&mut entity);
        entity.reference_bounds = entity.parms.model.bounds(None);
        entity.global_reference_bounds =
            crate::geometry::bounds_transformed(&entity.reference_bounds, &entity.model_matrix);
        entity
    }

    #[test]
    fn test_alloc_links_at_head() {
        let mut pool = InteractionPool::new();
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let mut a = entity_at(0, Point3::new(0.0, 0.0, 0.0));
        let mut b = entity_at(1, Point3::new(5.0, 0.0, 0.0));

        let first = alloc_and_link(&mut pool, None, &mut light, &mut a).expect("alloc");
        let second = alloc_and_link(&mut pool, None, &mut light, &mut b).expect("alloc");

        assert_eq!(
            list_ids(&pool, &light.interactions, ListKind::Light).expect("walk"),
            vec![second, first]
        );
        assert_eq!(light.interactions.last, Some(first));
        assert_eq!(pool.get(first).expect("live").num_surfaces(), -1);
    }

    #[test]
    fn test_world_mesh_joins_world_channel() {
        let mut pool = InteractionPool::new();
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let world_model = crate::model::StaticModel::new("world").as_world_mesh(true);
        let mut entity = EntityDef::new(
            EntityHandle(0),
            EntityParms::new(Arc::new(world_model), Point3::new(0.0, 0.0, 0.0)),
        );

        let id = alloc_and_link(&mut pool, None, &mut light, &mut entity).expect("alloc");
        let interaction = pool.get(id).expect("live");
        assert!(has_light_channel(interaction, LIGHT_CHANNEL_WORLD));
        assert!(has_light_channel(interaction, 0));
        assert!(!has_light_channel(interaction, 5));
    }

    #[test]
    fn test_make_empty_moves_to_tail() {
        let mut pool = InteractionPool::new();
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let mut a = entity_at(0, Point3::new(0.0, 0.0, 0.0));
        let mut b = entity_at(1, Point3::new(5.0, 0.0, 0.0));

        let first = alloc_and_link(&mut pool, None, &mut light, &mut a).expect("alloc");
        let second = alloc_and_link(&mut pool, None, &mut light, &mut b).expect("alloc");
        make_empty(&mut pool, second, &mut light, &mut b).expect("empty");

        assert_eq!(
            list_ids(&pool, &light.interactions, ListKind::Light).expect("walk"),
            vec![first, second]
        );
        assert_eq!(b.interactions.first, Some(second));
        assert_eq!(pool.get(second).expect("live").num_surfaces(), 0);
    }

    #[test]
    fn test_free_surfaces_relinks_empty_at_head() {
        let mut pool = InteractionPool::new();
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let mut a = entity_at(0, Point3::new(0.0, 0.0, 0.0));
        let mut b = entity_at(1, Point3::new(5.0, 0.0, 0.0));

        let first = alloc_and_link(&mut pool, None, &mut light, &mut a).expect("alloc");
        let second = alloc_and_link(&mut pool, None, &mut light, &mut b).expect("alloc");
        make_empty(&mut pool, first, &mut light, &mut a).expect("empty");

        assert!(free_surfaces(&mut pool, first, &mut light, &mut a).expect("free"));
        assert_eq!(
            list_ids(&pool, &light.interactions, ListKind::Light).expect("walk"),
            vec![first, second]
        );
        assert!(pool.get(first).expect("live").is_deferred());

        // second free is a no-op
        assert!(!free_surfaces(&mut pool, first, &mut light, &mut a).expect("free"));
        assert_eq!(pool.stats.free_surfaces, 1);
    }

    #[test]
    fn test_unlink_and_free_checks_table() {
        let mut pool = InteractionPool::new();
        let mut table = InteractionTable::new(1, 2, 0);
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let mut a = entity_at(0, Point3::new(0.0, 0.0, 0.0));
        let mut b = entity_at(1, Point3::new(0.0, 0.0, 0.0));

        let id_a = alloc_and_link(&mut pool, Some(&mut table), &mut light, &mut a).expect("alloc");
        let id_b = alloc_and_link(&mut pool, Some(&mut table), &mut light, &mut b).expect("alloc");

        // corrupt the table behind the graph's back
        table.remove(LightHandle(0), EntityHandle(1), id_b).expect("remove");
        let err = unlink_and_free(&mut pool, Some(&mut table), id_b, &mut light, &mut b)
            .expect_err("mismatch");
        assert!(err.is_consistency_violation());
        assert!(pool.contains(id_b));

        unlink_and_free(&mut pool, Some(&mut table), id_a, &mut light, &mut a).expect("free");
        assert!(!pool.contains(id_a));
        assert_eq!(table.get(LightHandle(0), EntityHandle(0)), None);
        assert!(a.interactions.is_empty());
    }

    #[test]
    fn test_alloc_into_occupied_cell_fails_without_side_effects() {
        let mut pool = InteractionPool::new();
        let mut table = InteractionTable::new(1, 1, 0);
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let mut entity = entity_at(0, Point3::new(0.0, 0.0, 0.0));

        alloc_and_link(&mut pool, Some(&mut table), &mut light, &mut entity).expect("alloc");
        let before = light.interactions;
        assert!(matches!(
            alloc_and_link(&mut pool, Some(&mut table), &mut light, &mut entity),
            Err(InteractionError::TableCellOccupied { light: 0, entity: 0 })
        ));
        assert_eq!(light.interactions, before);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_create_interaction_populates_lit_surfaces() {
        let mut pool = InteractionPool::new();
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let model = cube_model_with(vec![
            Some(Arc::new(Material::lit("stone"))),
            Some(Arc::new(Material::unlit("glow"))),
            None,
        ]);
        let mut entity = EntityDef::new(
            EntityHandle(0),
            EntityParms::new(Arc::clone(&model), Point3::new(0.0, 0.0, 0.0)),
        );

        let id = alloc_and_link(&mut pool, None, &mut light, &mut entity).expect("alloc");
        let scissor = ScreenRect::new(0, 0, 63, 63);
        create_interaction(&mut pool, id, model.as_ref(), &mut light, &mut entity, scissor)
            .expect("create");

        let interaction = pool.get(id).expect("live");
        assert_eq!(interaction.num_surfaces(), 3);
        let surfaces = interaction.surfaces();
        assert!(surfaces[0].shader.is_some());
        assert_eq!(surfaces[0].scissor_rect, scissor);
        assert!(surfaces[0].ambient_tris.is_some());
        assert!(surfaces[1].shader.is_none());
        assert!(surfaces[2].ambient_tris.is_none());
        assert_eq!(pool.stats.create_interactions, 1);
    }

    #[test]
    fn test_distant_entity_becomes_empty_without_slots() {
        let mut pool = InteractionPool::new();
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 10.0);
        let mut entity = entity_at(0, Point3::new(500.0, 0.0, 0.0));
        let model = Arc::clone(&entity.parms.model);

        let id = alloc_and_link(&mut pool, None, &mut light, &mut entity).expect("alloc");
        create_interaction(
            &mut pool,
            id,
            model.as_ref(),
            &mut light,
            &mut entity,
            ScreenRect::full(64, 64),
        )
        .expect("create");

        let interaction = pool.get(id).expect("live");
        assert!(interaction.is_empty());
        assert!(interaction.surfaces().is_empty());
    }

    #[test]
    fn test_interaction_culling_memoizes_volume() {
        let mut pool = InteractionPool::new();
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let mut entity = entity_at(0, Point3::new(20.0, 0.0, 0.0));
        let id = alloc_and_link(&mut pool, None, &mut light, &mut entity).expect("alloc");
        let config = InteractionConfig {
            use_interaction_culling: true,
            ..InteractionConfig::default()
        };

        // camera at the far side looking further away from the volume
        let view = cgmath::perspective(cgmath::Deg(90.0), 1.0, 1.0, 1000.0)
            * Matrix4::look_at_rh(
                Point3::new(-50.0, 0.0, 0.0),
                Point3::new(-100.0, 0.0, 0.0),
                cgmath::Vector3::unit_z(),
            );
        let frustum = ViewFrustum::from_view_proj(&view);

        let interaction = pool.get_mut(id).expect("live");
        assert!(cull_interaction_by_view_frustum(
            interaction, &light, &entity, &frustum, &SingleArea, &config
        ));
        assert_eq!(interaction.frustum_state, FrustumState::Valid);
        assert_eq!(interaction.frustum_areas, vec![0]);
        // volume runs from the entity out to the light's +x face
        assert!((interaction.frustum_bounds.max.x - 100.0).abs() < 1e-3);
        assert!((interaction.frustum_bounds.min.x - 19.0).abs() < 1e-3);
    }

    #[test]
    fn test_light_inside_entity_is_never_culled() {
        let mut pool = InteractionPool::new();
        let mut light = light_at(0, Point3::new(0.0, 0.0, 0.0), 100.0);
        let mut entity = entity_at(0, Point3::new(0.5, 0.0, 0.0));
        let id = alloc_and_link(&mut pool, None, &mut light, &mut entity).expect("alloc");
        let config = InteractionConfig {
            use_interaction_culling: true,
            ..InteractionConfig::default()
        };
        let frustum = ViewFrustum::from_view_proj(&Matrix4::from_translation(cgmath::Vector3::new(
            0.0, 0.0, -5000.0,
        )));

        let interaction = pool.get_mut(id).expect("live");
        assert!(!cull_interaction_by_view_frustum(
            interaction, &light, &entity, &frustum, &SingleArea, &config
        ));
        assert_eq!(interaction.frustum_state, FrustumState::Invalid);
    }
}
