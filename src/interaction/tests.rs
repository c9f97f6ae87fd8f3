//! Graph-level tests for the interaction subsystem
//!
//! Drives whole worlds through views and def churn and checks the
//! properties that must hold across every operation.

use super::*;
use crate::cache::test_support::{FullCache, RecordingCache};
use crate::config::InteractionConfig;
use crate::entity::{EntityHandle, EntityParms};
use crate::geometry::ScreenRect;
use crate::light::{LightHandle, LightParms};
use crate::cache::FrameVertexCache;
use crate::model::test_support::{cube_model_with, unit_cube_model, AnimatedModel, ReusingModel};
use crate::model::{Material, RenderModel};
use crate::view::{
    add_light_interactions, add_visible_entities, add_visible_lights, mark_area_visible,
    render_view, ViewDef,
};
use crate::world::{
    add_entity_def, add_light_def, begin_view, entity_def, free_entity_def, free_light_def,
    light_def, lookup_interaction, update_entity_def, update_light_def, RenderWorld, SingleArea,
};
use cgmath::{perspective, Deg, Matrix4, Point3, Vector3};
use std::sync::Arc;

fn new_world(config: InteractionConfig) -> RenderWorld {
    let _ = env_logger::builder().is_test(true).try_init();
    RenderWorld::new(Box::new(SingleArea), config)
}

fn unlit_cube_model() -> Arc<dyn RenderModel> {
    cube_model_with(vec![Some(Arc::new(Material::unlit("glow")))])
}

fn cube_at(model: Arc<dyn RenderModel>, x: f32) -> EntityParms {
    EntityParms::new(model, Point3::new(x, 0.0, 0.0))
}

/// View from (-40, 0, 0) looking down +x, with every light and entity it
/// sees already added
fn full_view(world: &mut RenderWorld) -> ViewDef {
    let view_count = begin_view(world);
    let eye = Point3::new(-40.0, 0.0, 0.0);
    let view = Matrix4::look_at_rh(eye, eye + Vector3::unit_x(), Vector3::unit_z());
    let proj = perspective(Deg(90.0), 1.0, 1.0, 1000.0);
    let mut def = ViewDef::new(1, view_count, eye, &(proj * view), ScreenRect::full(640, 480), 1);
    mark_area_visible(&mut def, 0);
    add_visible_lights(world, &mut def);
    add_visible_entities(world, &mut def);
    def
}

fn assert_empty_suffix(pool: &InteractionPool, head: &ListHead, kind: ListKind) {
    let ids = list_ids(pool, head, kind).expect("walk");
    let mut seen_empty = false;
    for id in ids {
        let empty = pool.get(id).expect("live").is_empty();
        assert!(!seen_empty || empty, "{:?} follows an EMPTY interaction", id);
        seen_empty |= empty;
    }
}

fn assert_all_lists_ordered(world: &RenderWorld) {
    for light in world.lights.iter().flatten() {
        assert_empty_suffix(&world.pool, &light.interactions, ListKind::Light);
    }
    for entity in world.entities.iter().flatten() {
        assert_empty_suffix(&world.pool, &entity.interactions, ListKind::Entity);
    }
}

/// A table cell is set exactly when the pair has an interaction on both lists
fn assert_table_consistent(world: &RenderWorld) {
    let table = world.table.as_ref().expect("table");
    for light in world.lights.iter().flatten() {
        let on_light = list_ids(&world.pool, &light.interactions, ListKind::Light).expect("walk");
        for entity in world.entities.iter().flatten() {
            let on_entity =
                list_ids(&world.pool, &entity.interactions, ListKind::Entity).expect("walk");
            let linked = on_light.iter().find(|id| {
                on_entity.contains(id) && world.pool.get(**id).expect("live").entity == entity.handle
            });
            assert_eq!(table.get(light.handle, entity.handle), linked.copied());
        }
    }
}

#[test]
fn test_empty_interactions_trail_both_lists() {
    let mut world = new_world(InteractionConfig::default());
    add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0)).expect("light");
    add_light_def(&mut world, LightParms::point(Point3::new(5.0, 5.0, 0.0), 60.0)).expect("light");
    add_entity_def(&mut world, cube_at(unit_cube_model(), 10.0)).expect("entity");
    add_entity_def(&mut world, cube_at(unlit_cube_model(), 12.0)).expect("entity");
    add_entity_def(&mut world, cube_at(unit_cube_model(), 14.0)).expect("entity");
    add_entity_def(&mut world, cube_at(unlit_cube_model(), 16.0)).expect("entity");

    let mut view = full_view(&mut world);
    let mut cache = RecordingCache::default();
    render_view(&mut world, &mut view, &mut cache).expect("render");

    // two lit entities under two lights
    assert_eq!(view.draw_interactions.len(), 4);
    let empties = world.pool.iter().filter(|(_, i)| i.is_empty()).count();
    assert_eq!(empties, 4);
    assert_eq!(world.pool.stats.made_empty, 4);
    assert_all_lists_ordered(&world);
}

#[test]
fn test_table_matches_lists_through_churn() {
    let mut world = new_world(InteractionConfig::default());
    let a = add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 40.0))
        .expect("light");
    let b = add_light_def(&mut world, LightParms::point(Point3::new(30.0, 0.0, 0.0), 40.0))
        .expect("light");
    let entities: Vec<EntityHandle> = (0..6)
        .map(|i| add_entity_def(&mut world, cube_at(unit_cube_model(), i as f32 * 10.0)).expect("entity"))
        .collect();
    assert_table_consistent(&world);

    update_light_def(&mut world, a, LightParms::point(Point3::new(50.0, 0.0, 0.0), 5.0))
        .expect("update");
    assert_table_consistent(&world);

    free_entity_def(&mut world, entities[3]).expect("free");
    update_entity_def(&mut world, entities[0], cube_at(unit_cube_model(), 28.0)).expect("update");
    assert_table_consistent(&world);

    free_light_def(&mut world, b).expect("free");
    assert_table_consistent(&world);
    add_entity_def(&mut world, cube_at(unit_cube_model(), 48.0)).expect("entity");
    assert_table_consistent(&world);

    let live: usize = world
        .lights
        .iter()
        .flatten()
        .map(|l| list_ids(&world.pool, &l.interactions, ListKind::Light).expect("walk").len())
        .sum();
    assert_eq!(live, world.pool.len());
    assert_eq!(world.table.as_ref().expect("table").count(), world.pool.len());
}

#[test]
fn test_alloc_then_free_restores_lists() {
    let mut world = new_world(InteractionConfig::default());
    let light = add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0))
        .expect("light");
    add_entity_def(&mut world, cube_at(unit_cube_model(), 10.0)).expect("entity");
    let mut parms = cube_at(unit_cube_model(), 20.0);
    // keep this one out of generation so the pair is free
    parms.light_channel = 0;
    let entity = add_entity_def(&mut world, parms).expect("entity");
    assert!(lookup_interaction(&world, light, entity).expect("lookup").is_none());

    let light_before = light_def(&world, light).expect("light").interactions;
    let entity_before = entity_def(&world, entity).expect("entity").interactions;
    let pool_before = world.pool.len();

    let RenderWorld {
        lights,
        entities,
        pool,
        table,
        ..
    } = &mut world;
    let light_ref = lights[light.index()].as_mut().expect("light");
    let entity_ref = entities[entity.index()].as_mut().expect("entity");
    let id = alloc_and_link(pool, table.as_mut(), light_ref, entity_ref).expect("alloc");
    assert_eq!(table.as_ref().expect("table").get(light, entity), Some(id));
    unlink_and_free(pool, table.as_mut(), id, light_ref, entity_ref).expect("free");

    assert_eq!(light_ref.interactions, light_before);
    assert_eq!(entity_ref.interactions, entity_before);
    assert_eq!(table.as_ref().expect("table").get(light, entity), None);
    assert_eq!(pool.len(), pool_before);
    assert!(!pool.contains(id));
}

#[test]
fn test_unlit_entity_becomes_empty_without_surfaces() {
    let mut world = new_world(InteractionConfig::default());
    let light = add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0))
        .expect("light");
    let entity = add_entity_def(&mut world, cube_at(unlit_cube_model(), 10.0)).expect("entity");

    let mut view = full_view(&mut world);
    render_view(&mut world, &mut view, &mut RecordingCache::default()).expect("render");

    let id = lookup_interaction(&world, light, entity)
        .expect("lookup")
        .expect("interaction");
    let interaction = world.pool.get(id).expect("live");
    assert!(interaction.is_empty());
    assert!(interaction.surfaces().is_empty());
    assert_eq!(interaction.num_surfaces(), 0);
    assert!(view.draw_interactions.is_empty());
}

#[test]
fn test_unchanged_pose_does_not_free_surfaces() {
    let mut world = new_world(InteractionConfig::default());
    let light = add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0))
        .expect("light");
    let animated = Arc::new(AnimatedModel::new());
    let model: Arc<dyn RenderModel> = animated.clone();
    let entity = add_entity_def(&mut world, cube_at(model, 10.0)).expect("entity");
    let mut cache = RecordingCache::default();

    let mut view = full_view(&mut world);
    render_view(&mut world, &mut view, &mut cache).expect("render");
    add_light_interactions(&mut world, &mut view, &mut cache).expect("again");

    assert_eq!(animated.instantiations(), 1);
    assert_eq!(world.pool.stats.free_surfaces, 0);
    assert_eq!(world.pool.stats.create_interactions, 1);
    assert_eq!(view.draw_interactions.len(), 2);
    let id = lookup_interaction(&world, light, entity)
        .expect("lookup")
        .expect("interaction");
    let interaction = world.pool.get(id).expect("live");
    assert!(interaction.has_skinning);
    assert_eq!(view.draw_interactions[0].skinning.map(|s| s.joint_buffer), Some(1));

    // the next view poses again, which invalidates the surfaces once
    let mut next = full_view(&mut world);
    render_view(&mut world, &mut next, &mut cache).expect("render");
    assert_eq!(animated.instantiations(), 2);
    assert_eq!(world.pool.stats.free_surfaces, 1);
    assert_eq!(world.pool.stats.create_interactions, 2);
    assert_eq!(next.draw_interactions[0].skinning.map(|s| s.joint_buffer), Some(2));
}

#[test]
fn test_reused_instance_keeps_surfaces_across_views() {
    let mut world = new_world(InteractionConfig::default());
    add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0)).expect("light");
    let reusing = Arc::new(ReusingModel::new());
    let model: Arc<dyn RenderModel> = reusing.clone();
    add_entity_def(&mut world, cube_at(model, 10.0)).expect("entity");
    let mut cache = RecordingCache::default();

    for _ in 0..3 {
        let mut view = full_view(&mut world);
        render_view(&mut world, &mut view, &mut cache).expect("render");
        assert_eq!(view.draw_interactions.len(), 1);
    }

    assert_eq!(reusing.builds(), 1);
    assert_eq!(world.pool.stats.free_surfaces, 0);
    assert_eq!(world.pool.stats.create_interactions, 1);
}

#[test]
fn test_cache_exhaustion_skips_surface_for_one_view() {
    let mut world = new_world(InteractionConfig::default());
    let light = add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0))
        .expect("light");
    let entity = add_entity_def(&mut world, cube_at(unit_cube_model(), 10.0)).expect("entity");

    let mut view = full_view(&mut world);
    let mut full = FullCache::default();
    assert_eq!(render_view(&mut world, &mut view, &mut full).expect("render"), 0);
    assert!(full.attempts > 0);

    // nothing about the failure sticks to the interaction
    let id = lookup_interaction(&world, light, entity)
        .expect("lookup")
        .expect("interaction");
    assert_eq!(world.pool.get(id).expect("live").num_surfaces(), 1);

    let mut next = full_view(&mut world);
    let mut cache = RecordingCache::default();
    assert_eq!(render_view(&mut world, &mut next, &mut cache).expect("render"), 1);
}

#[test]
fn test_evicted_caches_are_rebuilt_and_touched() {
    let mut world = new_world(InteractionConfig::default());
    add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0)).expect("light");
    add_entity_def(&mut world, cube_at(unit_cube_model(), 10.0)).expect("entity");
    let mut cache = RecordingCache::default();

    let mut view = full_view(&mut world);
    render_view(&mut world, &mut view, &mut cache).expect("render");
    assert_eq!(cache.allocs, 3);
    let first = view.draw_interactions[0].clone();

    // still resident: reused, only touched
    let mut next = full_view(&mut world);
    render_view(&mut world, &mut next, &mut cache).expect("render");
    assert_eq!(cache.allocs, 3);
    assert_eq!(next.draw_interactions[0].ambient_cache, first.ambient_cache);

    cache.evict(first.lighting_cache);
    let mut third = full_view(&mut world);
    render_view(&mut world, &mut third, &mut cache).expect("render");
    assert_eq!(cache.allocs, 4);
    let rebuilt = &third.draw_interactions[0];
    assert_ne!(rebuilt.lighting_cache, first.lighting_cache);
    assert!(cache.touched(rebuilt.lighting_cache));
}

#[test]
fn test_index_buffers_follow_config() {
    let config = InteractionConfig {
        use_index_buffers: false,
        ..InteractionConfig::default()
    };
    let mut world = new_world(config);
    add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0)).expect("light");
    add_entity_def(&mut world, cube_at(unit_cube_model(), 10.0)).expect("entity");

    let mut view = full_view(&mut world);
    let mut cache = RecordingCache::default();
    render_view(&mut world, &mut view, &mut cache).expect("render");
    assert!(view.draw_interactions[0].index_cache.is_none());
    assert_eq!(cache.allocs, 2);
}

#[test]
fn test_light_triangle_culling_counts_lit_triangles() {
    let config = InteractionConfig {
        cull_light_triangles: true,
        ..InteractionConfig::default()
    };
    let mut world = new_world(config);
    add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0)).expect("light");
    add_entity_def(&mut world, cube_at(unit_cube_model(), 10.0)).expect("entity");

    let mut view = full_view(&mut world);
    render_view(&mut world, &mut view, &mut RecordingCache::default()).expect("render");
    assert_eq!(view.draw_interactions[0].light_tri_count, Some(12));
}

#[test]
fn test_partly_lit_entity_uploads_only_lit_triangles() {
    let config = InteractionConfig {
        cull_light_triangles: true,
        ..InteractionConfig::default()
    };
    let mut world = new_world(config);
    add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 10.0)).expect("light");
    // spans x 9.5..11.5, across the light's +x face
    add_entity_def(&mut world, cube_at(unit_cube_model(), 10.5)).expect("entity");
    let mut cache = FrameVertexCache::new(1 << 20);
    cache.begin_frame();

    let mut view = full_view(&mut world);
    render_view(&mut world, &mut view, &mut cache).expect("render");
    let draw = view.draw_interactions[0].clone();
    let lit = draw.light_tri_count.expect("culled");
    assert!(lit > 0 && lit < 12);

    let handle = draw.index_cache.expect("index cache");
    let uploaded = cache.data(handle).expect("resident").len();
    assert_eq!(uploaded / (3 * std::mem::size_of::<u32>()), lit);

    // the subset belongs to the interaction and is reused while resident
    let entries = cache.num_entries();
    let mut next = full_view(&mut world);
    render_view(&mut world, &mut next, &mut cache).expect("render");
    assert_eq!(next.draw_interactions[0].index_cache, Some(handle));
    assert_eq!(cache.num_entries(), entries);
}

#[test]
fn test_suppressed_surfaces_respect_skip_flag() {
    for skip_suppress in [false, true] {
        let config = InteractionConfig {
            skip_suppress,
            ..InteractionConfig::default()
        };
        let mut world = new_world(config);
        add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0))
            .expect("light");
        let mut parms = cube_at(unit_cube_model(), 10.0);
        parms.suppress_surface_in_view_id = 1;
        add_entity_def(&mut world, parms).expect("entity");

        let mut view = full_view(&mut world);
        let drawn = render_view(&mut world, &mut view, &mut RecordingCache::default())
            .expect("render");
        assert_eq!(drawn, usize::from(skip_suppress));
    }
}

#[test]
fn test_pose_only_update_keeps_interactions() {
    let mut world = new_world(InteractionConfig::default());
    let light = add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0))
        .expect("light");
    let model = unit_cube_model();
    let entity = add_entity_def(&mut world, cube_at(Arc::clone(&model), 10.0)).expect("entity");

    let mut view = full_view(&mut world);
    render_view(&mut world, &mut view, &mut RecordingCache::default()).expect("render");
    let id = lookup_interaction(&world, light, entity)
        .expect("lookup")
        .expect("interaction");

    let mut parms = cube_at(model, 10.0);
    parms.force_virtual_texture_high_quality = true;
    update_entity_def(&mut world, entity, parms).expect("update");

    // same record, surfaces dropped for a rebuild
    assert_eq!(lookup_interaction(&world, light, entity).expect("lookup"), Some(id));
    assert!(world.pool.get(id).expect("live").is_deferred());

    let mut next = full_view(&mut world);
    render_view(&mut world, &mut next, &mut RecordingCache::default()).expect("render");
    assert!(next.draw_interactions[0].force_virtual_texture_high_quality);
}

#[test]
fn test_stale_ids_are_rejected_after_free() {
    let mut world = new_world(InteractionConfig::default());
    let light = add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0))
        .expect("light");
    let entity = add_entity_def(&mut world, cube_at(unit_cube_model(), 10.0)).expect("entity");
    let id = lookup_interaction(&world, light, entity)
        .expect("lookup")
        .expect("interaction");

    free_light_def(&mut world, light).expect("free");
    assert!(matches!(
        world.pool.get(id),
        Err(crate::error::InteractionError::StaleInteraction(_))
    ));
    let relit = add_light_def(&mut world, LightParms::point(Point3::new(0.0, 0.0, 0.0), 60.0))
        .expect("light");
    assert_eq!(relit, LightHandle(0));
    let fresh = lookup_interaction(&world, relit, entity)
        .expect("lookup")
        .expect("interaction");
    assert_ne!(fresh, id);
}
