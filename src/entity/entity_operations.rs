//! Entity Operations - Pure DOP Functions

use super::entity_data::EntityDef;
use crate::constants::world::BIG_REFERENCE_SIZE;
use crate::geometry::{
    bounds_corners, bounds_from_points, bounds_is_cleared, bounds_size, cleared_bounds,
    create_from_origin_axis, local_point_to_global,
};
use crate::model::{same_model, DynamicModelKind, RenderModel};
use crate::world::PortalAreas;
use std::sync::Arc;

/// Refresh the entity's model matrix from its parms
pub fn update_entity_model_matrix(def: &mut EntityDef) {
    def.model_matrix = create_from_origin_axis(def.parms.origin, &def.parms.axis);
}

/// Place the entity in the area graph.
///
/// Reference bounds come from the model, or from the caller supplied
/// conservative bounds for entities whose model is expensive to pose.
/// Entities with cleared bounds (an empty particle system, say) are not
/// placed anywhere. Bumps `view_count` when the entity gets placed.
pub fn create_entity_refs(
    def: &mut EntityDef,
    areas: &dyn PortalAreas,
    show_updates: bool,
    view_count: &mut u64,
) {
    def.reference_bounds = match def.parms.callback_bounds {
        Some(bounds) => bounds,
        None => def.parms.model.bounds(Some(&def.parms)),
    };

    if bounds_is_cleared(&def.reference_bounds) {
        def.global_reference_bounds = cleared_bounds();
        def.areas.clear();
        return;
    }

    let size = bounds_size(&def.reference_bounds);
    if show_updates && (size.x > BIG_REFERENCE_SIZE || size.y > BIG_REFERENCE_SIZE) {
        log::warn!(
            "[entity_operations::create_entity_refs] big entityRef: {},{}",
            size.x,
            size.y
        );
    }

    let model_matrix = def.model_matrix;
    def.global_reference_bounds = bounds_from_points(
        bounds_corners(&def.reference_bounds)
            .iter()
            .map(|corner| local_point_to_global(&model_matrix, *corner)),
    );
    def.areas = areas.areas_for_bounds(&def.global_reference_bounds);

    *view_count += 1;
}

/// The model whose surfaces get lit for this entity in the given view.
///
/// Static models are returned as is. Dynamic models are instantiated at
/// most once per view. Only an instance that differs from the previous one
/// bumps the entity's dynamic model generation, so interactions built on
/// an unchanged pose keep their surfaces.
pub fn entity_def_dynamic_model(def: &mut EntityDef, view_count: u64) -> Option<Arc<dyn RenderModel>> {
    let kind = def.parms.model.dynamic_model_kind();
    if kind == DynamicModelKind::Static {
        return Some(Arc::clone(&def.parms.model));
    }

    if def.dynamic_model.is_some() && def.dynamic_model_view_count == view_count {
        return def.dynamic_model.clone();
    }

    let cached = match kind {
        DynamicModelKind::Cached => def.cached_dynamic_model.as_ref(),
        _ => None,
    };
    let instance = def.parms.model.instantiate_dynamic_model(&def.parms, cached);

    let reposed = match (&instance, &def.cached_dynamic_model) {
        (Some(new), Some(old)) => !same_model(new, old),
        (None, None) => false,
        _ => true,
    };
    if reposed {
        def.dynamic_model_frame_count += 1;
    }

    def.cached_dynamic_model = instance.clone();
    def.dynamic_model = instance.clone();
    def.dynamic_model_view_count = view_count;

    instance
}

/// Drop every decal on the entity
pub fn free_entity_def_decals(def: &mut EntityDef) {
    def.decals.clear();
}

/// Drop decals that have completely faded by `time`
pub fn free_entity_def_faded_decals(def: &mut EntityDef, time: i64) {
    def.decals.retain(|decal| decal.fade_end_time > time);
}

pub fn free_entity_def_overlay(def: &mut EntityDef) {
    def.overlay = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Decal, EntityHandle, EntityParms, Overlay};
    use crate::geometry::create_bounds;
    use crate::model::test_support::{unit_cube_model, AnimatedModel, DefaultCachedModel, ReusingModel};
    use crate::model::{Material, StaticModel};
    use crate::world::{BoxAreas, SingleArea};
    use cgmath::{Deg, Matrix3, Point3, Rad};

    fn placed(parms: EntityParms) -> EntityDef {
        let mut def = EntityDef::new(EntityHandle(0), parms);
        update_entity_model_matrix(&mut def);
        def
    }

    #[test]
    fn test_refs_use_rotated_corners() {
        let mut parms = EntityParms::new(unit_cube_model(), Point3::new(100.0, 0.0, 0.0));
        parms.axis = Matrix3::from_angle_z(Rad::from(Deg(45.0)));
        let mut def = placed(parms);
        let mut view_count = 0;

        create_entity_refs(&mut def, &SingleArea, false, &mut view_count);
        assert_eq!(view_count, 1);
        assert_eq!(def.areas, vec![0]);
        let half_diagonal = 2.0_f32.sqrt();
        assert!((def.global_reference_bounds.max.x - (100.0 + half_diagonal)).abs() < 1e-3);
    }

    #[test]
    fn test_callback_bounds_override_model() {
        let mut parms = EntityParms::new(unit_cube_model(), Point3::new(0.0, 0.0, 0.0));
        parms.callback_bounds = Some(create_bounds(
            Point3::new(-50.0, -50.0, -50.0),
            Point3::new(50.0, 50.0, 50.0),
        ));
        let mut def = placed(parms);
        let mut view_count = 0;
        let areas = BoxAreas::new(vec![
            create_bounds(Point3::new(-100.0, -100.0, -100.0), Point3::new(0.0, 100.0, 100.0)),
            create_bounds(Point3::new(0.0, -100.0, -100.0), Point3::new(100.0, 100.0, 100.0)),
            create_bounds(Point3::new(500.0, 500.0, 500.0), Point3::new(600.0, 600.0, 600.0)),
        ]);
        create_entity_refs(&mut def, &areas, false, &mut view_count);
        assert_eq!(def.areas, vec![0, 1]);
    }

    #[test]
    fn test_cleared_bounds_are_not_placed() {
        let empty: Arc<dyn RenderModel> = Arc::new(StaticModel::new("empty"));
        let mut def = placed(EntityParms::new(empty, Point3::new(0.0, 0.0, 0.0)));
        let mut view_count = 7;
        create_entity_refs(&mut def, &SingleArea, true, &mut view_count);
        assert!(def.areas.is_empty());
        assert_eq!(view_count, 7);
    }

    #[test]
    fn test_static_model_is_returned_directly() {
        let model = unit_cube_model();
        let mut def = placed(EntityParms::new(Arc::clone(&model), Point3::new(0.0, 0.0, 0.0)));
        let first = entity_def_dynamic_model(&mut def, 1).expect("model");
        assert!(crate::model::same_model(&first, &model));
        assert_eq!(def.dynamic_model_frame_count, 0);
    }

    #[test]
    fn test_dynamic_model_instantiated_once_per_view() {
        let animated = Arc::new(AnimatedModel::new());
        let model: Arc<dyn RenderModel> = animated.clone();
        let mut def = placed(EntityParms::new(model, Point3::new(0.0, 0.0, 0.0)));

        entity_def_dynamic_model(&mut def, 1);
        entity_def_dynamic_model(&mut def, 1);
        assert_eq!(animated.instantiations(), 1);
        assert_eq!(def.dynamic_model_frame_count, 1);

        entity_def_dynamic_model(&mut def, 2);
        assert_eq!(animated.instantiations(), 2);
        assert_eq!(def.dynamic_model_frame_count, 2);

        // clearing forces a rebuild even within the same view
        def.dynamic_model = None;
        entity_def_dynamic_model(&mut def, 2);
        assert_eq!(animated.instantiations(), 3);
    }

    #[test]
    fn test_reused_instance_keeps_generation() {
        let reusing = Arc::new(ReusingModel::new());
        let model: Arc<dyn RenderModel> = reusing.clone();
        let mut def = placed(EntityParms::new(model, Point3::new(0.0, 0.0, 0.0)));

        let first = entity_def_dynamic_model(&mut def, 1).expect("instance");
        assert_eq!(def.dynamic_model_frame_count, 1);

        for view_count in 2..5 {
            let again = entity_def_dynamic_model(&mut def, view_count).expect("instance");
            assert!(crate::model::same_model(&first, &again));
        }
        assert_eq!(reusing.builds(), 1);
        assert_eq!(def.dynamic_model_frame_count, 1);

        // a dropped cache means a new instance
        def.cached_dynamic_model = None;
        entity_def_dynamic_model(&mut def, 5);
        assert_eq!(reusing.builds(), 2);
        assert_eq!(def.dynamic_model_frame_count, 2);
    }

    #[test]
    fn test_cached_model_without_override_draws_nothing() {
        let model: Arc<dyn RenderModel> = Arc::new(DefaultCachedModel);
        let mut def = placed(EntityParms::new(model, Point3::new(0.0, 0.0, 0.0)));
        assert!(entity_def_dynamic_model(&mut def, 1).is_none());
        assert!(entity_def_dynamic_model(&mut def, 2).is_none());
        assert_eq!(def.dynamic_model_frame_count, 0);
    }

    #[test]
    fn test_faded_decals_and_overlay() {
        let mut def = placed(EntityParms::new(unit_cube_model(), Point3::new(0.0, 0.0, 0.0)));
        let blood = Arc::new(Material::unlit("blood"));
        def.decals.push(Decal { material: Arc::clone(&blood), fade_end_time: 100 });
        def.decals.push(Decal { material: Arc::clone(&blood), fade_end_time: 500 });
        def.overlay = Some(Overlay { materials: vec![blood] });

        free_entity_def_faded_decals(&mut def, 200);
        assert_eq!(def.decals.len(), 1);
        free_entity_def_decals(&mut def);
        assert!(def.decals.is_empty());
        free_entity_def_overlay(&mut def);
        assert!(def.overlay.is_none());
    }
}
