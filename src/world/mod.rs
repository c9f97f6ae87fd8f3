//! World Module
//!
//! A render world owns its light and entity defs in index-stable arrays,
//! the interaction arena and the dense lookup table. Portal traversal lives
//! elsewhere; the world only asks which areas a point or box touches.

pub mod derived_data_operations;
pub mod render_world_data;
pub mod render_world_operations;

pub use derived_data_operations::{
    clear_entity_def_dynamic_model, free_entity_def_derived_data, free_light_def_derived_data,
};
pub use render_world_data::RenderWorld;
pub use render_world_operations::{
    add_entity_def, add_light_def, begin_view, create_entity_def_interactions,
    create_light_def_interactions, entity_def, entity_def_mut, free_entity_def, free_light_def,
    light_def, light_def_mut, lookup_interaction, pair_may_interact, reference_entity_def,
    reference_light_def, update_entity_def, update_light_def,
};

use crate::geometry::{bounds_contains_point, bounds_intersects, Bounds};
use cgmath::Point3;
use std::fmt::Debug;

/// Area membership queries against the portal graph
pub trait PortalAreas: Send + Sync + Debug {
    /// Area holding the point, `None` when it is in the void
    fn point_in_area(&self, point: Point3<f32>) -> Option<usize>;

    /// Every area the box touches, in ascending order
    fn areas_for_bounds(&self, bounds: &Bounds) -> Vec<usize>;

    fn num_areas(&self) -> usize;
}

/// World without portals: everything is in area 0
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleArea;

impl PortalAreas for SingleArea {
    fn point_in_area(&self, _point: Point3<f32>) -> Option<usize> {
        Some(0)
    }

    fn areas_for_bounds(&self, _bounds: &Bounds) -> Vec<usize> {
        vec![0]
    }

    fn num_areas(&self) -> usize {
        1
    }
}

/// Areas approximated by axis-aligned boxes
#[derive(Debug, Clone, Default)]
pub struct BoxAreas {
    areas: Vec<Bounds>,
}

impl BoxAreas {
    pub fn new(areas: Vec<Bounds>) -> Self {
        Self { areas }
    }
}

impl PortalAreas for BoxAreas {
    fn point_in_area(&self, point: Point3<f32>) -> Option<usize> {
        self.areas
            .iter()
            .position(|area| bounds_contains_point(area, point))
    }

    fn areas_for_bounds(&self, bounds: &Bounds) -> Vec<usize> {
        self.areas
            .iter()
            .enumerate()
            .filter(|(_, area)| bounds_intersects(area, bounds))
            .map(|(i, _)| i)
            .collect()
    }

    fn num_areas(&self) -> usize {
        self.areas.len()
    }
}
