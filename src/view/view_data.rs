//! View Data - Pure Data Structures

use crate::cache::CacheHandle;
use crate::entity::EntityHandle;
use crate::geometry::{ScreenRect, ViewFrustum};
use crate::light::LightHandle;
use crate::model::{Material, SkinningRef};
use bit_vec::BitVec;
use cgmath::{Matrix4, Point3};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A light that survived visibility for this view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLight {
    pub scissor_rect: ScreenRect,
}

/// An entity that is visible, or only lit, in this view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewEntity {
    /// Empty for entities that only matter for shadows
    pub scissor_rect: ScreenRect,
}

/// One lit surface to draw
#[derive(Debug, Clone)]
pub struct DrawInteraction {
    pub light: LightHandle,
    pub entity: EntityHandle,
    /// Index of the surface within the entity's model
    pub surface: usize,
    pub shader: Arc<Material>,
    pub scissor_rect: ScreenRect,
    pub skinning: Option<SkinningRef>,
    pub ambient_cache: CacheHandle,
    pub lighting_cache: CacheHandle,
    pub index_cache: Option<CacheHandle>,
    /// Triangles left after light culling, when that is enabled
    pub light_tri_count: Option<usize>,
    /// Shadow needs caps because the view may be inside it
    pub inside_infinite_shadow: bool,
    pub force_virtual_texture_high_quality: bool,
}

/// Everything one rendered view needs from the interaction graph
#[derive(Debug, Clone)]
pub struct ViewDef {
    /// Id compared against the entity suppress/allow flags
    pub view_id: u32,
    /// Visibility counter this view was stamped with
    pub view_count: u64,
    pub origin: Point3<f32>,
    pub frustum: ViewFrustum,
    pub z_near: f32,
    pub viewport: ScreenRect,

    /// One bit per portal area
    pub visible_areas: BitVec,

    pub view_lights: FxHashMap<LightHandle, ViewLight>,
    pub view_entities: FxHashMap<EntityHandle, ViewEntity>,

    /// Never cull interactions against the view frustum
    pub skip_frustum_interaction_check: bool,

    pub draw_interactions: Vec<DrawInteraction>,
}

impl ViewDef {
    pub fn new(
        view_id: u32,
        view_count: u64,
        origin: Point3<f32>,
        view_proj: &Matrix4<f32>,
        viewport: ScreenRect,
        num_areas: usize,
    ) -> Self {
        Self {
            view_id,
            view_count,
            origin,
            frustum: ViewFrustum::from_view_proj(view_proj),
            z_near: 1.0,
            viewport,
            visible_areas: BitVec::from_elem(num_areas, false),
            view_lights: FxHashMap::default(),
            view_entities: FxHashMap::default(),
            skip_frustum_interaction_check: false,
            draw_interactions: Vec::new(),
        }
    }
}
