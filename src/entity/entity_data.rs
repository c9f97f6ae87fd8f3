//! Entity Data - Pure Data Structures

use crate::constants::channels::DEFAULT_CHANNEL_MASK;
use crate::geometry::{cleared_bounds, Bounds};
use crate::interaction::ListHead;
use crate::model::{Material, RenderModel, Skin};
use cgmath::{Matrix3, Matrix4, Point3, SquareMatrix};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Index-stable handle of an entity def within its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

impl EntityHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Entity parameters as supplied by the scene layer
#[derive(Debug, Clone)]
pub struct EntityParms {
    pub model: Arc<dyn RenderModel>,
    pub origin: Point3<f32>,
    /// Columns are the entity's basis vectors
    pub axis: Matrix3<f32>,

    /// Conservative bounds for entities whose model is expensive to pose;
    /// used instead of asking the model
    pub callback_bounds: Option<Bounds>,

    pub custom_skin: Option<Arc<Skin>>,
    pub custom_shader: Option<Arc<Material>>,

    /// Bit mask of light channels this entity is lit on
    pub light_channel: u64,
    pub no_shadow: bool,

    // zero disables each of these
    pub suppress_shadow_in_view_id: u32,
    pub suppress_shadow_in_light_id: u32,
    pub suppress_surface_in_view_id: u32,
    pub allow_surface_in_view_id: u32,

    pub force_virtual_texture_high_quality: bool,
}

impl EntityParms {
    pub fn new(model: Arc<dyn RenderModel>, origin: Point3<f32>) -> Self {
        Self {
            model,
            origin,
            axis: Matrix3::identity(),
            callback_bounds: None,
            custom_skin: None,
            custom_shader: None,
            light_channel: DEFAULT_CHANNEL_MASK,
            no_shadow: false,
            suppress_shadow_in_view_id: 0,
            suppress_shadow_in_light_id: 0,
            suppress_surface_in_view_id: 0,
            allow_surface_in_view_id: 0,
            force_virtual_texture_high_quality: false,
        }
    }
}

/// Decal projected onto an entity's model
#[derive(Debug, Clone, PartialEq)]
pub struct Decal {
    pub material: Arc<Material>,
    /// Game time after which the decal has completely faded
    pub fade_end_time: i64,
}

/// Overlay surfaces drawn on top of an entity's model
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub materials: Vec<Arc<Material>>,
}

/// Entity def as stored in a world
#[derive(Debug, Clone)]
pub struct EntityDef {
    pub handle: EntityHandle,
    pub parms: EntityParms,

    pub model_matrix: Matrix4<f32>,

    /// Model space bounds used for area placement
    pub reference_bounds: Bounds,
    /// World space bounds of the eight reference corners
    pub global_reference_bounds: Bounds,
    pub areas: Vec<usize>,

    /// Posed instance for the current view, if built
    pub dynamic_model: Option<Arc<dyn RenderModel>>,
    /// Generation of `dynamic_model`; bumped every time a new one is built
    pub dynamic_model_frame_count: u64,
    /// View the dynamic model was built for
    pub dynamic_model_view_count: u64,
    /// Last instance, offered back to the model for reuse
    pub cached_dynamic_model: Option<Arc<dyn RenderModel>>,

    pub decals: Vec<Decal>,
    pub overlay: Option<Overlay>,

    pub interactions: ListHead,
}

impl EntityDef {
    pub fn new(handle: EntityHandle, parms: EntityParms) -> Self {
        Self {
            handle,
            parms,
            model_matrix: Matrix4::identity(),
            reference_bounds: cleared_bounds(),
            global_reference_bounds: cleared_bounds(),
            areas: Vec::new(),
            dynamic_model: None,
            dynamic_model_frame_count: 0,
            dynamic_model_view_count: 0,
            cached_dynamic_model: None,
            decals: Vec::new(),
            overlay: None,
            interactions: ListHead::default(),
        }
    }
}
