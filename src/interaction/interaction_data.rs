//! Interaction Data - Pure Data Structures
//!
//! An interaction caches what one light does to one entity. Each lives in
//! the world's arena and sits in two intrusive lists at once: its light's
//! and its entity's. Links are arena ids, never pointers.

use super::cull_info::SurfaceCullInfo;
use crate::cache::CacheHandle;
use crate::entity::EntityHandle;
use crate::geometry::{cleared_bounds, Bounds, ScreenRect};
use crate::light::LightHandle;
use crate::model::{Material, SharedTriSurface, SkinningRef};
use serde::Serialize;
use std::sync::Arc;

/// Generational arena id of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct InteractionId {
    pub index: u32,
    pub generation: u32,
}

/// First and last interaction of one light's or one entity's list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListHead {
    pub first: Option<InteractionId>,
    pub last: Option<InteractionId>,
}

impl ListHead {
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }
}

/// Neighbors within one list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListLinks {
    pub prev: Option<InteractionId>,
    pub next: Option<InteractionId>,
}

/// Which of the two lists an operation walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Light,
    Entity,
}

/// Evaluation state of an interaction
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    /// Surfaces not computed yet
    #[default]
    Deferred,
    /// Evaluated and lights nothing; kept at the tail of both lists
    Empty,
    /// One slot per model surface
    Populated { surfaces: Vec<SurfaceInteraction> },
}

/// Memoized interaction volume relative to the light
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FrustumState {
    #[default]
    Uninitialized,
    /// `frustum_bounds` holds the volume
    Valid,
    /// No usable volume; never cull
    Invalid,
}

/// What one light does to one surface of the entity's model
#[derive(Debug, Clone, Default)]
pub struct SurfaceInteraction {
    /// Effective material after skin/shader remapping; `None` means skipped
    pub shader: Option<Arc<Material>>,
    pub scissor_rect: ScreenRect,
    pub skinning: Option<SkinningRef>,
    /// Unlit source surface whose caches are shared with this one
    pub ambient_tris: Option<SharedTriSurface>,
    pub cull_info: SurfaceCullInfo,
    /// Index cache of the lit triangle subset; light specific, so never on
    /// the shared surface
    pub light_index_cache: Option<CacheHandle>,
    pub force_virtual_texture_high_quality: bool,
}

/// Cached relationship between one light and one entity
#[derive(Debug, Clone)]
pub struct Interaction {
    pub light: LightHandle,
    pub entity: EntityHandle,

    pub light_links: ListLinks,
    pub entity_links: ListLinks,

    /// Entity channel mask, plus the world channel for world meshes
    pub light_channel: u64,

    pub state: InteractionState,

    /// Entity dynamic model generation the surfaces were built from
    pub dynamic_model_frame_count: u64,

    pub frustum_state: FrustumState,
    /// Entity box extruded away from the light, clipped to the light bounds
    pub frustum_bounds: Bounds,
    /// Areas the interaction volume touches
    pub frustum_areas: Vec<usize>,

    /// Some surface is drawn with a joint buffer
    pub has_skinning: bool,
}

impl Interaction {
    pub fn new(light: LightHandle, entity: EntityHandle, light_channel: u64) -> Self {
        Self {
            light,
            entity,
            light_links: ListLinks::default(),
            entity_links: ListLinks::default(),
            light_channel,
            state: InteractionState::Deferred,
            dynamic_model_frame_count: 0,
            frustum_state: FrustumState::Uninitialized,
            frustum_bounds: cleared_bounds(),
            frustum_areas: Vec::new(),
            has_skinning: false,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.state, InteractionState::Deferred)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, InteractionState::Empty)
    }

    /// Surface slots; empty unless populated
    pub fn surfaces(&self) -> &[SurfaceInteraction] {
        match &self.state {
            InteractionState::Populated { surfaces } => surfaces,
            _ => &[],
        }
    }

    /// -1 when deferred, like the surface count of an unevaluated interaction
    pub fn num_surfaces(&self) -> isize {
        match &self.state {
            InteractionState::Deferred => -1,
            InteractionState::Empty => 0,
            InteractionState::Populated { surfaces } => surfaces.len() as isize,
        }
    }

    pub fn links(&self, kind: ListKind) -> &ListLinks {
        match kind {
            ListKind::Light => &self.light_links,
            ListKind::Entity => &self.entity_links,
        }
    }

    pub fn links_mut(&mut self, kind: ListKind) -> &mut ListLinks {
        match kind {
            ListKind::Light => &mut self.light_links,
            ListKind::Entity => &mut self.entity_links,
        }
    }
}

/// Running counters of graph activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InteractionStats {
    pub allocs: u64,
    pub frees: u64,
    pub create_interactions: u64,
    pub free_surfaces: u64,
    pub made_empty: u64,
}
