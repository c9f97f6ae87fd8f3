//! Model Module
//!
//! Interfaces the interaction code needs from the model and animation
//! layers. Models are owned elsewhere; entities hold them through
//! `Arc<dyn RenderModel>`.

pub mod material;
pub mod static_model;
pub mod tri_surface;

pub use material::{remap_shader_by_skin, Material, Skin};
pub use static_model::StaticModel;
pub use tri_surface::{DrawVert, SharedTriSurface, TriSurface};

use crate::entity::EntityParms;
use crate::geometry::Bounds;
use std::fmt::Debug;
use std::sync::Arc;

/// One surface of a model
#[derive(Debug, Clone, Default)]
pub struct ModelSurface {
    pub shader: Option<Arc<Material>>,
    pub geometry: Option<SharedTriSurface>,
}

/// Reference to the posed joint buffer a skinned surface is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinningRef {
    /// Opaque handle of the joint buffer owned by the animation layer
    pub joint_buffer: u64,
    pub num_inverted_joints: usize,
}

/// How a model's surfaces come into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicModelKind {
    /// Surfaces never change
    Static,
    /// Instantiated once per view and cached until the next view
    Cached,
    /// Instantiated on every use
    Continuous,
}

/// A renderable model as far as lighting is concerned
pub trait RenderModel: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Model-space bounds, possibly depending on the entity's pose
    fn bounds(&self, entity: Option<&EntityParms>) -> Bounds;

    fn num_surfaces(&self) -> usize;

    fn surface(&self, index: usize) -> Option<&ModelSurface>;

    fn is_skeletal_mesh(&self) -> bool {
        false
    }

    /// Joint buffer of a posed skeletal instance
    fn skinning(&self) -> Option<SkinningRef> {
        None
    }

    /// Part of the world geometry; implicitly on the world light channel
    fn is_world_mesh(&self) -> bool {
        false
    }

    /// Large static world geometry where interaction culling is not worth it
    fn is_static_world_model(&self) -> bool {
        false
    }

    fn dynamic_model_kind(&self) -> DynamicModelKind {
        DynamicModelKind::Static
    }

    /// Build the posed instance for this entity.
    ///
    /// `cached` is the instance built last time, which implementations may
    /// reuse; handing back the same `Arc` tells the interaction code the pose
    /// did not change. Returns `None` when nothing should be drawn.
    ///
    /// Models reporting `Cached` or `Continuous` must override this. The
    /// default only hands `cached` back, so such a model never produces a
    /// first instance and draws nothing.
    fn instantiate_dynamic_model(
        &self,
        _entity: &EntityParms,
        cached: Option<&Arc<dyn RenderModel>>,
    ) -> Option<Arc<dyn RenderModel>> {
        cached.cloned()
    }
}

/// Identity comparison of two model handles
pub fn same_model(a: &Arc<dyn RenderModel>, b: &Arc<dyn RenderModel>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
