//! Entity Module
//!
//! Entity definitions: placement, area references, dynamic model
//! materialization and decal/overlay bookkeeping.

pub mod entity_data;
pub mod entity_operations;

pub use entity_data::{Decal, EntityDef, EntityHandle, EntityParms, Overlay};
pub use entity_operations::{
    create_entity_refs, entity_def_dynamic_model, free_entity_def_decals,
    free_entity_def_faded_decals, free_entity_def_overlay, update_entity_model_matrix,
};
